use crate::config::ReduceConfig;
use crate::error::Result;
use crate::parser::blaze_html;
use crate::prune::animations::{self, AnimationNames};
use crate::prune::oracle::LivenessOracle;
use crate::prune::{cleanup, fonts, rule_filter};
use crate::style::blaze_css;

/// What each pass removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    pub rules_kept: usize,
    pub rules_removed: usize,
    pub keyframes_removed: usize,
    pub font_faces_removed: usize,
    pub media_removed: usize,
}

/// Reduced stylesheet text plus the pass report.
#[derive(Debug, Clone)]
pub struct Generated {
    pub css: String,
    pub report: PruneReport,
}

/// Reduces `css_text` to what `html_text` needs and returns the CSS.
pub fn reduce_stylesheet(html_text: &str, css_text: &str, config: &ReduceConfig) -> Result<String> {
    generate(html_text, css_text, config).map(|generated| generated.css)
}

/// Runs the full pipeline: filter rules against the document, prune
/// `@keyframes` and `@font-face` nobody uses, drop emptied `@media`, print.
pub fn generate(html_text: &str, css_text: &str, config: &ReduceConfig) -> Result<Generated> {
    let document = blaze_html::create_dom_tree(html_text, config.document_url.clone());
    let oracle = LivenessOracle::new(&document, &config.force_include);
    let mut sheet = blaze_css::parse_stylesheet(css_text, config.error_recovery)?;

    let mut seen_by_kept_rules = AnimationNames::new();
    let filter = rule_filter::filter_rules(&mut sheet.rules, &oracle, &mut seen_by_kept_rules);

    let mut used_animations = animations::collect_animation_names(&sheet.rules);
    used_animations.extend(seen_by_kept_rules);
    let keyframes_removed = animations::prune_keyframes(&mut sheet.rules, &used_animations);

    let used_fonts = fonts::collect_used_fonts(&sheet.rules);
    let font_faces_removed =
        fonts::prune_font_faces(&mut sheet.rules, &used_fonts, config.font_policy);

    let media_removed = cleanup::remove_empty_media(&mut sheet.rules);

    let report = PruneReport {
        rules_kept: filter.kept,
        rules_removed: filter.removed,
        keyframes_removed,
        font_faces_removed,
        media_removed,
    };
    log::info!(
        "kept {} rules, removed {} rules, {} @keyframes, {} @font-face, {} @media ({} font policy)",
        report.rules_kept,
        report.rules_removed,
        report.keyframes_removed,
        report.font_faces_removed,
        report.media_removed,
        config.font_policy
    );

    let css = blaze_css::print_stylesheet(&sheet)?;
    Ok(Generated { css, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_counts_every_pass() {
        let html_str = r#"<!DOCTYPE html>
<html>
<body>
  <div class="red">Hello Red
    <div id="blue">Hello Blue</div>
  </div>
  <p>Unstyled paragraph</p>
</body>
</html>"#;

        let css_snippet = r#"
            .red { color: red; animation: glow 1s }
            #blue { color: blue; font-family: "Inter" }
            .green { color: green; animation: fade 1s }
            .red > #blue { font-size: 20px; }
            @keyframes glow { to { opacity: 1 } }
            @keyframes fade { to { opacity: 0 } }
            @font-face { font-family: "Inter"; src: url(inter.woff2) }
            @font-face { font-family: "Lora"; src: url(lora.woff2) }
            @media print { .green { display: none } }
        "#;

        let generated = generate(html_str, css_snippet, &ReduceConfig::default()).unwrap();
        assert_eq!(
            generated.report,
            PruneReport {
                rules_kept: 3,
                rules_removed: 2,
                keyframes_removed: 1,
                font_faces_removed: 1,
                media_removed: 1,
            }
        );
        assert!(generated.css.contains("glow"));
        assert!(!generated.css.contains("fade"));
        assert!(generated.css.contains("Inter"));
        assert!(!generated.css.contains("Lora"));
    }
}
