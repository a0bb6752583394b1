use crate::style::blaze_css;
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::traits::ToCss;

/// Removes `@media` blocks left without children. Children are cleaned
/// first, so a block whose only child was an empty `@media` goes too.
/// Returns how many blocks were removed.
pub fn remove_empty_media(rules: &mut CssRuleList<'_>) -> usize {
    let mut removed = 0;
    rules.0.retain_mut(|rule| {
        if let Some(children) = blaze_css::nested_rules_mut(rule) {
            removed += remove_empty_media(children);
        }
        match rule {
            CssRule::Media(media) if media.rules.0.is_empty() => {
                log::debug!(
                    "removing empty @media {}",
                    media
                        .query
                        .to_css_string(PrinterOptions::default())
                        .unwrap_or_default()
                );
                removed += 1;
                false
            }
            _ => true,
        }
    });
    removed
}
