use crate::prune::animations::{self, AnimationNames};
use crate::prune::oracle::LivenessOracle;
use crate::style::blaze_css;
use lightningcss::rules::{style::StyleRule, CssRule, CssRuleList};

/// Counts from one filter pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub removed: usize,
}

/// Removes every style rule whose selector is dead, in document order.
///
/// Walks into grouping rules and into the nested rules of kept style rules.
/// Keyframe blocks are left alone: their `0%`/`from`/`to` selectors are not
/// style rules. Animation names used by kept rules are added to `seen`.
pub fn filter_rules(
    rules: &mut CssRuleList<'_>,
    oracle: &LivenessOracle<'_>,
    seen: &mut AnimationNames,
) -> FilterStats {
    let mut stats = FilterStats::default();
    filter_list(&mut rules.0, oracle, seen, &mut stats);
    stats
}

fn filter_list(
    rules: &mut Vec<CssRule<'_>>,
    oracle: &LivenessOracle<'_>,
    seen: &mut AnimationNames,
    stats: &mut FilterStats,
) {
    rules.retain_mut(|rule| {
        if let Some(style) = blaze_css::style_rule_mut(rule) {
            return filter_style_rule(style, oracle, seen, stats);
        }
        if let CssRule::Keyframes(_) = rule {
            return true;
        }
        if let Some(children) = blaze_css::nested_rules_mut(rule) {
            filter_list(&mut children.0, oracle, seen, stats);
        }
        true
    });
}

fn filter_style_rule(
    style: &mut StyleRule<'_>,
    oracle: &LivenessOracle<'_>,
    seen: &mut AnimationNames,
    stats: &mut FilterStats,
) -> bool {
    // A selector the printer cannot render is kept, like any other
    // selector we cannot evaluate.
    let live = match blaze_css::selector_text(style) {
        Some(selector) if !oracle.is_live(&selector) => {
            log::debug!("removing dead rule `{}`", selector);
            false
        }
        _ => true,
    };
    if !live {
        stats.removed += 1;
        return false;
    }

    stats.kept += 1;
    seen.extend(animations::animation_names_in_block(&style.declarations));
    filter_list(&mut style.rules.0, oracle, seen, stats);
    true
}
