//! Animation dependencies: which `@keyframes` the surviving declarations
//! refer to, and removal of the rest.

use crate::style::blaze_css;
use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::animation::AnimationName;
use lightningcss::properties::Property;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::traits::ToCss;
use std::collections::BTreeSet;

/// Animation names referenced by declarations.
pub type AnimationNames = BTreeSet<String>;

/// Values of `animation`/`animation-name` that never name a `@keyframes`.
pub const RESERVED_ANIMATION_KEYWORDS: &[&str] = &["none", "unset", "inherit", "initial"];

/// Names referenced by the `animation`/`animation-name` declarations of a
/// block, `!important` ones included.
pub fn animation_names_in_block(block: &DeclarationBlock<'_>) -> Vec<String> {
    block
        .declarations
        .iter()
        .chain(block.important_declarations.iter())
        .flat_map(names_from_property)
        .collect()
}

fn names_from_property(property: &Property<'_>) -> Vec<String> {
    match property {
        Property::Animation(list, _) => list
            .iter()
            .filter_map(|animation| render_name(&animation.name))
            .collect(),
        Property::AnimationName(names, _) => names.iter().filter_map(render_name).collect(),
        // Values lightningcss kept as raw tokens (`var()` and friends).
        other => {
            let property_id = other.property_id();
            if !matches!(property_id.name(), "animation" | "animation-name") {
                return Vec::new();
            }
            other
                .value_to_css_string(PrinterOptions::default())
                .map(|value| names_from_value(&value))
                .unwrap_or_default()
        }
    }
}

fn render_name(name: &AnimationName<'_>) -> Option<String> {
    let text = name.to_css_string(PrinterOptions::default()).ok()?;
    normalize_name(&text)
}

/// Names in a raw `animation`/`animation-name` value: the first token of
/// every comma-separated part.
pub fn names_from_value(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|part| part.split_whitespace().next())
        .filter_map(normalize_name)
        .collect()
}

/// Trims whitespace and surrounding quotes; reserved keywords are not names.
fn normalize_name(raw: &str) -> Option<String> {
    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if name.is_empty() || RESERVED_ANIMATION_KEYWORDS.contains(&name) {
        return None;
    }
    Some(name.to_string())
}

/// Every animation name referenced by a style rule anywhere in the tree.
/// Keyframe bodies are not searched.
pub fn collect_animation_names(rules: &CssRuleList<'_>) -> AnimationNames {
    let mut names = AnimationNames::new();
    collect_into(rules, &mut names);
    names
}

fn collect_into(rules: &CssRuleList<'_>, names: &mut AnimationNames) {
    for rule in &rules.0 {
        if let Some(style) = blaze_css::style_rule(rule) {
            names.extend(animation_names_in_block(&style.declarations));
        }
        if let Some(children) = blaze_css::nested_rules(rule) {
            collect_into(children, names);
        }
    }
}

/// Removes `@keyframes` (any vendor prefix, any depth) whose name is not in
/// `used`. Returns how many were removed.
pub fn prune_keyframes(rules: &mut CssRuleList<'_>, used: &AnimationNames) -> usize {
    let mut removed = 0;
    rules.0.retain_mut(|rule| {
        if let CssRule::Keyframes(keyframes) = rule {
            let name = blaze_css::keyframes_name(keyframes)
                .and_then(|name| normalize_name(&name));
            let keep = name.as_ref().is_some_and(|name| used.contains(name));
            if !keep {
                log::debug!("removing unused @keyframes {:?}", name);
                removed += 1;
            }
            return keep;
        }
        if let Some(children) = blaze_css::nested_rules_mut(rule) {
            removed += prune_keyframes(children, used);
        }
        true
    });
    removed
}
