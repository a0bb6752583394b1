//! Font dependencies: which `@font-face` blocks the surviving declarations
//! need, under one of two matching policies.

use crate::config::FontMatchPolicy;
use crate::style::blaze_css;
use crate::style::owned_css::OwnedDeclarations;
use lightningcss::rules::{CssRule, CssRuleList};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

pub const DEFAULT_WEIGHT: &str = "400";
pub const DEFAULT_STYLE: &str = "normal";

/// First token of a `font` shorthand that is a size; the family list
/// follows it.
fn font_size_token() -> &'static Regex {
    static FONT_SIZE: OnceLock<Regex> = OnceLock::new();
    FONT_SIZE.get_or_init(|| Regex::new(r"(?i)\d+(px|em|rem|pt|%)").expect("valid font size pattern"))
}

/// One place that uses a font: the family list of a declaration block with
/// the block's weight and style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontUsage {
    /// Quote-stripped, lowercased family list, e.g. `roboto, sans-serif`.
    pub family: String,
    pub weight: String,
    pub style: String,
}

/// What an `@font-face` block declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFaceDescriptor {
    pub family: Option<String>,
    pub weight: String,
    pub style: String,
}

/// Fonts referenced by surviving declarations, in both shapes the policies
/// need.
#[derive(Debug, Clone, Default)]
pub struct UsedFonts {
    /// Individual family names, lowercased and quote-stripped.
    pub families: BTreeSet<String>,
    pub usages: Vec<FontUsage>,
}

/// Family, weight and style pulled out of a `font` shorthand value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShorthandFont {
    pub family: String,
    pub weight: Option<String>,
    pub style: Option<String>,
}

fn strip_quotes(value: &str) -> String {
    value.replace(['"', '\''], "").trim().to_string()
}

/// Splits a family list into lowercase, quote-stripped names.
pub fn parse_family_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|family| strip_quotes(family).to_lowercase())
        .filter(|family| !family.is_empty())
        .collect()
}

/// `normal` and `bold` are spelled as numbers so both spellings compare equal.
pub fn normalize_weight(value: &str) -> String {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => DEFAULT_WEIGHT.to_string(),
        "bold" => "700".to_string(),
        other => other.to_string(),
    }
}

/// Reads a `font` shorthand kept as raw text. The family list follows the
/// size and an optional `/ line-height`; without one there is no family.
pub fn parse_font_shorthand(value: &str) -> Option<ShorthandFont> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let size_index = parts
        .iter()
        .position(|part| font_size_token().is_match(part))?;

    let mut family_parts = &parts[size_index + 1..];
    match family_parts.first().copied() {
        Some("/") => family_parts = family_parts.get(2..).unwrap_or_default(),
        Some(line_height) if line_height.starts_with('/') => family_parts = &family_parts[1..],
        _ => {}
    }
    if family_parts.is_empty() {
        return None;
    }

    let mut shorthand = ShorthandFont {
        family: family_parts.join(" "),
        ..ShorthandFont::default()
    };
    for part in &parts[..size_index] {
        let lower = part.to_ascii_lowercase();
        match lower.as_str() {
            "italic" | "oblique" => shorthand.style = Some(lower),
            "bold" | "bolder" | "lighter" => shorthand.weight = Some(lower),
            numeric if numeric.parse::<u16>().is_ok_and(|w| (1..=1000).contains(&w)) => {
                shorthand.weight = Some(lower)
            }
            _ => {}
        }
    }
    Some(shorthand)
}

impl UsedFonts {
    /// Records the fonts one declaration block uses. Every `font-family` in
    /// the block counts towards the family names; the usage takes the
    /// winning one.
    pub fn record_block(&mut self, decls: &OwnedDeclarations) {
        let shorthand = decls.last("font").and_then(parse_font_shorthand);

        for family in decls.all("font-family") {
            self.families.extend(parse_family_list(family));
        }
        if let Some(shorthand) = &shorthand {
            self.families.extend(parse_family_list(&shorthand.family));
        }

        let family = decls
            .last("font-family")
            .or(shorthand.as_ref().map(|s| s.family.as_str()));
        let Some(family) = family else {
            return;
        };
        let weight = decls
            .last("font-weight")
            .or(shorthand.as_ref().and_then(|s| s.weight.as_deref()))
            .unwrap_or(DEFAULT_WEIGHT);
        let style = decls
            .last("font-style")
            .or(shorthand.as_ref().and_then(|s| s.style.as_deref()))
            .unwrap_or(DEFAULT_STYLE);

        self.usages.push(FontUsage {
            family: strip_quotes(family).to_lowercase(),
            weight: normalize_weight(weight),
            style: style.trim().to_string(),
        });
    }

    /// Whether `face` is needed under `policy`. A face without a family is
    /// never needed.
    pub fn keeps(&self, face: &FontFaceDescriptor, policy: FontMatchPolicy) -> bool {
        let Some(family) = face.family.as_deref() else {
            return false;
        };
        let family = family.to_lowercase();
        match policy {
            FontMatchPolicy::Strict => self.families.contains(&family),
            FontMatchPolicy::Descriptor => self.usages.iter().any(|usage| {
                usage.family.contains(&family)
                    && usage.weight == face.weight
                    && usage.style == face.style
            }),
        }
    }
}

impl FontFaceDescriptor {
    pub fn from_descriptors(decls: &OwnedDeclarations) -> Self {
        FontFaceDescriptor {
            family: decls
                .last("font-family")
                .map(strip_quotes)
                .filter(|family| !family.is_empty()),
            weight: normalize_weight(decls.last("font-weight").unwrap_or(DEFAULT_WEIGHT)),
            style: decls
                .last("font-style")
                .unwrap_or(DEFAULT_STYLE)
                .trim()
                .to_string(),
        }
    }
}

/// Scans every surviving style rule, at any depth, and the keyframe blocks
/// of surviving `@keyframes`.
pub fn collect_used_fonts(rules: &CssRuleList<'_>) -> UsedFonts {
    let mut used = UsedFonts::default();
    collect_into(rules, &mut used);
    log::debug!(
        "font usages: {} blocks, families {:?}",
        used.usages.len(),
        used.families
    );
    used
}

fn collect_into(rules: &CssRuleList<'_>, used: &mut UsedFonts) {
    for rule in &rules.0 {
        match rule {
            CssRule::Keyframes(keyframes) => {
                for keyframe in &keyframes.keyframes {
                    used.record_block(&blaze_css::own_declarations(&keyframe.declarations));
                }
            }
            other => {
                if let Some(style) = blaze_css::style_rule(other) {
                    used.record_block(&blaze_css::own_declarations(&style.declarations));
                }
            }
        }
        if let Some(children) = blaze_css::nested_rules(rule) {
            collect_into(children, used);
        }
    }
}

/// Removes `@font-face` blocks (any depth) that `used` does not need.
/// Returns how many were removed.
pub fn prune_font_faces(
    rules: &mut CssRuleList<'_>,
    used: &UsedFonts,
    policy: FontMatchPolicy,
) -> usize {
    let mut removed = 0;
    rules.0.retain_mut(|rule| {
        if let CssRule::FontFace(face) = rule {
            let descriptor =
                FontFaceDescriptor::from_descriptors(&blaze_css::font_face_descriptors(face));
            let keep = used.keeps(&descriptor, policy);
            if !keep {
                log::debug!("removing unused @font-face {:?}", descriptor);
                removed += 1;
            }
            return keep;
        }
        if let Some(children) = blaze_css::nested_rules_mut(rule) {
            removed += prune_font_faces(children, used, policy);
        }
        true
    });
    removed
}
