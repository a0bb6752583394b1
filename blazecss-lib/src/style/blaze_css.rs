//! Boundary to lightningcss: parsing and printing whole stylesheets, and
//! owned text views of the pieces the pruning passes look at.

use crate::error::{BlazeError, Result};
use crate::style::owned_css::{OwnedDeclaration, OwnedDeclarations};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::font::Font;
use lightningcss::properties::Property;
use lightningcss::rules::font_face::FontFaceRule;
use lightningcss::rules::keyframes::KeyframesRule;
use lightningcss::rules::{style::StyleRule, CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;
use std::sync::{Arc, RwLock};

/// Parse a raw CSS string with lightningcss.
///
/// With `error_recovery` set, invalid rules and declarations are skipped and
/// reported as warnings instead of failing the parse.
pub fn parse_stylesheet<'i>(
    css_text: &'i str,
    error_recovery: bool,
) -> Result<StyleSheet<'i, 'i>> {
    let warnings = Arc::new(RwLock::new(Vec::new()));
    let parser_opts = ParserOptions {
        error_recovery,
        warnings: error_recovery.then(|| Arc::clone(&warnings)),
        ..ParserOptions::default()
    };

    let sheet = StyleSheet::parse(css_text, parser_opts)
        .map_err(|e| BlazeError::CssParse(e.to_string()))?;

    if let Ok(warnings) = warnings.read() {
        for warning in warnings.iter() {
            log::warn!("skipped invalid css: {}", warning);
        }
    }
    log::debug!("parsed {} top-level rules", sheet.rules.0.len());
    Ok(sheet)
}

/// Print a stylesheet back to text (not minified).
pub fn print_stylesheet(sheet: &StyleSheet<'_, '_>) -> Result<String> {
    sheet
        .to_css(PrinterOptions::default())
        .map(|result| result.code)
        .map_err(|e| BlazeError::CssPrint(e.to_string()))
}

/// The whole selector list of a style rule, as text.
pub fn selector_text(style_rule: &StyleRule<'_>) -> Option<String> {
    style_rule
        .selectors
        .to_css_string(PrinterOptions::default())
        .ok()
        .map(|text| text.trim().to_string())
}

/// Copy a declaration block into owned property/value pairs.
///
/// A parsed `font` shorthand is expanded in place into its `font-family`,
/// `font-weight` and `font-style` parts, so later longhands still override
/// it. A `font` value lightningcss could not parse (e.g. one using `var()`)
/// stays a single `font` entry.
pub fn own_declarations(block: &DeclarationBlock<'_>) -> OwnedDeclarations {
    OwnedDeclarations(
        block
            .declarations
            .iter()
            .chain(block.important_declarations.iter())
            .flat_map(own_property)
            .collect(),
    )
}

fn own_property(property: &Property<'_>) -> Vec<OwnedDeclaration> {
    if let Property::Font(font) = property {
        return own_font_shorthand(font);
    }
    property
        .value_to_css_string(PrinterOptions::default())
        .map(|value| vec![OwnedDeclaration::new(property.property_id().name(), value)])
        .unwrap_or_default()
}

fn own_font_shorthand(font: &Font<'_>) -> Vec<OwnedDeclaration> {
    let family: Vec<String> = font
        .family
        .iter()
        .filter_map(|family| family.to_css_string(PrinterOptions::default()).ok())
        .collect();
    let mut owned = vec![OwnedDeclaration::new("font-family", family.join(", "))];
    if let Ok(weight) = font.weight.to_css_string(PrinterOptions::default()) {
        owned.push(OwnedDeclaration::new("font-weight", weight));
    }
    if let Ok(style) = font.style.to_css_string(PrinterOptions::default()) {
        owned.push(OwnedDeclaration::new("font-style", style));
    }
    owned
}

/// Descriptors of an `@font-face` block as property/value pairs, e.g.
/// `font-family` => `Roboto`.
pub fn font_face_descriptors(rule: &FontFaceRule<'_>) -> OwnedDeclarations {
    OwnedDeclarations(
        rule.properties
            .iter()
            .filter_map(|descriptor| descriptor.to_css_string(PrinterOptions::default()).ok())
            .filter_map(|text| {
                let (property, value) = text.split_once(':')?;
                Some(OwnedDeclaration::new(
                    property.trim().to_ascii_lowercase(),
                    value.trim(),
                ))
            })
            .collect(),
    )
}

/// The animation name a `@keyframes` block defines, as text.
pub fn keyframes_name(rule: &KeyframesRule<'_>) -> Option<String> {
    rule.name
        .to_css_string(PrinterOptions::default())
        .ok()
        .map(|name| name.trim().to_string())
}

/// The style rule behind `rule`: a plain style rule or one wrapped in
/// `@nest`.
pub fn style_rule<'a, 'i>(rule: &'a CssRule<'i>) -> Option<&'a StyleRule<'i>> {
    match rule {
        CssRule::Style(style) => Some(style),
        CssRule::Nesting(nesting) => Some(&nesting.style),
        _ => None,
    }
}

pub fn style_rule_mut<'a, 'i>(rule: &'a mut CssRule<'i>) -> Option<&'a mut StyleRule<'i>> {
    match rule {
        CssRule::Style(style) => Some(style),
        CssRule::Nesting(nesting) => Some(&mut nesting.style),
        _ => None,
    }
}

/// Child rule list of a grouping rule (`@media`, `@supports`, `@layer`
/// blocks, `@container`, `@scope`, `@starting-style`, `@-moz-document`) or
/// of a style rule with nested rules. Keyframes are not grouping rules.
pub fn nested_rules<'a, 'i>(rule: &'a CssRule<'i>) -> Option<&'a CssRuleList<'i>> {
    match rule {
        CssRule::Media(media) => Some(&media.rules),
        CssRule::Supports(supports) => Some(&supports.rules),
        CssRule::LayerBlock(layer) => Some(&layer.rules),
        CssRule::Container(container) => Some(&container.rules),
        CssRule::Scope(scope) => Some(&scope.rules),
        CssRule::StartingStyle(starting) => Some(&starting.rules),
        CssRule::MozDocument(document) => Some(&document.rules),
        CssRule::Style(style) => Some(&style.rules),
        CssRule::Nesting(nesting) => Some(&nesting.style.rules),
        _ => None,
    }
}

pub fn nested_rules_mut<'a, 'i>(rule: &'a mut CssRule<'i>) -> Option<&'a mut CssRuleList<'i>> {
    match rule {
        CssRule::Media(media) => Some(&mut media.rules),
        CssRule::Supports(supports) => Some(&mut supports.rules),
        CssRule::LayerBlock(layer) => Some(&mut layer.rules),
        CssRule::Container(container) => Some(&mut container.rules),
        CssRule::Scope(scope) => Some(&mut scope.rules),
        CssRule::StartingStyle(starting) => Some(&mut starting.rules),
        CssRule::MozDocument(document) => Some(&mut document.rules),
        CssRule::Style(style) => Some(&mut style.rules),
        CssRule::Nesting(nesting) => Some(&mut nesting.style.rules),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selector_text_keeps_pseudo_classes() {
        let sheet = parse_stylesheet(".a:hover, div > .b::before { color: red }", false).unwrap();
        let CssRule::Style(rule) = &sheet.rules.0[0] else {
            panic!("expected a style rule");
        };
        let text = selector_text(rule).unwrap();
        assert!(text.starts_with(".a:hover, div > .b"), "{text}");
    }

    #[test]
    fn test_own_declarations_orders_important_last() {
        let sheet =
            parse_stylesheet(".a { font-weight: bold !important; font-weight: 300 }", false)
                .unwrap();
        let CssRule::Style(rule) = &sheet.rules.0[0] else {
            panic!("expected a style rule");
        };
        let decls = own_declarations(&rule.declarations);
        assert_eq!(decls.last("font-weight"), Some("bold"));
    }

    #[test]
    fn test_own_declarations_expands_font_shorthand() {
        let sheet = parse_stylesheet(
            ".a { font: italic bold 12px/1.5 Roboto, sans-serif; font-weight: 300 }",
            false,
        )
        .unwrap();
        let CssRule::Style(rule) = &sheet.rules.0[0] else {
            panic!("expected a style rule");
        };
        let decls = own_declarations(&rule.declarations);
        assert_eq!(decls.last("font-family"), Some("Roboto, sans-serif"));
        assert_eq!(decls.last("font-style"), Some("italic"));
        assert_eq!(decls.last("font-weight"), Some("300"));
        assert_eq!(decls.last("font"), None);
    }

    #[test]
    fn test_scope_and_starting_style_have_children() {
        let sheet = parse_stylesheet(
            "@scope (.card) { .title { color: red } } @starting-style { .a { opacity: 0 } }",
            false,
        )
        .unwrap();
        for rule in &sheet.rules.0 {
            assert_eq!(nested_rules(rule).map(|children| children.0.len()), Some(1));
        }
    }

    #[test]
    fn test_font_face_descriptors() {
        let sheet = parse_stylesheet(
            r#"@font-face { font-family: "Open Sans"; font-style: italic; src: url(a.woff2) }"#,
            false,
        )
        .unwrap();
        let CssRule::FontFace(face) = &sheet.rules.0[0] else {
            panic!("expected a font-face rule");
        };
        let descriptors = font_face_descriptors(face);
        assert_eq!(
            descriptors.last("font-family").map(|f| f.trim_matches('"')),
            Some("Open Sans")
        );
        assert_eq!(descriptors.last("font-style"), Some("italic"));
    }

    #[test]
    fn test_parse_errors_are_fatal_without_recovery() {
        assert!(matches!(
            parse_stylesheet("..a { color: red } .b { color: blue }", false),
            Err(BlazeError::CssParse(_))
        ));
        let recovered = parse_stylesheet("..a { color: red } .b { color: blue }", true).unwrap();
        assert_eq!(recovered.rules.0.len(), 1);
    }
}
