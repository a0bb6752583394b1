//! Selector liveness: does a style rule's selector reach anything in the
//! document?

use crate::dom::dom_tree::Document;
use crate::parser::dom_indices::DomIndices;
use crate::style::css_matcher::{self, QueryResult};
use regex::Regex;

/// Pseudo-classes and pseudo-elements a static snapshot cannot exhibit.
/// They are removed from the selector before the DOM is queried.
const STRIPPED_PSEUDOS: &[&str] = &[":before", ":after", ":hover"];

/// Answers whether a selector is live in one document.
pub struct LivenessOracle<'a> {
    // Keeps the document root alive for parent lookups while querying.
    _document: &'a Document,
    indices: DomIndices,
    force_include: &'a [Regex],
}

impl<'a> LivenessOracle<'a> {
    pub fn new(document: &'a Document, force_include: &'a [Regex]) -> Self {
        LivenessOracle {
            _document: document,
            indices: DomIndices::build(document),
            force_include,
        }
    }

    /// A selector is live when a force-include pattern matches its original
    /// text, when the stripped selector matches an element, or when the
    /// selector cannot be evaluated at all.
    pub fn is_live(&self, selector_text: &str) -> bool {
        if let Some(pattern) = self
            .force_include
            .iter()
            .find(|pattern| pattern.is_match(selector_text))
        {
            log::debug!("`{}` force-included by /{}/", selector_text, pattern);
            return true;
        }

        let stripped = strip_dynamic_pseudos(selector_text);
        match css_matcher::query_selector(&self.indices, &stripped) {
            QueryResult::Matched => true,
            QueryResult::NotMatched => false,
            QueryResult::Unsupported(err) => {
                log::debug!("keeping `{}`: {}", selector_text, err);
                true
            }
        }
    }
}

/// Removes every `:before`, `:after` and `:hover` from the selector text.
/// Plain substring removal, case-sensitive. The pipeline feeds it selectors
/// printed by lightningcss, which already lowercases pseudo names and
/// prints `::before`/`::after` with one colon, so any spelling in the
/// source stylesheet is stripped there.
pub fn strip_dynamic_pseudos(selector_text: &str) -> String {
    STRIPPED_PSEUDOS
        .iter()
        .fold(selector_text.to_string(), |text, pseudo| text.replace(pseudo, ""))
}
