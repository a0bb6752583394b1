use crate::dom::dom_tree::{self, Node, NodeRef};
use crate::parser::dom_indices::DomIndices;
use thiserror::Error;

/// ------------------------------
/// 1. Selector Parsing
/// ------------------------------

/// Supported attribute selector operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr="value"]
    Exact,
    /// [attr~="value"]
    Includes,
    /// [attr|="value"]
    DashMatch,
    /// [attr^="value"]
    Prefix,
    /// [attr$="value"]
    Suffix,
    /// [attr*="value"]
    Substring,
}

/// Represents one attribute condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>, // None means only existence check
    pub value: Option<String>,
    pub case_insensitive: bool,
}

/// Structural pseudo-classes that can be answered from a static tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralPseudo {
    Root,
    FirstChild,
    LastChild,
    OnlyChild,
}

/// A compound selector: an optional tag plus ids, classes, attribute
/// conditions and structural pseudo-classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
    pub pseudo_classes: Vec<StructuralPseudo>,
}

/// A complex selector composed of a key compound selector and a list of ancestor parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub key: CompoundSelector,
    /// Ancestors with their combinators, in right-to-left order.
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

/// Supported combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (a space).
    Descendant,
    /// Child combinator (`>`).
    Child,
    /// Adjacent sibling combinator (`+`).
    AdjacentSibling,
    /// General sibling combinator (`~`).
    GeneralSibling,
}

/// Why a selector could not be turned into a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("expected a compound selector at offset {0}")]
    EmptyCompound(usize),
    #[error("expected an identifier at offset {0}")]
    ExpectedIdent(usize),
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    #[error("unsupported pseudo-class `:{0}`")]
    UnsupportedPseudoClass(String),
    #[error("unsupported pseudo-element at offset {0}")]
    UnsupportedPseudoElement(usize),
    #[error("unsupported syntax `{found}` at offset {offset}")]
    UnsupportedSyntax { found: char, offset: usize },
}

/// Parse a comma-separated selector list, e.g. `"div.red > p, #header[lang|=en]"`.
///
/// Only syntax the matcher can answer exactly is accepted. Everything else
/// (namespaces, escapes, nesting, dynamic pseudo-classes, pseudo-elements)
/// is reported as an error so callers can decide how to treat it.
pub fn parse_selector_list(selector: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    if selector.trim().is_empty() {
        return Err(SelectorError::Empty);
    }
    let mut parser = SelectorParser::new(selector);
    let mut list = Vec::new();
    loop {
        parser.skip_whitespace();
        list.push(parser.complex()?);
        match parser.bump() {
            None => break,
            Some(',') => continue,
            Some(found) => {
                return Err(SelectorError::Unexpected {
                    found,
                    offset: parser.pos - found.len_utf8(),
                })
            }
        }
    }
    Ok(list)
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '-' || ch == '_' || !ch.is_ascii()
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str) -> Self {
        SelectorParser { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace, reporting whether any was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
            self.bump();
        }
        self.pos != start
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                return Err(SelectorError::UnsupportedSyntax {
                    found: ch,
                    offset: self.pos,
                });
            }
            if !is_ident_char(ch) {
                break;
            }
            self.bump();
        }
        let ident = &self.input[start..self.pos];
        let mut chars = ident.chars();
        let valid = match (chars.next(), chars.next()) {
            (Some('-'), Some(second)) => !second.is_ascii_digit(),
            (Some(first), _) => is_ident_start(first),
            (None, _) => false,
        };
        if !valid || ident == "-" {
            return Err(SelectorError::ExpectedIdent(start));
        }
        Ok(ident.to_string())
    }

    fn complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::AdjacentSibling,
                Some('~') => Combinator::GeneralSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => {
                    return Err(SelectorError::Unexpected {
                        found,
                        offset: self.pos,
                    })
                }
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        // compounds: c0 (comb0) c1 (comb1) c2 -> key c2, ancestors [(comb1, c1), (comb0, c0)]
        let key = compounds.pop().unwrap_or_default();
        let ancestors = combinators.into_iter().zip(compounds).rev().collect();
        Ok(ComplexSelector { key, ancestors })
    }

    fn compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let start = self.pos;
        let mut compound = CompoundSelector::default();
        let mut universal = false;

        match self.peek() {
            Some('*') => {
                self.bump();
                universal = true;
            }
            Some(ch) if is_ident_start(ch) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        while let Some(ch) = self.peek() {
            match ch {
                '#' => {
                    self.bump();
                    compound.ids.push(self.ident()?);
                }
                '.' => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                '[' => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                ':' => {
                    let offset = self.pos;
                    self.bump();
                    if self.peek() == Some(':') {
                        return Err(SelectorError::UnsupportedPseudoElement(offset));
                    }
                    let name = self.ident()?.to_ascii_lowercase();
                    let pseudo = match name.as_str() {
                        "root" => StructuralPseudo::Root,
                        "first-child" => StructuralPseudo::FirstChild,
                        "last-child" => StructuralPseudo::LastChild,
                        "only-child" => StructuralPseudo::OnlyChild,
                        _ => return Err(SelectorError::UnsupportedPseudoClass(name)),
                    };
                    compound.pseudo_classes.push(pseudo);
                }
                '|' | '&' | '\\' | '(' | ')' | '%' => {
                    return Err(SelectorError::UnsupportedSyntax {
                        found: ch,
                        offset: self.pos,
                    })
                }
                _ => break,
            }
        }

        if !universal && compound == CompoundSelector::default() {
            return Err(SelectorError::EmptyCompound(start));
        }
        Ok(compound)
    }

    /// Parses the inside of `[...]`; the opening bracket is consumed.
    fn attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let operator = match self.bump() {
            Some(']') => {
                return Ok(AttributeSelector {
                    name,
                    operator: None,
                    value: None,
                    case_insensitive: false,
                })
            }
            Some('=') => AttributeOperator::Exact,
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.bump() != Some('=') {
                    return Err(if op == '|' {
                        SelectorError::UnsupportedSyntax {
                            found: op,
                            offset: self.pos,
                        }
                    } else {
                        SelectorError::UnterminatedAttribute
                    });
                }
                match op {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    _ => AttributeOperator::Substring,
                }
            }
            Some(found) => {
                return Err(SelectorError::Unexpected {
                    found,
                    offset: self.pos - found.len_utf8(),
                })
            }
            None => return Err(SelectorError::UnterminatedAttribute),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                loop {
                    match self.bump() {
                        Some(ch) if ch == quote => break,
                        Some('\\') => {
                            return Err(SelectorError::UnsupportedSyntax {
                                found: '\\',
                                offset: self.pos - 1,
                            })
                        }
                        Some(_) => {}
                        None => return Err(SelectorError::UnterminatedAttribute),
                    }
                }
                self.input[start..self.pos - quote.len_utf8()].to_string()
            }
            _ => self.ident()?,
        };

        self.skip_whitespace();
        let mut case_insensitive = false;
        if self.peek().is_some_and(|ch| ch.is_ascii_alphabetic()) {
            let offset = self.pos;
            match self.ident()?.as_str() {
                "i" | "I" => case_insensitive = true,
                "s" | "S" => {}
                _ => return Err(SelectorError::ExpectedIdent(offset)),
            }
            self.skip_whitespace();
        }
        if self.bump() != Some(']') {
            return Err(SelectorError::UnterminatedAttribute);
        }

        Ok(AttributeSelector {
            name,
            operator: Some(operator),
            value: Some(value),
            case_insensitive,
        })
    }
}

/// ------------------------------
/// 2. Selector Matching
/// ------------------------------

/// Returns true if the given element node matches the CompoundSelector.
/// Checks tag, ids, classes, attribute conditions and structural pseudo-classes.
pub fn matches_compound(node: &NodeRef, compound: &CompoundSelector) -> bool {
    let borrowed = node.borrow();
    let Node::Element(elem) = &*borrowed else {
        return false;
    };

    if let Some(ref tag) = compound.tag {
        if !elem.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if !compound.ids.iter().all(|id| elem.attr("id") == Some(id.as_str())) {
        return false;
    }
    if !compound
        .classes
        .iter()
        .all(|class| elem.classes().any(|c| c == class))
    {
        return false;
    }
    if !compound
        .attributes
        .iter()
        .all(|attr_sel| matches_attribute(elem.attr(&attr_sel.name), attr_sel))
    {
        return false;
    }
    drop(borrowed);

    compound
        .pseudo_classes
        .iter()
        .all(|pseudo| matches_structural(node, *pseudo))
}

fn matches_attribute(actual: Option<&str>, attr_sel: &AttributeSelector) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let (Some(operator), Some(expected)) = (&attr_sel.operator, &attr_sel.value) else {
        return true;
    };
    let (actual, expected) = if attr_sel.case_insensitive {
        (actual.to_lowercase(), expected.to_lowercase())
    } else {
        (actual.to_string(), expected.clone())
    };
    match operator {
        AttributeOperator::Exact => actual == expected,
        AttributeOperator::Includes => actual.split_whitespace().any(|word| word == expected),
        AttributeOperator::DashMatch => {
            actual == expected || actual.starts_with(&format!("{}-", expected))
        }
        // Empty values never match the substring operators.
        AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttributeOperator::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

fn matches_structural(node: &NodeRef, pseudo: StructuralPseudo) -> bool {
    if pseudo == StructuralPseudo::Root {
        return dom_tree::parent_of(node)
            .is_some_and(|parent| matches!(*parent.borrow(), Node::DocumentRoot(_)));
    }
    let Some((siblings, index)) = dom_tree::element_siblings(node) else {
        return false;
    };
    match pseudo {
        StructuralPseudo::FirstChild => index == 0,
        StructuralPseudo::LastChild => index + 1 == siblings.len(),
        StructuralPseudo::OnlyChild => siblings.len() == 1,
        StructuralPseudo::Root => false,
    }
}

/// Matches a ComplexSelector against a candidate element.
/// The matching proceeds right-to-left, backtracking over ancestors and
/// siblings when a descendant or general-sibling step fails further left.
pub fn matches_complex_selector(candidate: &NodeRef, complex: &ComplexSelector) -> bool {
    matches_compound(candidate, &complex.key) && matches_ancestors(candidate, &complex.ancestors)
}

fn matches_ancestors(node: &NodeRef, ancestors: &[(Combinator, CompoundSelector)]) -> bool {
    let Some(((combinator, compound), rest)) = ancestors.split_first() else {
        return true;
    };
    let step = |next: &NodeRef| matches_compound(next, compound) && matches_ancestors(next, rest);

    match combinator {
        Combinator::Child => dom_tree::parent_element(node).is_some_and(|parent| step(&parent)),
        Combinator::Descendant => {
            let mut ancestor = dom_tree::parent_element(node);
            while let Some(current) = ancestor {
                if step(&current) {
                    return true;
                }
                ancestor = dom_tree::parent_element(&current);
            }
            false
        }
        Combinator::AdjacentSibling => match dom_tree::element_siblings(node) {
            Some((siblings, index)) if index > 0 => step(&siblings[index - 1]),
            _ => false,
        },
        Combinator::GeneralSibling => match dom_tree::element_siblings(node) {
            Some((siblings, index)) => siblings[..index].iter().rev().any(step),
            None => false,
        },
    }
}

/// ------------------------------
/// 3. Document Queries
/// ------------------------------

/// Outcome of asking the document whether a selector matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Matched,
    NotMatched,
    /// The selector uses syntax this engine cannot evaluate.
    Unsupported(SelectorError),
}

/// `querySelector`-style lookup: does any element in the document match
/// any selector of the list?
pub fn query_selector(indices: &DomIndices, selector: &str) -> QueryResult {
    let list = match parse_selector_list(selector) {
        Ok(list) => list,
        Err(err) => return QueryResult::Unsupported(err),
    };
    let matched = list.iter().any(|complex| {
        candidates(indices, &complex.key)
            .iter()
            .any(|node| matches_complex_selector(node, complex))
    });
    if matched {
        QueryResult::Matched
    } else {
        QueryResult::NotMatched
    }
}

/// Narrowest index bucket for the key compound.
fn candidates<'a>(indices: &'a DomIndices, key: &CompoundSelector) -> &'a [NodeRef] {
    if let Some(id) = key.ids.first() {
        indices.by_id(id)
    } else if let Some(class) = key.classes.first() {
        indices.by_class(class)
    } else if let Some(tag) = &key.tag {
        indices.by_tag(tag)
    } else {
        &indices.elements
    }
}
