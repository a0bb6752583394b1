// src/style/owned_css.rs: owned, string-based views of lightningcss declaration blocks.

/// One declaration, printed back to text by lightningcss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDeclaration {
    /// Unprefixed property name, e.g. "font-family".
    pub property: String,
    /// e.g. "Roboto, sans-serif".
    pub value: String,
}

impl OwnedDeclaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        OwnedDeclaration {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// The declarations of one block, normal ones first, then `!important` ones.
#[derive(Debug, Clone, Default)]
pub struct OwnedDeclarations(pub Vec<OwnedDeclaration>);

impl OwnedDeclarations {
    /// Value of the last declaration of `property`, the one that wins within
    /// a block.
    pub fn last(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|decl| decl.property == property)
            .map(|decl| decl.value.as_str())
    }

    /// Values of every declaration of `property`, in block order.
    pub fn all<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |decl| decl.property == property)
            .map(|decl| decl.value.as_str())
    }
}
