use crate::error::{BlazeError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How `@font-face` blocks are matched against font usages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontMatchPolicy {
    /// Keep a face when some usage's family list contains its family and the
    /// usage's weight and style equal the face's.
    #[default]
    Descriptor,
    /// Keep a face when its family is one of the used family names.
    /// Weight and style are ignored.
    Strict,
}

impl FromStr for FontMatchPolicy {
    type Err = BlazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descriptor" => Ok(FontMatchPolicy::Descriptor),
            "strict" => Ok(FontMatchPolicy::Strict),
            _ => Err(BlazeError::UnknownFontPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for FontMatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontMatchPolicy::Descriptor => f.write_str("descriptor"),
            FontMatchPolicy::Strict => f.write_str("strict"),
        }
    }
}

/// Everything besides the two input texts that steers a reduction.
#[derive(Debug, Clone, Default)]
pub struct ReduceConfig {
    /// URL the document was loaded from. Only attached to the DOM.
    pub document_url: Option<Url>,
    /// Rules whose selector text matches any of these are always kept.
    pub force_include: Vec<Regex>,
    pub font_policy: FontMatchPolicy,
    /// Skip invalid CSS rules instead of failing the whole stylesheet.
    pub error_recovery: bool,
}

impl ReduceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document_url(mut self, url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|source| BlazeError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        self.document_url = Some(parsed);
        Ok(self)
    }

    /// Compiles and appends force-include patterns.
    pub fn with_force_include<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.force_include.push(Regex::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    pub fn with_font_policy(mut self, policy: FontMatchPolicy) -> Self {
        self.font_policy = policy;
        self
    }

    pub fn with_error_recovery(mut self, enabled: bool) -> Self {
        self.error_recovery = enabled;
        self
    }
}
