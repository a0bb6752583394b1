use thiserror::Error;

/// Errors raised at the collaborator boundary: CSS parsing and printing,
/// and the configuration values handed in by the caller.
///
/// Selector evaluation problems never show up here; they are absorbed by
/// the liveness oracle.
#[derive(Debug, Error)]
pub enum BlazeError {
    #[error("failed to parse stylesheet: {0}")]
    CssParse(String),
    #[error("failed to print stylesheet: {0}")]
    CssPrint(String),
    #[error("invalid document url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid force-include pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("unknown font policy `{0}` (expected `descriptor` or `strict`)")]
    UnknownFontPolicy(String),
}

pub type Result<T, E = BlazeError> = std::result::Result<T, E>;
