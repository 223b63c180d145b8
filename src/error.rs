//! Error types for rs-html-extract.
//!
//! Markup is never rejected: tokenizing and tree building are total. The only
//! user input that can fail is a selector string (and, when configured, the
//! base URL used to resolve links).

/// Error type for extraction operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The selector string could not be parsed.
    ///
    /// `fragment` is the offending substring and `position` its byte offset
    /// in `selector`.
    #[error("invalid selector {selector:?}: {reason} at position {position} (near {fragment:?})")]
    InvalidSelector {
        selector: String,
        fragment: String,
        position: usize,
        reason: String,
    },

    /// `Options::base_url` is not an absolute URL that relative links can be
    /// resolved against.
    #[error("invalid base URL {0:?}")]
    InvalidBaseUrl(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
