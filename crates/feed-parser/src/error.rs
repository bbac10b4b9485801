// crates/feed-parser/src/error.rs
//! Error types for feed parsing

use thiserror::Error;

/// Result alias for feed parsing
pub type FeedResult<T> = Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The document is not a feed format we handle
    #[error("Unsupported feed format: {0}")]
    UnsupportedFormat(String),

    /// A field the feed must carry was absent or empty
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The XML itself would not parse
    #[error("XML parsing error: {0}")]
    XmlParse(String),
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::XmlParse(e.to_string())
    }
}
