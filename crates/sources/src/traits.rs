// crates/sources/src/traits.rs
//! The adapter contract every source implements

use crate::SourceResult;
use async_trait::async_trait;
use brewbooks_core::{Item, SourceId};

/// Search parameters passed to every adapter.
///
/// Empty text means "return the source's default/most-popular set", not an
/// empty result.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub limit: usize,
    pub offset: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: 50,
            offset: 0,
        }
    }

    /// The default/most-popular query
    pub fn default_set() -> Self {
        Self::new("")
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// True when no free-text filter was given
    pub fn is_browse(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One page of normalized results from a single source
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<Item>,
    /// Upstream's total match count where reported, else `items.len()`
    pub total: usize,
}

impl SearchPage {
    pub fn new(items: Vec<Item>, total: usize) -> Self {
        Self { items, total }
    }
}

/// Static facts about a source, for display and diagnostics
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub name: String,
    pub description: String,
    pub base_url: String,
}

/// A content source adapter: wraps one external API or feed.
///
/// Implementations must be side-effect free apart from the network request
/// itself; concurrent calls share nothing mutable.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter serves
    fn id(&self) -> SourceId;

    /// Static metadata about the source
    fn metadata(&self) -> SourceMetadata;

    /// Searches the source, returning up to `query.limit` normalized items
    async fn search(&self, query: &SearchQuery) -> SourceResult<SearchPage>;

    /// Secondary lookup for a playable URL when the search response carried
    /// none. Sources without that concept return `Ok(None)`.
    async fn resolve_audio(&self, _raw_id: &str) -> SourceResult<Option<String>> {
        Ok(None)
    }
}
