// crates/sources/src/lib.rs
//! Source adapters for the free public catalogs Brewbooks aggregates
//!
//! One adapter per upstream, each wrapping exactly one external API or feed
//! behind the [`SourceAdapter`] trait: query construction, the network call
//! (with relay fallback where the upstream needs it), and normalization
//! into the shared [`brewbooks_core::Item`] shape. Adapters never panic and
//! never let a raw transport or parse error escape as anything other than a
//! typed [`SourceError`].

mod archive;
mod bbc;
mod gutenberg;
mod librivox;
mod lit2go;
mod openlibrary;
mod podcast;
mod storynory;
mod traits;
mod util;

pub use archive::{ArchiveAdapter, ArchiveClient, ArchiveDoc, ArchiveFile, AUDIO_FORMATS};
pub use bbc::BbcAdapter;
pub use gutenberg::GutenbergAdapter;
pub use librivox::{LibriVoxAdapter, LibriVoxSection};
pub use lit2go::Lit2GoAdapter;
pub use openlibrary::OpenLibraryAdapter;
pub use podcast::{PodcastAdapter, PodcastEpisode};
pub use storynory::StorynoryAdapter;
pub use traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};

use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors from source adapters
#[derive(Debug, Error)]
pub enum SourceError {
    /// Upstream unavailable or transport failure
    #[error("Network error: {0}")]
    Network(#[from] brewbooks_network::NetworkError),

    /// Upstream responded with something we could not interpret
    #[error("Parse error: {0}")]
    Parse(String),

    /// A lookup for a specific id matched nothing
    #[error("Not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(SourceError::NotFound.to_string().contains("Not found"));
        assert!(SourceError::Parse("bad json".to_string())
            .to_string()
            .contains("bad json"));
    }
}
