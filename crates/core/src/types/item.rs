//! The normalized catalog record and its source taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies which upstream catalog an [`Item`] came from.
///
/// The lowercase string form is stable: it namespaces item ids
/// (`librivox-123`) and is the lookup key for single-source searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Librivox,
    Archive,
    OpenLibrary,
    Gutenberg,
    Bbc,
    Lit2Go,
    Storynory,
    Podcast,
}

impl SourceId {
    /// Stable string key for this source
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Librivox => "librivox",
            SourceId::Archive => "archive",
            SourceId::OpenLibrary => "openlibrary",
            SourceId::Gutenberg => "gutenberg",
            SourceId::Bbc => "bbc",
            SourceId::Lit2Go => "lit2go",
            SourceId::Storynory => "storynory",
            SourceId::Podcast => "podcast",
        }
    }

    /// All known sources, in registry order
    pub fn all() -> &'static [SourceId] {
        &[
            SourceId::Librivox,
            SourceId::Archive,
            SourceId::OpenLibrary,
            SourceId::Gutenberg,
            SourceId::Bbc,
            SourceId::Lit2Go,
            SourceId::Storynory,
            SourceId::Podcast,
        ]
    }

    /// Namespaces a source-local identifier into a global item id
    pub fn item_id(&self, local: &str) -> String {
        format!("{}-{}", self.as_str(), local)
    }
}

impl FromStr for SourceId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "librivox" => Ok(SourceId::Librivox),
            "archive" => Ok(SourceId::Archive),
            "openlibrary" | "ol" => Ok(SourceId::OpenLibrary),
            "gutenberg" => Ok(SourceId::Gutenberg),
            "bbc" => Ok(SourceId::Bbc),
            "lit2go" => Ok(SourceId::Lit2Go),
            "storynory" => Ok(SourceId::Storynory),
            "podcast" => Ok(SourceId::Podcast),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance badges carried on an [`Item`].
///
/// More than one may be set; they inform display, not dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFlags {
    /// Original story written for the source (not public-domain narration)
    pub is_original: bool,
    /// Educational collection
    pub is_educational: bool,
    /// Full-cast radio production
    pub is_full_cast: bool,
    /// Podcast series rather than a finished work
    pub is_podcast: bool,
}

/// The normalized catalog record all adapters produce.
///
/// Every field is populated at normalization time; absent upstream data is
/// defaulted (`"Untitled"`, `"Unknown"`, `"General"`, `"en"`, 0) so callers
/// never observe missing values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Globally unique, namespaced as `{source}-{local id}`
    pub id: String,
    /// The source's native identifier, needed for secondary lookups
    pub raw_source_id: Option<String>,
    pub title: String,
    pub author: String,
    /// Plain text; upstream HTML is stripped and entities decoded
    pub description: String,
    /// ISO-ish two-letter code
    pub language: String,
    /// Free text, mapped to the fixed taxonomy by [`crate::match_genre`]
    pub genre: String,
    /// 0 when unknown
    pub duration_seconds: u64,
    /// Directly playable URL; `None` means "requires resolution"
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    /// Human-facing link back to the source
    pub details_url: String,
    pub source: SourceId,
    /// Display name of the source
    pub source_label: String,
    pub flags: SourceFlags,
    /// Expected chapter count, 0 if unknown
    pub section_count: u32,
    /// Upstream download/popularity count where the source reports one
    pub downloads: u64,
    /// Publication date string for feed-sourced items
    pub published: Option<String>,
}

impl Item {
    /// Creates an item with all defaults applied for one source
    pub fn new(source: SourceId, local_id: &str, source_label: &str) -> Self {
        Self {
            id: source.item_id(local_id),
            raw_source_id: Some(local_id.to_string()),
            title: "Untitled".to_string(),
            author: "Unknown".to_string(),
            description: String::new(),
            language: "en".to_string(),
            genre: "General".to_string(),
            duration_seconds: 0,
            audio_url: None,
            cover_url: None,
            details_url: String::new(),
            source,
            source_label: source_label.to_string(),
            flags: SourceFlags::default(),
            section_count: 0,
            downloads: 0,
            published: None,
        }
    }

    /// Key used for cross-source deduplication: lowercase title and author
    /// with every character outside `[a-z0-9]` stripped, concatenated.
    /// Intentionally coarse; two editions of the same work collide.
    pub fn dedup_key(&self) -> String {
        fn squash(s: &str) -> String {
            s.to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .collect()
        }
        let mut key = squash(&self.title);
        key.push_str(&squash(&self.author));
        key
    }

    /// True when playback needs a secondary lookup first
    pub fn needs_audio_resolution(&self) -> bool {
        self.audio_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_round_trip() {
        for src in SourceId::all() {
            let parsed: SourceId = src.as_str().parse().expect("parses back");
            assert_eq!(parsed, *src);
        }
    }

    #[test]
    fn test_source_id_unknown() {
        assert!("loyalbooks".parse::<SourceId>().is_err());
        assert!("".parse::<SourceId>().is_err());
    }

    #[test]
    fn test_item_id_namespacing() {
        assert_eq!(SourceId::Librivox.item_id("123"), "librivox-123");
        assert_eq!(SourceId::Bbc.item_id("some_show"), "bbc-some_show");
    }

    #[test]
    fn test_item_defaults() {
        let item = Item::new(SourceId::Archive, "abc", "Internet Archive");
        assert_eq!(item.id, "archive-abc");
        assert_eq!(item.raw_source_id.as_deref(), Some("abc"));
        assert_eq!(item.title, "Untitled");
        assert_eq!(item.author, "Unknown");
        assert_eq!(item.genre, "General");
        assert_eq!(item.language, "en");
        assert_eq!(item.duration_seconds, 0);
        assert!(item.audio_url.is_none());
        assert!(item.needs_audio_resolution());
        assert_eq!(item.flags, SourceFlags::default());
    }

    #[test]
    fn test_dedup_key_strips_punctuation_and_case() {
        let mut a = Item::new(SourceId::Librivox, "1", "LibriVox");
        a.title = "A Study in Scarlet".to_string();
        a.author = "Doyle, Arthur Conan".to_string();

        let mut b = Item::new(SourceId::Archive, "2", "Internet Archive");
        b.title = "A STUDY IN SCARLET!".to_string();
        b.author = "doyle arthur-conan".to_string();

        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_eq!(a.dedup_key(), "astudyinscarletdoylearthurconan");
    }
}
