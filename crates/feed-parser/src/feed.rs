// crates/feed-parser/src/feed.rs
//! Feed data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deterministic feed-item ids; any fixed UUID works as long
/// as it never changes between builds.
const ITEM_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6272_6577_626f_6f6b_7366_6565_6469_7431);

/// A parsed RSS feed with channel metadata and items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    /// Channel title
    pub title: String,
    /// Channel description
    pub description: Option<String>,
    /// Channel link
    pub url: Option<String>,
    /// Channel language
    pub language: Option<String>,
    /// Channel image URL
    pub image_url: Option<String>,
    /// Feed items/episodes
    pub items: Vec<FeedItem>,
}

impl Feed {
    pub fn new(title: String) -> Self {
        Self {
            title,
            description: None,
            url: None,
            language: None,
            image_url: None,
            items: Vec::new(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add_item(&mut self, item: FeedItem) {
        self.items.push(item);
    }

    /// Items that carry an audio enclosure
    pub fn audio_items(&self) -> Vec<&FeedItem> {
        self.items.iter().filter(|item| item.has_audio()).collect()
    }
}

/// A single feed item (episode or story)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedItem {
    /// Item title, already entity-decoded
    pub title: String,
    /// Plain-text description: HTML stripped, entities decoded
    pub description: Option<String>,
    /// Item link
    pub url: Option<String>,
    /// Raw `pubDate` text as the feed supplied it
    pub published_raw: Option<String>,
    /// Parsed publication date when the raw text is valid RFC 2822
    pub published: Option<DateTime<Utc>>,
    /// Feed-supplied GUID
    pub guid: Option<String>,
    /// First `<category>` value
    pub category: Option<String>,
    /// Raw `itunes:duration` text; callers parse it into seconds
    pub duration_raw: Option<String>,
    /// `itunes:image` href
    pub image_url: Option<String>,
    /// Audio/video enclosure
    pub enclosure: Option<Enclosure>,
}

impl FeedItem {
    pub fn new(title: String) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    /// Returns true if this item has an audio enclosure
    pub fn has_audio(&self) -> bool {
        self.enclosure.as_ref().is_some_and(|e| e.is_audio())
    }

    /// Returns the enclosure URL if present
    pub fn audio_url(&self) -> Option<&str> {
        self.enclosure.as_ref().map(|e| e.url.as_str())
    }

    /// A stable identifier for this item.
    ///
    /// Prefers the last path segment of the item link (readable, stable
    /// across fetches); otherwise derives a deterministic v5 UUID from
    /// title + publication date + enclosure URL, so the same logical
    /// episode gets the same id on every fetch.
    pub fn stable_id(&self) -> String {
        if let Some(slug) = self
            .url
            .as_deref()
            .and_then(|u| u.split('/').filter(|s| !s.is_empty()).next_back())
        {
            if !slug.is_empty() && !slug.starts_with("http") {
                return slug.to_string();
            }
        }

        let mut material = self.title.clone();
        if let Some(date) = &self.published_raw {
            material.push('|');
            material.push_str(date);
        }
        if let Some(enc) = &self.enclosure {
            material.push('|');
            material.push_str(&enc.url);
        }
        Uuid::new_v5(&ITEM_ID_NAMESPACE, material.as_bytes()).to_string()
    }
}

/// Media enclosure (typically audio)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enclosure {
    /// URL to the media file
    pub url: String,
    /// MIME type (e.g. "audio/mpeg")
    pub mime_type: Option<String>,
    /// File size in bytes
    pub length: Option<u64>,
}

impl Enclosure {
    pub fn new(url: String) -> Self {
        Self {
            url,
            mime_type: None,
            length: None,
        }
    }

    /// Treats a missing MIME type as audio: enclosures in story feeds are
    /// overwhelmingly audio and several feeds omit the attribute.
    pub fn is_audio(&self) -> bool {
        self.mime_type
            .as_deref()
            .map_or(true, |mime| mime.starts_with("audio/"))
    }
}
