// crates/sources/src/storynory.rs
//! Storynory original children's stories, from their RSS feed

use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::{SourceError, SourceResult};
use async_trait::async_trait;
use brewbooks_core::{parse_duration, Item, SourceId};
use brewbooks_feed_parser::{FeedItem, FeedParser};
use brewbooks_network::HttpClient;

const FEED_URL: &str = "https://www.storynory.com/feed/";
const SOURCE_LABEL: &str = "Storynory (Original)";
const LOGO_URL: &str =
    "https://www.storynory.com/wp-content/uploads/2023/08/Storynory-logo-2023.png";

/// The feed is small, so search filters client-side on title and description.
pub struct StorynoryAdapter {
    client: HttpClient,
}

impl StorynoryAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn normalize(entry: &FeedItem) -> Item {
        let local_id = entry.stable_id();
        let mut item = Item::new(SourceId::Storynory, &local_id, SOURCE_LABEL);

        item.title = clean_title(&entry.title);
        item.author = "Storynory".to_string();
        item.description = entry.description.clone().unwrap_or_default();
        item.genre = entry
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "Children's Stories".to_string());
        item.duration_seconds = parse_duration(entry.duration_raw.as_deref());
        item.audio_url = entry
            .enclosure
            .as_ref()
            .filter(|e| e.is_audio())
            .map(|e| e.url.clone());
        item.cover_url = Some(
            entry
                .image_url
                .clone()
                .unwrap_or_else(|| LOGO_URL.to_string()),
        );
        item.details_url = entry.url.clone().unwrap_or_default();
        item.published = entry.published_raw.clone();
        item.flags.is_original = true;
        item
    }

    fn matches(entry: &FeedItem, needle: &str) -> bool {
        let description = entry.description.as_deref().unwrap_or("");
        entry.title.to_lowercase().contains(needle)
            || description.to_lowercase().contains(needle)
    }
}

#[async_trait]
impl SourceAdapter for StorynoryAdapter {
    fn id(&self) -> SourceId {
        SourceId::Storynory
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Free original children's audiobooks and poems".to_string(),
            base_url: FEED_URL.to_string(),
        }
    }

    async fn search(&self, query: &SearchQuery) -> SourceResult<SearchPage> {
        let xml = self.client.get_text_with_relay(FEED_URL).await?;
        let feed = FeedParser::parse(&xml).map_err(|e| SourceError::Parse(e.to_string()))?;

        let needle = query.text.trim().to_lowercase();
        let items: Vec<Item> = feed
            .items
            .iter()
            .filter(|entry| needle.is_empty() || Self::matches(entry, &needle))
            .take(query.limit)
            .map(Self::normalize)
            .collect();
        let total = items.len();
        Ok(SearchPage::new(items, total))
    }
}

fn clean_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return "Untitled".to_string();
    }
    const PREFIX: &str = "storynory";
    if title.len() > PREFIX.len()
        && title.is_char_boundary(PREFIX.len())
        && title[..PREFIX.len()].eq_ignore_ascii_case(PREFIX)
    {
        let rest = title[PREFIX.len()..].trim_start();
        if let Some(after) = rest.strip_prefix('-') {
            let cleaned = after.trim_start();
            if !cleaned.is_empty() {
                return cleaned.to_string();
            }
        }
    }
    title.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewbooks_feed_parser::Enclosure;

    fn sample_entry() -> FeedItem {
        FeedItem {
            title: "Storynory - Astropup and the Parrot".to_string(),
            description: Some("A dog goes to space.".to_string()),
            url: Some("https://www.storynory.com/astropup-and-the-parrot/".to_string()),
            duration_raw: Some("12:30".to_string()),
            enclosure: Some(Enclosure {
                url: "https://www.storynory.com/audio/astropup.mp3".to_string(),
                mime_type: Some("audio/mpeg".to_string()),
                length: None,
            }),
            ..FeedItem::default()
        }
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Storynory - The Wise Girl"), "The Wise Girl");
        assert_eq!(clean_title("The Wise Girl"), "The Wise Girl");
        assert_eq!(clean_title(""), "Untitled");
    }

    #[test]
    fn test_normalize_entry() {
        let item = StorynoryAdapter::normalize(&sample_entry());
        assert_eq!(item.id, "storynory-astropup-and-the-parrot");
        assert_eq!(item.title, "Astropup and the Parrot");
        assert_eq!(item.author, "Storynory");
        assert_eq!(item.genre, "Children's Stories");
        assert_eq!(item.duration_seconds, 750);
        assert_eq!(
            item.audio_url.as_deref(),
            Some("https://www.storynory.com/audio/astropup.mp3")
        );
        assert_eq!(item.cover_url.as_deref(), Some(LOGO_URL));
        assert!(item.flags.is_original);
        assert!(!item.needs_audio_resolution());
    }

    #[test]
    fn test_query_matching() {
        let entry = sample_entry();
        assert!(StorynoryAdapter::matches(&entry, "astropup"));
        assert!(StorynoryAdapter::matches(&entry, "space"));
        assert!(!StorynoryAdapter::matches(&entry, "dragon"));
    }
}
