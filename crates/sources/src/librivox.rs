// crates/sources/src/librivox.rs
//! LibriVox adapter: free public-domain audiobooks read by volunteers
//!
//! The LibriVox API rejects direct cross-origin requests, so every call
//! goes through the relay fallback. Search results are normalized from the
//! `books` array; the extended lookup (`sections`) backs chapter
//! resolution.

use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::util;
use crate::{SourceError, SourceResult};
use async_trait::async_trait;
use brewbooks_core::{Item, SourceId};
use brewbooks_network::{urlencoding, HttpClient};
use serde::Deserialize;

const API_BASE: &str = "https://librivox.org/api/feed/audiobooks";
const SOURCE_LABEL: &str = "LibriVox";

/// LibriVox content source
pub struct LibriVoxAdapter {
    client: HttpClient,
    base_url: String,
}

impl LibriVoxAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            base_url: API_BASE.to_string(),
        }
    }

    /// Builds the search URL; pure so query construction is testable
    fn search_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}?format=json&limit={}&offset={}&extended=1",
            self.base_url, query.limit, query.offset
        );
        if !query.is_browse() {
            // LibriVox matches titles anchored with ^
            url.push_str("&title=^");
            url.push_str(&urlencoding::encode(query.text.trim()));
        }
        url
    }

    /// Extended lookup for one book's ordered section list
    pub async fn sections(&self, raw_id: &str) -> SourceResult<Vec<LibriVoxSection>> {
        let url = format!(
            "{}?id={}&format=json&extended=1",
            self.base_url,
            urlencoding::encode(raw_id)
        );
        let response: LibriVoxResponse = self.client.get_json_with_relay(&url).await?;
        let book = response.books.into_iter().next().ok_or(SourceError::NotFound)?;
        Ok(book.sections)
    }

    fn normalize(book: LibriVoxBook) -> Item {
        let mut item = Item::new(SourceId::Librivox, &book.id, SOURCE_LABEL);

        item.title = util::or_default(&book.title, "Untitled");
        item.author = book
            .authors
            .first()
            .map(|a| format!("{} {}", a.first_name, a.last_name).trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        item.description = book.description;
        item.language = util::or_default(&book.language, "en");
        item.genre = book
            .genres
            .first()
            .map(|g| g.name.clone())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| "General".to_string());
        item.duration_seconds = book.totaltimesecs;
        item.section_count = book.num_sections.parse().unwrap_or(0);
        item.audio_url = Some(book.url_zip_file).filter(|u| !u.is_empty());
        item.cover_url = Some(book.url_cover).filter(|u| !u.is_empty());
        item.details_url = if book.url_librivox.is_empty() {
            format!("https://librivox.org/book/{}", book.id)
        } else {
            book.url_librivox
        };
        item
    }
}

#[async_trait]
impl SourceAdapter for LibriVoxAdapter {
    fn id(&self) -> SourceId {
        SourceId::Librivox
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Free public domain audiobooks read by volunteers".to_string(),
            base_url: self.base_url.clone(),
        }
    }

    async fn search(&self, query: &SearchQuery) -> SourceResult<SearchPage> {
        let url = self.search_url(query);
        let response: LibriVoxResponse = self.client.get_json_with_relay(&url).await?;

        let items: Vec<Item> = response
            .books
            .into_iter()
            .take(query.limit)
            .map(Self::normalize)
            .collect();
        let total = items.len();
        Ok(SearchPage::new(items, total))
    }
}

#[derive(Debug, Deserialize)]
struct LibriVoxResponse {
    #[serde(default)]
    books: Vec<LibriVoxBook>,
}

#[derive(Debug, Deserialize)]
struct LibriVoxBook {
    #[serde(default, deserialize_with = "util::string_or_number")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    authors: Vec<LibriVoxAuthor>,
    #[serde(default)]
    genres: Vec<LibriVoxGenre>,
    #[serde(default)]
    totaltimesecs: u64,
    #[serde(default, deserialize_with = "util::string_or_number")]
    num_sections: String,
    #[serde(default)]
    url_zip_file: String,
    #[serde(default)]
    url_cover: String,
    #[serde(default)]
    url_librivox: String,
    #[serde(default)]
    sections: Vec<LibriVoxSection>,
}

#[derive(Debug, Deserialize)]
struct LibriVoxAuthor {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct LibriVoxGenre {
    #[serde(default)]
    name: String,
}

/// One ordered section from the extended book lookup
#[derive(Debug, Clone, Deserialize)]
pub struct LibriVoxSection {
    #[serde(default, deserialize_with = "util::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub listen_url: String,
    #[serde(default, deserialize_with = "util::string_or_number")]
    pub totaltimesecs: String,
    #[serde(default)]
    pub readers: Vec<LibriVoxReader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibriVoxReader {
    #[serde(default)]
    pub display_name: String,
}
