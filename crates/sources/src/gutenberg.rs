// crates/sources/src/gutenberg.rs
//! Project Gutenberg catalog via the Gutendex API, text only

use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::SourceResult;
use async_trait::async_trait;
use brewbooks_core::{Item, SourceId};
use brewbooks_network::{urlencoding, HttpClient};
use serde::Deserialize;
use std::collections::HashMap;

const API_BASE: &str = "https://gutendex.com/books";
const SOURCE_LABEL: &str = "Project Gutenberg (Text)";
const FALLBACK_BLURB: &str = "Classic literature from Project Gutenberg";

pub struct GutenbergAdapter {
    client: HttpClient,
}

impl GutenbergAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn search_url(query: &SearchQuery) -> String {
        if query.is_browse() {
            API_BASE.to_string()
        } else {
            format!("{}?search={}", API_BASE, urlencoding::encode(query.text.trim()))
        }
    }

    fn normalize(book: GutendexBook) -> Item {
        let local_id = book.id.to_string();
        let mut item = Item::new(SourceId::Gutenberg, &local_id, SOURCE_LABEL);

        if !book.title.trim().is_empty() {
            item.title = book.title.trim().to_string();
        }
        if let Some(author) = book.authors.first() {
            if !author.name.trim().is_empty() {
                item.author = author.name.clone();
            }
        }
        // Plain subjects carry the genre; `--` entries are library classifications
        if let Some(genre) = book.subjects.iter().find(|s| !s.contains("--")) {
            item.genre = genre.clone();
        }
        let blurb: Vec<&str> = book.subjects.iter().take(3).map(String::as_str).collect();
        item.description = if blurb.is_empty() {
            FALLBACK_BLURB.to_string()
        } else {
            blurb.join("; ")
        };
        if let Some(language) = book.languages.first() {
            item.language = language.clone();
        }
        item.cover_url = book.formats.get("image/jpeg").cloned();
        item.details_url = format!("https://www.gutenberg.org/ebooks/{}", book.id);
        item.downloads = book.download_count;
        // Text only
        item.audio_url = None;
        item
    }
}

#[async_trait]
impl SourceAdapter for GutenbergAdapter {
    fn id(&self) -> SourceId {
        SourceId::Gutenberg
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Public-domain e-texts from Project Gutenberg".to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    async fn search(&self, query: &SearchQuery) -> SourceResult<SearchPage> {
        let url = Self::search_url(query);
        let response: GutendexResponse = self.client.get_json(&url).await?;
        let total = response.count;
        // Gutendex pages at a fixed size; truncate to the requested limit
        let items = response
            .results
            .into_iter()
            .take(query.limit)
            .map(Self::normalize)
            .collect();
        Ok(SearchPage::new(items, total))
    }
}

#[derive(Debug, Deserialize)]
struct GutendexResponse {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    results: Vec<GutendexBook>,
}

#[derive(Debug, Deserialize)]
struct GutendexBook {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<GutendexAuthor>,
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    formats: HashMap<String, String>,
    #[serde(default)]
    download_count: u64,
}

#[derive(Debug, Deserialize)]
struct GutendexAuthor {
    #[serde(default)]
    name: String,
}
