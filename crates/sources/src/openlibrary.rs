// crates/sources/src/openlibrary.rs
//! Open Library catalog search, metadata only

use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::SourceResult;
use async_trait::async_trait;
use brewbooks_core::{Item, SourceId};
use brewbooks_network::{urlencoding, HttpClient};
use serde::Deserialize;

const API_BASE: &str = "https://openlibrary.org/search.json";
const SOURCE_LABEL: &str = "Open Library";
const FIELDS: &str = "key,title,author_name,first_publish_year,cover_i,subject";

/// Open Library has no audio; results carry covers and details links only.
pub struct OpenLibraryAdapter {
    client: HttpClient,
}

impl OpenLibraryAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn search_url(query: &SearchQuery) -> String {
        format!(
            "{}?q={}&limit={}&fields={}",
            API_BASE,
            urlencoding::encode(query.text.trim()),
            query.limit,
            urlencoding::encode(FIELDS),
        )
    }

    fn normalize(doc: OpenLibraryDoc) -> Item {
        // Work keys come back as `/works/OL123W`; ids use the short `ol-` prefix
        let work_key = doc.key.trim_start_matches("/works/");
        let mut item = Item::new(SourceId::OpenLibrary, work_key, SOURCE_LABEL);
        item.id = format!("ol-{work_key}");
        // No secondary lookup exists for this source
        item.raw_source_id = None;

        if !doc.title.trim().is_empty() {
            item.title = doc.title.trim().to_string();
        }
        if let Some(author) = doc.author_name.first() {
            item.author = author.clone();
        }
        if let Some(genre) = doc.subject.first() {
            item.genre = genre.clone();
        }
        item.cover_url = doc
            .cover_i
            .map(|id| format!("https://covers.openlibrary.org/b/id/{id}-L.jpg"));
        item.details_url = format!("https://openlibrary.org{}", doc.key);
        item.published = doc.first_publish_year.map(|y| y.to_string());
        item
    }
}

#[async_trait]
impl SourceAdapter for OpenLibraryAdapter {
    fn id(&self) -> SourceId {
        SourceId::OpenLibrary
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Book metadata and covers from the Open Library catalog".to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    async fn search(&self, query: &SearchQuery) -> SourceResult<SearchPage> {
        let url = Self::search_url(query);
        let response: OpenLibraryResponse = self.client.get_json(&url).await?;
        let total = response.num_found;
        let items = response.docs.into_iter().map(Self::normalize).collect();
        Ok(SearchPage::new(items, total))
    }
}

#[derive(Debug, Deserialize)]
struct OpenLibraryResponse {
    #[serde(default)]
    docs: Vec<OpenLibraryDoc>,
    #[serde(default, rename = "numFound")]
    num_found: usize,
}

#[derive(Debug, Deserialize)]
struct OpenLibraryDoc {
    #[serde(default)]
    key: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    first_publish_year: Option<i32>,
    #[serde(default)]
    cover_i: Option<u64>,
    #[serde(default)]
    subject: Vec<String>,
}
