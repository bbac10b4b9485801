// crates/sources/src/archive.rs
//! Internet Archive adapter and the shared archive machinery
//!
//! Three sources live on archive.org: the general audiobook collection
//! (this adapter), the BBC radio-drama uploads and the Lit2Go educational
//! uploads. [`ArchiveClient`] carries the pieces they all share: the
//! advanced-search call, the per-item file manifest, and on-demand audio
//! resolution against the accepted-format allowlist.

use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::util;
use crate::SourceResult;
use async_trait::async_trait;
use brewbooks_core::{parse_duration, Item, SourceId};
use brewbooks_network::{urlencoding, HttpClient};
use serde::Deserialize;

const SEARCH_BASE: &str = "https://archive.org/advancedsearch.php";
const FIELD_LIST: &str = "identifier,title,creator,description,date,downloads,runtime,subject,language";
const SOURCE_LABEL: &str = "Internet Archive";

/// Declared formats accepted as playable audio, in preference order.
/// Shared by on-demand audio resolution and chapter listing.
pub const AUDIO_FORMATS: &[&str] = &["VBR MP3", "Ogg Vorbis", "64Kbps MP3", "MP3"];

/// Shared client for archive.org search and metadata endpoints
#[derive(Clone)]
pub struct ArchiveClient {
    client: HttpClient,
}

impl ArchiveClient {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Builds the advanced-search URL for a raw archive query expression
    pub fn search_url(query_expr: &str, rows: usize, page: usize) -> String {
        format!(
            "{}?q={}&fl={}&rows={}&page={}&output=json&sort={}",
            SEARCH_BASE,
            urlencoding::encode(query_expr),
            urlencoding::encode(FIELD_LIST),
            rows,
            page,
            urlencoding::encode("downloads desc"),
        )
    }

    /// Runs an advanced search; direct first, relay on rejection
    pub async fn search_docs(
        &self,
        query_expr: &str,
        rows: usize,
        page: usize,
    ) -> SourceResult<(Vec<ArchiveDoc>, usize)> {
        let url = Self::search_url(query_expr, rows, page);
        let response: AdvancedSearchResponse = self.client.get_json_with_relay(&url).await?;
        let total = response.response.num_found;
        Ok((response.response.docs, total))
    }

    /// Fetches the file manifest for one archive item
    pub async fn files(&self, identifier: &str) -> SourceResult<Vec<ArchiveFile>> {
        let url = format!("https://archive.org/metadata/{identifier}");
        let response: MetadataResponse = self.client.get_json(&url).await?;
        Ok(response.files)
    }

    /// First file matching the audio allowlist, as a download URL
    pub async fn first_audio_url(&self, identifier: &str) -> SourceResult<Option<String>> {
        let files = self.files(identifier).await?;
        Ok(files
            .iter()
            .find(|f| f.is_accepted_audio())
            .map(|f| Self::download_url(identifier, &f.name)))
    }

    pub fn download_url(identifier: &str, file_name: &str) -> String {
        format!("https://archive.org/download/{identifier}/{file_name}")
    }

    pub fn cover_url(identifier: &str) -> String {
        format!("https://archive.org/services/img/{identifier}")
    }

    pub fn details_url(identifier: &str) -> String {
        format!("https://archive.org/details/{identifier}")
    }
}

/// General audiobook search over archive.org
pub struct ArchiveAdapter {
    archive: ArchiveClient,
}

impl ArchiveAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self {
            archive: ArchiveClient::new(client),
        }
    }

    /// Restricts free text to audio items tagged as audiobooks
    fn query_expr(query: &SearchQuery) -> String {
        let base = "mediatype:audio AND (subject:audiobook OR subject:librivox)";
        if query.is_browse() {
            base.to_string()
        } else {
            format!("({}) AND {}", query.text.trim(), base)
        }
    }

    fn normalize(doc: ArchiveDoc) -> Item {
        let mut item = Item::new(SourceId::Archive, &doc.identifier, SOURCE_LABEL);

        item.title = util::or_default(&doc.title, "Untitled");
        item.author = doc
            .creator
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        item.description = doc.description.unwrap_or_default();
        item.language = doc
            .language
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "en".to_string());
        item.genre = doc
            .subject
            .first()
            .cloned()
            .unwrap_or_else(|| "General".to_string());
        item.duration_seconds = parse_duration(doc.runtime.as_deref());
        // Audio URL is resolved on demand via the metadata endpoint
        item.audio_url = None;
        item.cover_url = Some(ArchiveClient::cover_url(&doc.identifier));
        item.details_url = ArchiveClient::details_url(&doc.identifier);
        item.downloads = doc.downloads;
        item
    }
}

#[async_trait]
impl SourceAdapter for ArchiveAdapter {
    fn id(&self) -> SourceId {
        SourceId::Archive
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Large collection of audiobooks and audio content".to_string(),
            base_url: SEARCH_BASE.to_string(),
        }
    }

    async fn search(&self, query: &SearchQuery) -> SourceResult<SearchPage> {
        let page = query.offset / query.limit.max(1) + 1;
        let (docs, total) = self
            .archive
            .search_docs(&Self::query_expr(query), query.limit, page)
            .await?;
        let items = docs.into_iter().map(Self::normalize).collect();
        Ok(SearchPage::new(items, total))
    }

    async fn resolve_audio(&self, raw_id: &str) -> SourceResult<Option<String>> {
        self.archive.first_audio_url(raw_id).await
    }
}

#[derive(Debug, Deserialize)]
struct AdvancedSearchResponse {
    #[serde(default)]
    response: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
struct SearchBody {
    #[serde(default)]
    docs: Vec<ArchiveDoc>,
    #[serde(default, rename = "numFound")]
    num_found: usize,
}

/// One document from the advanced-search response
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveDoc {
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "util::first_string")]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "util::first_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "util::string_list")]
    pub subject: Vec<String>,
    #[serde(default, deserialize_with = "util::first_string")]
    pub language: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub downloads: u64,
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    files: Vec<ArchiveFile>,
}

/// One file from an archive item's manifest
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: String,
    /// Duration as `H:MM:SS`, `MM:SS`, or fractional seconds
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "util::string_or_number")]
    pub size: String,
}

impl ArchiveFile {
    /// True when the declared format is on the audio allowlist
    pub fn is_accepted_audio(&self) -> bool {
        AUDIO_FORMATS.contains(&self.format.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_expr_with_text() {
        let expr = ArchiveAdapter::query_expr(&SearchQuery::new("sherlock holmes"));
        assert_eq!(
            expr,
            "(sherlock holmes) AND mediatype:audio AND (subject:audiobook OR subject:librivox)"
        );
    }

    #[test]
    fn test_query_expr_browse() {
        let expr = ArchiveAdapter::query_expr(&SearchQuery::default_set());
        assert_eq!(
            expr,
            "mediatype:audio AND (subject:audiobook OR subject:librivox)"
        );
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = ArchiveClient::search_url("mediatype:audio AND x", 25, 1);
        assert!(url.starts_with(SEARCH_BASE));
        assert!(url.contains("rows=25"));
        assert!(url.contains("page=1"));
        assert!(url.contains("output=json"));
        assert!(url.contains("sort=downloads%20desc"));
        assert!(!url.contains("mediatype:audio AND x"));
    }

    #[test]
    fn test_normalize_doc() {
        let json = r#"{
            "identifier": "holmes_adventures_1008",
            "title": "The Adventures of Sherlock Holmes",
            "creator": ["Arthur Conan Doyle"],
            "description": "Twelve stories.",
            "subject": ["audiobook", "detective"],
            "language": "eng",
            "runtime": "10:30:00",
            "downloads": 54321
        }"#;
        let doc: ArchiveDoc = serde_json::from_str(json).unwrap();
        let item = ArchiveAdapter::normalize(doc);

        assert_eq!(item.id, "archive-holmes_adventures_1008");
        assert_eq!(item.author, "Arthur Conan Doyle");
        assert_eq!(item.genre, "audiobook");
        assert_eq!(item.duration_seconds, 37800);
        assert!(item.audio_url.is_none());
        assert!(item.needs_audio_resolution());
        assert_eq!(
            item.cover_url.as_deref(),
            Some("https://archive.org/services/img/holmes_adventures_1008")
        );
        assert_eq!(item.downloads, 54321);
    }

    #[test]
    fn test_normalize_minimal_doc() {
        let doc: ArchiveDoc = serde_json::from_str(r#"{"identifier": "x"}"#).unwrap();
        let item = ArchiveAdapter::normalize(doc);
        assert_eq!(item.title, "Untitled");
        assert_eq!(item.author, "Unknown");
        assert_eq!(item.genre, "General");
        assert_eq!(item.language, "en");
        assert_eq!(item.duration_seconds, 0);
    }

    #[test]
    fn test_audio_allowlist() {
        let mk = |format: &str| ArchiveFile {
            name: "f.mp3".to_string(),
            format: format.to_string(),
            length: None,
            size: String::new(),
        };
        assert!(mk("VBR MP3").is_accepted_audio());
        assert!(mk("Ogg Vorbis").is_accepted_audio());
        assert!(mk("64Kbps MP3").is_accepted_audio());
        assert!(mk("MP3").is_accepted_audio());
        assert!(!mk("Metadata").is_accepted_audio());
        assert!(!mk("JPEG").is_accepted_audio());
    }

    #[test]
    fn test_download_url() {
        assert_eq!(
            ArchiveClient::download_url("item1", "01_chapter.mp3"),
            "https://archive.org/download/item1/01_chapter.mp3"
        );
    }
}
