// crates/sources/src/lit2go.rs
//! Lit2Go educational audiobooks, via their archive.org uploads

use crate::archive::{ArchiveClient, ArchiveDoc};
use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::SourceResult;
use async_trait::async_trait;
use brewbooks_core::{parse_duration, Item, SourceId};
use brewbooks_network::HttpClient;

const SOURCE_LABEL: &str = "Lit2Go (Educational)";
const BASE_QUERY: &str = "(lit2go OR \"lit 2 go\" OR \"lit-2-go\")";

pub struct Lit2GoAdapter {
    archive: ArchiveClient,
}

impl Lit2GoAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self {
            archive: ArchiveClient::new(client),
        }
    }

    fn query_expr(query: &SearchQuery) -> String {
        if query.is_browse() {
            format!("{BASE_QUERY} AND mediatype:audio")
        } else {
            format!("{BASE_QUERY} AND ({}) AND mediatype:audio", query.text.trim())
        }
    }

    fn normalize(doc: ArchiveDoc) -> Item {
        let mut item = Item::new(SourceId::Lit2Go, &doc.identifier, SOURCE_LABEL);

        item.title = clean_title(&doc.title);
        item.author = doc
            .creator
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "Lit2Go".to_string());
        item.description = doc.description.unwrap_or_default();
        item.language = doc
            .language
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "en".to_string());
        item.genre = determine_genre(&doc.subject);
        item.duration_seconds = parse_duration(doc.runtime.as_deref());
        item.audio_url = None;
        item.cover_url = Some(ArchiveClient::cover_url(&doc.identifier));
        item.details_url = ArchiveClient::details_url(&doc.identifier);
        item.downloads = doc.downloads;
        item.flags.is_educational = true;
        item
    }
}

#[async_trait]
impl SourceAdapter for Lit2GoAdapter {
    fn id(&self) -> SourceId {
        SourceId::Lit2Go
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Educational audiobooks from the University of South Florida".to_string(),
            base_url: "https://archive.org/advancedsearch.php".to_string(),
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

/// Strips a `Lit2Go -` or `Lit2Go:` prefix
fn clean_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return "Untitled".to_string();
    }
    const PREFIX: &str = "lit2go";
    if title.len() > PREFIX.len()
        && title.is_char_boundary(PREFIX.len())
        && title[..PREFIX.len()].eq_ignore_ascii_case(PREFIX)
    {
        let rest = title[PREFIX.len()..].trim_start();
        if let Some(after) = rest.strip_prefix(['-', ':']) {
            let cleaned = after.trim_start();
            if !cleaned.is_empty() {
                return cleaned.to_string();
            }
        }
    }
    title.to_string()
}

fn determine_genre(subjects: &[String]) -> String {
    let combined = subjects.join(" ").to_lowercase();
    let genre = if combined.contains("poetry") {
        "Poetry"
    } else if combined.contains("drama") || combined.contains("play") {
        "Drama"
    } else if combined.contains("fiction") {
        "Fiction"
    } else if combined.contains("children") {
        "Children's Literature"
    } else if combined.contains("history") {
        "History"
    } else if combined.contains("philosophy") {
        "Philosophy"
    } else if combined.contains("science") {
        "Science"
    } else {
        "Educational"
    };
    genre.to_string()
}
