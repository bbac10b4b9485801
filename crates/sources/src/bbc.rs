// crates/sources/src/bbc.rs
//! BBC radio-drama uploads on archive.org

use crate::archive::{ArchiveClient, ArchiveDoc};
use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::SourceResult;
use async_trait::async_trait;
use brewbooks_core::{parse_duration, Item, SourceId};
use brewbooks_network::HttpClient;

const SOURCE_LABEL: &str = "BBC Radio Drama";
const BASE_QUERY: &str = "(BBC AND radio AND (drama OR comedy OR documentary))";

pub struct BbcAdapter {
    archive: ArchiveClient,
}

impl BbcAdapter {
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

    /// Canned category browse queries: drama, comedy, documentary, scifi
    pub async fn by_category(&self, category: &str, limit: usize) -> SourceResult<SearchPage> {
        let clause = match category {
            "comedy" => "(BBC AND radio AND comedy)",
            "documentary" => "(BBC AND radio AND documentary)",
            "scifi" => "(BBC AND radio AND (science fiction OR sci-fi))",
            _ => "(BBC AND radio AND drama)",
        };
        let expr = format!("{clause} AND mediatype:audio");
        let (docs, total) = self.archive.search_docs(&expr, limit, 1).await?;
        let items = docs.into_iter().map(Self::normalize).collect();
        Ok(SearchPage::new(items, total))
    }

    fn normalize(doc: ArchiveDoc) -> Item {
        let mut item = Item::new(SourceId::Bbc, &doc.identifier, SOURCE_LABEL);

        item.title = clean_title(&doc.title);
        item.author = "BBC Radio".to_string();
        item.description = doc.description.unwrap_or_default();
        item.language = doc
            .language
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "en".to_string());
        item.genre = determine_genre(&doc.subject, &doc.title);
        item.duration_seconds = parse_duration(doc.runtime.as_deref());
        item.audio_url = None;
        item.cover_url = Some(ArchiveClient::cover_url(&doc.identifier));
        item.details_url = ArchiveClient::details_url(&doc.identifier);
        item.downloads = doc.downloads;
        item.flags.is_full_cast = true;
        item
    }
}

#[async_trait]
impl SourceAdapter for BbcAdapter {
    fn id(&self) -> SourceId {
        SourceId::Bbc
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Full-cast BBC radio drama, comedy and documentaries".to_string(),
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

/// Strips `BBC Radio - `, `BBC: ` and `Radio - ` styles of prefix
fn clean_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return "Untitled".to_string();
    }
    let stripped = strip_prefix_ci(title, "bbc")
        .map(|rest| strip_prefix_ci(rest, "radio").unwrap_or(rest))
        .or_else(|| strip_prefix_ci(title, "radio"));
    match stripped.and_then(strip_separator) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => title.to_string(),
    }
}

/// Case-insensitive word prefix; returns the remainder with leading spaces trimmed
fn strip_prefix_ci<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    if text.len() >= word.len()
        && text.is_char_boundary(word.len())
        && text[..word.len()].eq_ignore_ascii_case(word)
    {
        Some(text[word.len()..].trim_start())
    } else {
        None
    }
}

fn strip_separator(text: &str) -> Option<&str> {
    text.strip_prefix(['-', ':']).map(str::trim_start)
}

fn determine_genre(subjects: &[String], title: &str) -> String {
    let mut combined = subjects.join(" ").to_lowercase();
    combined.push(' ');
    combined.push_str(&title.to_lowercase());

    let genre = if combined.contains("drama") {
        "Drama"
    } else if combined.contains("comedy") {
        "Comedy"
    } else if combined.contains("documentary") {
        "Documentary"
    } else if combined.contains("science fiction") || combined.contains("sci-fi") {
        "Science Fiction"
    } else if combined.contains("mystery") || combined.contains("detective") {
        "Mystery"
    } else if combined.contains("horror") {
        "Horror"
    } else if combined.contains("history") {
        "History"
    } else {
        "Drama"
    };
    genre.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_expr() {
        let expr = BbcAdapter::query_expr(&SearchQuery::new("hitchhiker"));
        assert_eq!(
            expr,
            "(BBC AND radio AND (drama OR comedy OR documentary)) AND (hitchhiker) AND mediatype:audio"
        );
        let browse = BbcAdapter::query_expr(&SearchQuery::default_set());
        assert_eq!(
            browse,
            "(BBC AND radio AND (drama OR comedy OR documentary)) AND mediatype:audio"
        );
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("BBC Radio - The Goon Show"), "The Goon Show");
        assert_eq!(clean_title("BBC: Hamlet"), "Hamlet");
        assert_eq!(clean_title("Radio - Journey Into Space"), "Journey Into Space");
        assert_eq!(clean_title("bbc radio: I'm Sorry"), "I'm Sorry");
        assert_eq!(clean_title("The Archers"), "The Archers");
        assert_eq!(clean_title(""), "Untitled");
    }

    #[test]
    fn test_determine_genre() {
        let subj = |s: &str| vec![s.to_string()];
        assert_eq!(determine_genre(&subj("radio comedy"), ""), "Comedy");
        assert_eq!(determine_genre(&[], "A Sci-Fi Serial"), "Science Fiction");
        assert_eq!(determine_genre(&subj("detective"), ""), "Mystery");
        assert_eq!(determine_genre(&[], "plain title"), "Drama");
    }

    #[test]
    fn test_normalize_sets_full_cast_flag() {
        let doc: ArchiveDoc =
            serde_json::from_str(r#"{"identifier": "goon_show", "title": "BBC - The Goon Show"}"#)
                .unwrap();
        let item = BbcAdapter::normalize(doc);
        assert_eq!(item.id, "bbc-goon_show");
        assert_eq!(item.title, "The Goon Show");
        assert_eq!(item.author, "BBC Radio");
        assert!(item.flags.is_full_cast);
        assert!(item.needs_audio_resolution());
    }
}
