// crates/sources/src/podcast.rs
//! Podcast directory search and episode lookup via the iTunes API

use crate::traits::{SearchPage, SearchQuery, SourceAdapter, SourceMetadata};
use crate::{SourceError, SourceResult};
use async_trait::async_trait;
use brewbooks_core::{Item, SourceId};
use brewbooks_feed_parser::sanitize;
use brewbooks_network::{urlencoding, HttpClient};
use serde::Deserialize;

const SEARCH_BASE: &str = "https://itunes.apple.com/search";
const LOOKUP_BASE: &str = "https://itunes.apple.com/lookup";
const SOURCE_LABEL: &str = "Podcast";
const EPISODE_LOOKUP_LIMIT: usize = 100;

pub struct PodcastAdapter {
    client: HttpClient,
}

impl PodcastAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn search_url(term: &str, limit: usize) -> String {
        format!(
            "{}?term={}&media=podcast&entity=podcast&limit={}",
            SEARCH_BASE,
            urlencoding::encode(term),
            limit,
        )
    }

    async fn search_term(&self, term: &str, limit: usize) -> SourceResult<SearchPage> {
        let url = Self::search_url(term, limit);
        let response: ItunesResponse<ItunesPodcast> = self.client.get_json(&url).await?;
        let items: Vec<Item> = response.results.into_iter().map(Self::normalize).collect();
        let total = items.len();
        Ok(SearchPage::new(items, total))
    }

    /// Episode list for one show. The lookup returns the podcast itself as
    /// the first result and its episodes after it.
    pub async fn episodes(&self, collection_id: &str) -> SourceResult<Vec<PodcastEpisode>> {
        let url = format!(
            "{}?id={}&entity=podcastEpisode&limit={}",
            LOOKUP_BASE,
            urlencoding::encode(collection_id),
            EPISODE_LOOKUP_LIMIT,
        );
        let response: ItunesResponse<ItunesEpisode> = self.client.get_json(&url).await?;
        if response.results.is_empty() {
            return Err(SourceError::NotFound);
        }
        Ok(response
            .results
            .into_iter()
            .skip(1)
            .map(PodcastEpisode::from)
            .collect())
    }

    /// The free API has no chart endpoint, so popular-term searches stand in
    pub async fn top_podcasts(&self, genre: &str, limit: usize) -> SourceResult<SearchPage> {
        let term = match genre {
            "comedy" => "comedy podcast",
            "education" => "educational podcast",
            "fiction" => "fiction podcast",
            "history" => "history podcast",
            "news" => "news daily",
            "science" => "science podcast",
            "society" => "society culture",
            "sports" => "sports podcast",
            "technology" => "tech podcast",
            "true-crime" => "true crime",
            _ => "podcast",
        };
        self.search_term(term, limit).await
    }

    fn normalize(podcast: ItunesPodcast) -> Item {
        let collection_id = podcast
            .collection_id
            .or(podcast.track_id)
            .map(|id| id.to_string())
            .unwrap_or_default();
        let mut item = Item::new(SourceId::Podcast, &collection_id, SOURCE_LABEL);

        let title = podcast
            .collection_name
            .or(podcast.track_name)
            .filter(|t| !t.trim().is_empty());
        item.title = title.unwrap_or_else(|| "Untitled Podcast".to_string());
        if let Some(artist) = podcast.artist_name.filter(|a| !a.trim().is_empty()) {
            item.author = artist;
        }
        item.description = sanitize::clean_text(&podcast.description.unwrap_or_default());
        item.genre = podcast
            .primary_genre_name
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| "Podcast".to_string());
        item.cover_url = podcast
            .artwork_url_600
            .or(podcast.artwork_url_100)
            .map(|url| upscale_artwork(&url));
        item.details_url = podcast
            .collection_view_url
            .or(podcast.track_view_url)
            .unwrap_or_default();
        item.section_count = podcast.track_count.unwrap_or(0);
        item.flags.is_podcast = true;
        item
    }
}

#[async_trait]
impl SourceAdapter for PodcastAdapter {
    fn id(&self) -> SourceId {
        SourceId::Podcast
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_LABEL.to_string(),
            description: "Podcast search via the iTunes directory".to_string(),
            base_url: SEARCH_BASE.to_string(),
        }
    }

    async fn search(&self, query: &SearchQuery) -> SourceResult<SearchPage> {
        self.search_term(query.text.trim(), query.limit).await
    }
}

/// One playable episode from the lookup endpoint
#[derive(Debug, Clone)]
pub struct PodcastEpisode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub audio_url: Option<String>,
    pub duration_seconds: u64,
    pub release_date: Option<String>,
    pub cover_url: Option<String>,
}

impl From<ItunesEpisode> for PodcastEpisode {
    fn from(ep: ItunesEpisode) -> Self {
        Self {
            id: format!("episode-{}", ep.track_id.unwrap_or(0)),
            title: ep
                .track_name
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled Episode".to_string()),
            description: sanitize::clean_text(&ep.description.unwrap_or_default()),
            audio_url: ep.episode_url.filter(|u| !u.is_empty()),
            duration_seconds: ep.track_time_millis.unwrap_or(0) / 1000,
            release_date: ep.release_date,
            cover_url: ep
                .artwork_url_600
                .or(ep.artwork_url_160)
                .map(|url| upscale_artwork(&url)),
        }
    }
}

/// Rewrites the first `/NNNxNNN` size marker of an iTunes artwork URL to
/// 600x600, keeping whatever trails it (`/100x100bb.jpg` variants included)
fn upscale_artwork(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut i = 0;
    while let Some(slash) = url[i..].find('/') {
        let start = i + slash + 1;
        if let Some(len) = size_marker_len(&bytes[start..]) {
            let mut out = String::with_capacity(url.len());
            out.push_str(&url[..start]);
            out.push_str("600x600");
            out.push_str(&url[start + len..]);
            return out;
        }
        i = start;
    }
    url.to_string()
}

/// Length of a leading `<digits>x<digits>` run, if present
fn size_marker_len(bytes: &[u8]) -> Option<usize> {
    let width = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if width == 0 || bytes.get(width) != Some(&b'x') {
        return None;
    }
    let height = bytes[width + 1..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if height == 0 {
        return None;
    }
    Some(width + 1 + height)
}

#[derive(Debug, Deserialize)]
struct ItunesResponse<T> {
    #[serde(default)]
    results: Vec<T>,
}

// Default is required by the derived Deserialize for ItunesResponse<T>,
// whose #[serde(default)] results field puts a T: Default bound on it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItunesPodcast {
    #[serde(default)]
    collection_id: Option<u64>,
    #[serde(default)]
    track_id: Option<u64>,
    #[serde(default)]
    collection_name: Option<String>,
    #[serde(default)]
    track_name: Option<String>,
    #[serde(default)]
    artist_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    primary_genre_name: Option<String>,
    #[serde(default, rename = "artworkUrl600")]
    artwork_url_600: Option<String>,
    #[serde(default, rename = "artworkUrl100")]
    artwork_url_100: Option<String>,
    #[serde(default)]
    collection_view_url: Option<String>,
    #[serde(default)]
    track_view_url: Option<String>,
    #[serde(default)]
    track_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItunesEpisode {
    #[serde(default)]
    track_id: Option<u64>,
    #[serde(default)]
    track_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    episode_url: Option<String>,
    #[serde(default)]
    track_time_millis: Option<u64>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default, rename = "artworkUrl600")]
    artwork_url_600: Option<String>,
    #[serde(default, rename = "artworkUrl160")]
    artwork_url_160: Option<String>,
}
