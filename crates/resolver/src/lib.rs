// crates/resolver/src/lib.rs
//! Chapter resolution: turn a catalog item into a playable manifest
//!
//! Each source exposes its track list differently. LibriVox has a sections
//! API, the archive-backed sources list per-item files, podcasts have an
//! episode lookup, and feed items carry a single direct URL. The resolver
//! hides all of that behind one call that always produces a [`Manifest`],
//! falling back to a one-segment manifest (direct URL) or the empty manifest
//! rather than surfacing errors.

use brewbooks_core::{parse_duration, Item, Manifest, Segment, SourceId};
use brewbooks_network::HttpClient;
use brewbooks_sources::{ArchiveClient, ArchiveFile, LibriVoxAdapter, PodcastAdapter};
use std::cmp::Ordering;

pub struct ChapterResolver {
    librivox: LibriVoxAdapter,
    archive: ArchiveClient,
    podcast: PodcastAdapter,
}

impl ChapterResolver {
    pub fn new(client: HttpClient) -> Self {
        Self {
            librivox: LibriVoxAdapter::new(client.clone()),
            archive: ArchiveClient::new(client.clone()),
            podcast: PodcastAdapter::new(client),
        }
    }

    /// Resolves the track list for an item. Never fails: resolution errors
    /// are logged and degrade to the single-segment or empty manifest.
    pub async fn fetch_chapters(&self, item: &Item) -> Manifest {
        let structured = match item.source {
            SourceId::Librivox => self.librivox_chapters(item).await,
            SourceId::Archive | SourceId::Bbc | SourceId::Lit2Go | SourceId::Storynory => {
                self.archive_chapters(item).await
            }
            SourceId::Podcast => self.podcast_chapters(item).await,
            SourceId::OpenLibrary | SourceId::Gutenberg => Manifest::empty(),
        };
        if !structured.is_empty() {
            return structured;
        }
        // Single-file items still play as a one-chapter book
        match &item.audio_url {
            Some(url) => Manifest::single(&item.id, &item.title, url, item.duration_seconds),
            None => Manifest::empty(),
        }
    }

    async fn librivox_chapters(&self, item: &Item) -> Manifest {
        let Some(raw_id) = raw_id(item) else {
            return Manifest::empty();
        };
        let sections = match self.librivox.sections(&raw_id).await {
            Ok(sections) => sections,
            Err(e) => {
                log::warn!("librivox sections failed for {}: {e}", item.id);
                return Manifest::empty();
            }
        };
        let segments = sections
            .into_iter()
            .filter(|s| !s.listen_url.is_empty())
            .enumerate()
            .map(|(i, s)| Segment {
                id: s.id,
                ordinal: (i + 1) as u32,
                title: fallback_title(&s.title, i),
                audio_url: s.listen_url,
                duration_seconds: s.totaltimesecs.parse().unwrap_or(0),
                reader: s
                    .readers
                    .first()
                    .map(|r| r.display_name.clone())
                    .filter(|name| !name.is_empty()),
            })
            .collect();
        Manifest::from_segments(segments)
    }

    async fn archive_chapters(&self, item: &Item) -> Manifest {
        let Some(identifier) = raw_id(item) else {
            return Manifest::empty();
        };
        let files = match self.archive.files(&identifier).await {
            Ok(files) => files,
            Err(e) => {
                log::warn!("archive file listing failed for {}: {e}", item.id);
                return Manifest::empty();
            }
        };

        let mut audio: Vec<ArchiveFile> = files
            .into_iter()
            .filter(ArchiveFile::is_accepted_audio)
            .collect();
        // Filenames are usually numbered; 2 must sort before 10
        audio.sort_by(|a, b| compare_numeric(&a.name.to_lowercase(), &b.name.to_lowercase()));

        let segments = audio
            .iter()
            .enumerate()
            .map(|(i, file)| Segment {
                id: format!("{identifier}-{i}"),
                ordinal: (i + 1) as u32,
                title: chapter_title(&file.name, i),
                audio_url: ArchiveClient::download_url(&identifier, &file.name),
                duration_seconds: parse_duration(file.length.as_deref()),
                reader: None,
            })
            .collect();
        Manifest::from_segments(segments)
    }

    async fn podcast_chapters(&self, item: &Item) -> Manifest {
        let Some(collection_id) = raw_id(item) else {
            return Manifest::empty();
        };
        let episodes = match self.podcast.episodes(&collection_id).await {
            Ok(episodes) => episodes,
            Err(e) => {
                log::warn!("podcast episode lookup failed for {}: {e}", item.id);
                return Manifest::empty();
            }
        };
        let segments = episodes
            .into_iter()
            .filter(|ep| ep.audio_url.is_some())
            .enumerate()
            .map(|(i, ep)| Segment {
                id: ep.id,
                ordinal: (i + 1) as u32,
                title: ep.title,
                audio_url: ep.audio_url.unwrap_or_default(),
                duration_seconds: ep.duration_seconds,
                reader: None,
            })
            .collect();
        Manifest::from_segments(segments)
    }
}

/// Source-local identifier: the stored raw id, else the global id minus its
/// source prefix
fn raw_id(item: &Item) -> Option<String> {
    if let Some(raw) = &item.raw_source_id {
        if !raw.is_empty() {
            return Some(raw.clone());
        }
    }
    let prefix = format!("{}-", item.source.as_str());
    item.id
        .strip_prefix(&prefix)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn fallback_title(title: &str, index: usize) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        format!("Chapter {}", index + 1)
    } else {
        trimmed.to_string()
    }
}

/// Chapter title from an audio filename: extension off, underscores to
/// spaces, leading track number off
fn chapter_title(file_name: &str, index: usize) -> String {
    let stem = strip_audio_extension(file_name);
    let spaced = stem.replace('_', " ");
    let cleaned = strip_leading_number(spaced.trim());
    fallback_title(cleaned, index)
}

fn strip_audio_extension(name: &str) -> &str {
    for ext in [".mp3", ".ogg"] {
        let cut = name.len().saturating_sub(ext.len());
        if cut > 0 && name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(ext) {
            return &name[..cut];
        }
    }
    name
}

/// Strips a `NN - ` / `NN ` style prefix
fn strip_leading_number(name: &str) -> &str {
    let digits = name.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return name;
    }
    let mut rest = name[digits..].trim_start();
    if let Some(after) = rest.strip_prefix('-') {
        rest = after.trim_start();
    }
    rest
}

/// Orders strings with embedded integers by numeric value
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let (mut ai, mut bi) = (a.as_bytes(), b.as_bytes());
    loop {
        match (ai.first(), bi.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&ca), Some(&cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let (na, rest_a) = take_number(ai);
                    let (nb, rest_b) = take_number(bi);
                    match na.cmp(&nb) {
                        Ordering::Equal => {
                            ai = rest_a;
                            bi = rest_b;
                        }
                        other => return other,
                    }
                } else {
                    match ca.cmp(&cb) {
                        Ordering::Equal => {
                            ai = &ai[1..];
                            bi = &bi[1..];
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(bytes: &[u8]) -> (u128, &[u8]) {
    let len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut value: u128 = 0;
    for &b in &bytes[..len] {
        value = value.saturating_mul(10).saturating_add((b - b'0') as u128);
    }
    (value, &bytes[len..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_numeric() {
        assert_eq!(compare_numeric("2.mp3", "10.mp3"), Ordering::Less);
        assert_eq!(compare_numeric("ch2", "ch10"), Ordering::Less);
        assert_eq!(compare_numeric("ch10", "ch10"), Ordering::Equal);
        assert_eq!(compare_numeric("b1", "a2"), Ordering::Greater);
        assert_eq!(compare_numeric("01_intro", "02_body"), Ordering::Less);
    }

    #[test]
    fn test_chapter_title() {
        assert_eq!(chapter_title("01_the_cask_of_amontillado.mp3", 0), "the cask of amontillado");
        assert_eq!(chapter_title("02 - Chapter Two.MP3", 1), "Chapter Two");
        assert_eq!(chapter_title("prologue.ogg", 0), "prologue");
        assert_eq!(chapter_title("03.mp3", 2), "Chapter 3");
    }

    #[test]
    fn test_raw_id_prefers_stored_value() {
        let mut item = Item::new(SourceId::Archive, "holmes_1008", "Internet Archive");
        assert_eq!(raw_id(&item).as_deref(), Some("holmes_1008"));

        item.raw_source_id = None;
        assert_eq!(raw_id(&item).as_deref(), Some("holmes_1008"));

        item.id = "archive-".to_string();
        assert!(raw_id(&item).is_none());
    }

    #[tokio::test]
    async fn test_unresolvable_item_with_direct_url_gets_single_segment() {
        let resolver = ChapterResolver::new(HttpClient::new().expect("client"));
        let mut item = Item::new(SourceId::Gutenberg, "2701", "Project Gutenberg (Text)");
        item.title = "Moby Dick".to_string();
        item.audio_url = Some("https://example.com/moby.mp3".to_string());
        item.duration_seconds = 120;

        let manifest = resolver.fetch_chapters(&item).await;
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.items[0].title, "Moby Dick");
        assert_eq!(manifest.total_duration_seconds, 120);
    }

    #[tokio::test]
    async fn test_unresolvable_item_without_url_gets_empty_manifest() {
        let resolver = ChapterResolver::new(HttpClient::new().expect("client"));
        let item = Item::new(SourceId::OpenLibrary, "OL1W", "Open Library");
        let manifest = resolver.fetch_chapters(&item).await;
        assert!(manifest.is_empty());
    }
}
