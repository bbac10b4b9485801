//! Playable manifest shape produced by chapter resolution

use serde::{Deserialize, Serialize};

/// One playable audio unit (chapter or episode) within a manifest.
///
/// Unlike `Item`, the audio URL is required here: a segment that cannot be
/// played is not a segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    /// 1-based position in playback order
    pub ordinal: u32,
    pub title: String,
    pub audio_url: String,
    pub duration_seconds: u64,
    pub reader: Option<String>,
}

/// Ordered list of segments plus aggregate duration for one item.
///
/// The empty manifest is a valid "nothing playable" result; resolution never
/// returns an error upward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub items: Vec<Segment>,
    pub total_duration_seconds: u64,
}

impl Manifest {
    /// Builds a manifest from segments, re-numbering ordinals contiguously
    /// from 1 and computing the total duration. Input order is preserved.
    pub fn from_segments(mut segments: Vec<Segment>) -> Self {
        for (i, seg) in segments.iter_mut().enumerate() {
            seg.ordinal = (i + 1) as u32;
        }
        let total = segments.iter().map(|s| s.duration_seconds).sum();
        Self {
            items: segments,
            total_duration_seconds: total,
        }
    }

    /// The empty "nothing playable" manifest
    pub fn empty() -> Self {
        Self::default()
    }

    /// One-segment manifest synthesized from an item with a direct URL
    pub fn single(id: &str, title: &str, audio_url: &str, duration_seconds: u64) -> Self {
        Self::from_segments(vec![Segment {
            id: id.to_string(),
            ordinal: 1,
            title: title.to_string(),
            audio_url: audio_url.to_string(),
            duration_seconds,
            reader: None,
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(title: &str, duration: u64) -> Segment {
        Segment {
            id: format!("seg-{title}"),
            ordinal: 0,
            title: title.to_string(),
            audio_url: format!("http://example.com/{title}.mp3"),
            duration_seconds: duration,
            reader: None,
        }
    }

    #[test]
    fn test_ordinals_contiguous_and_total_summed() {
        let manifest = Manifest::from_segments(vec![seg("a", 10), seg("b", 20), seg("c", 5)]);
        let ordinals: Vec<u32> = manifest.items.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(manifest.total_duration_seconds, 35);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::empty();
        assert!(manifest.is_empty());
        assert_eq!(manifest.total_duration_seconds, 0);
    }

    #[test]
    fn test_single_segment() {
        let manifest = Manifest::single("id-1", "The Raven", "http://a/raven.mp3", 600);
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.items[0].ordinal, 1);
        assert_eq!(manifest.total_duration_seconds, 600);
    }
}
