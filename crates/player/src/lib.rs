// crates/player/src/lib.rs
//! Queue bookkeeping over a resolved [`Manifest`]
//!
//! The queue drives an abstract [`PlaybackDevice`] and reacts to its events.
//! It owns no audio: decoding, output and timers belong to the host's
//! device implementation. What lives here is the chapter-to-chapter logic
//! (which segment is loaded, auto-advance on end, position tracking).

use brewbooks_core::{Manifest, Segment};

/// Commands the queue issues to whatever actually plays audio
pub trait PlaybackDevice {
    fn load_url(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, seconds: u64);
    fn set_volume(&mut self, volume: f32);
    fn set_rate(&mut self, rate: f32);
}

/// Events the device reports back
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Playback position within the current segment
    Progress { position_seconds: u64 },
    /// The device learned the real duration of the loaded media
    DurationKnown { duration_seconds: u64 },
    /// The current segment finished
    Ended,
    Error(String),
}

/// Plays a manifest's segments in order, advancing on `Ended`
pub struct ManifestQueue<D: PlaybackDevice> {
    device: D,
    manifest: Manifest,
    current: Option<usize>,
    position_seconds: u64,
    duration_seconds: u64,
    completed: bool,
}

impl<D: PlaybackDevice> ManifestQueue<D> {
    pub fn new(device: D, manifest: Manifest) -> Self {
        Self {
            device,
            manifest,
            current: None,
            position_seconds: 0,
            duration_seconds: 0,
            completed: false,
        }
    }

    /// Loads and plays the segment at `index`. Returns false when the index
    /// is out of range (including any index into an empty manifest).
    pub fn start(&mut self, index: usize) -> bool {
        let Some(segment) = self.manifest.items.get(index) else {
            return false;
        };
        let url = segment.audio_url.clone();
        let duration = segment.duration_seconds;
        self.device.load_url(&url);
        self.device.play();
        self.current = Some(index);
        self.position_seconds = 0;
        self.duration_seconds = duration;
        self.completed = false;
        true
    }

    pub fn pause(&mut self) {
        self.device.pause();
    }

    pub fn resume(&mut self) {
        self.device.play();
    }

    pub fn seek_to(&mut self, seconds: u64) {
        self.device.seek_to(seconds);
        self.position_seconds = seconds;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.device.set_volume(volume);
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.device.set_rate(rate);
    }

    /// Feeds one device event into the queue's bookkeeping
    pub fn on_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Progress { position_seconds } => {
                self.position_seconds = position_seconds;
            }
            PlayerEvent::DurationKnown { duration_seconds } => {
                self.duration_seconds = duration_seconds;
            }
            PlayerEvent::Ended => self.advance(),
            PlayerEvent::Error(message) => {
                log::warn!("playback error on segment {:?}: {message}", self.current);
            }
        }
    }

    fn advance(&mut self) {
        let Some(current) = self.current else {
            return;
        };
        let next = current + 1;
        if next < self.manifest.len() {
            self.start(next);
        } else {
            self.completed = true;
            self.current = None;
        }
    }

    pub fn current_segment(&self) -> Option<&Segment> {
        self.current.and_then(|i| self.manifest.items.get(i))
    }

    pub fn position_seconds(&self) -> u64 {
        self.position_seconds
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// True once the final segment has ended
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
