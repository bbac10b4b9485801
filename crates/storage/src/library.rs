// crates/storage/src/library.rs
//! Bookmarks, recently played, playback positions and settings

use crate::kv::KeyValueStore;
use brewbooks_core::Item;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const KEY_BOOKMARKS: &str = "brewbooks-bookmarks";
const KEY_RECENT: &str = "brewbooks-recent";
const KEY_POSITIONS: &str = "brewbooks-positions";
const KEY_SETTINGS: &str = "brewbooks-settings";

/// Keep only the most recent plays
const RECENT_CAP: usize = 50;

/// A bookmarked item, frozen as it looked when saved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkEntry {
    #[serde(flatten)]
    pub item: Item,
    /// Unix millis at save time
    pub bookmarked_at: i64,
}

/// A recently played item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentEntry {
    #[serde(flatten)]
    pub item: Item,
    /// Unix millis at play time
    pub played_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback_speed: f64,
    pub auto_play: bool,
    /// Minutes until auto-pause, when set
    pub sleep_timer: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playback_speed: 1.0,
            auto_play: false,
            sleep_timer: None,
        }
    }
}

/// Library state over any [`KeyValueStore`] backend
pub struct LibraryStore<S: KeyValueStore> {
    pub(crate) store: S,
}

impl<S: KeyValueStore> LibraryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Hands the backend back, for hosts that own its lifecycle
    pub fn into_inner(self) -> S {
        self.store
    }

    pub(crate) fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.store.get(key) else {
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("discarding corrupt entry under {key}: {e}");
                T::default()
            }
        }
    }

    pub(crate) fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(key, &raw),
            Err(e) => log::warn!("failed to serialize entry for {key}: {e}"),
        }
    }

    // Bookmarks

    pub fn bookmarks(&self) -> Vec<BookmarkEntry> {
        self.read(KEY_BOOKMARKS)
    }

    /// Saves a bookmark at the front of the list. Already-bookmarked items
    /// are left untouched.
    pub fn add_bookmark(&mut self, item: &Item) {
        let mut bookmarks = self.bookmarks();
        if bookmarks.iter().any(|b| b.item.id == item.id) {
            return;
        }
        bookmarks.insert(
            0,
            BookmarkEntry {
                item: item.clone(),
                bookmarked_at: Utc::now().timestamp_millis(),
            },
        );
        self.write(KEY_BOOKMARKS, &bookmarks);
    }

    pub fn remove_bookmark(&mut self, item_id: &str) {
        let mut bookmarks = self.bookmarks();
        bookmarks.retain(|b| b.item.id != item_id);
        self.write(KEY_BOOKMARKS, &bookmarks);
    }

    pub fn is_bookmarked(&self, item_id: &str) -> bool {
        self.bookmarks().iter().any(|b| b.item.id == item_id)
    }

    // Recently played

    pub fn recent(&self) -> Vec<RecentEntry> {
        self.read(KEY_RECENT)
    }

    /// Pushes an item to the front of the recents list, dropping any older
    /// entry for the same item and anything beyond the cap
    pub fn add_recent(&mut self, item: &Item) {
        let mut recent = self.recent();
        recent.retain(|r| r.item.id != item.id);
        recent.insert(
            0,
            RecentEntry {
                item: item.clone(),
                played_at: Utc::now().timestamp_millis(),
            },
        );
        recent.truncate(RECENT_CAP);
        self.write(KEY_RECENT, &recent);
    }

    // Playback positions

    pub fn position(&self, item_id: &str) -> u64 {
        let positions: HashMap<String, u64> = self.read(KEY_POSITIONS);
        positions.get(item_id).copied().unwrap_or(0)
    }

    pub fn set_position(&mut self, item_id: &str, seconds: u64) {
        let mut positions: HashMap<String, u64> = self.read(KEY_POSITIONS);
        positions.insert(item_id.to_string(), seconds);
        self.write(KEY_POSITIONS, &positions);
    }

    // Settings

    pub fn settings(&self) -> Settings {
        self.read(KEY_SETTINGS)
    }

    pub fn update_settings(&mut self, update: impl FnOnce(&mut Settings)) -> Settings {
        let mut settings = self.settings();
        update(&mut settings);
        self.write(KEY_SETTINGS, &settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use brewbooks_core::SourceId;

    fn store() -> LibraryStore<MemoryStore> {
        LibraryStore::new(MemoryStore::new())
    }

    fn item(local_id: &str, title: &str) -> Item {
        let mut item = Item::new(SourceId::Librivox, local_id, "LibriVox");
        item.title = title.to_string();
        item
    }

    #[test]
    fn test_bookmarks_newest_first_and_dedup() {
        let mut lib = store();
        lib.add_bookmark(&item("1", "Dracula"));
        lib.add_bookmark(&item("2", "Carmilla"));
        lib.add_bookmark(&item("1", "Dracula"));

        let bookmarks = lib.bookmarks();
        assert_eq!(bookmarks.len(), 2);
        assert_eq!(bookmarks[0].item.id, "librivox-2");
        assert_eq!(bookmarks[1].item.id, "librivox-1");
        assert!(lib.is_bookmarked("librivox-1"));

        lib.remove_bookmark("librivox-1");
        assert!(!lib.is_bookmarked("librivox-1"));
        assert_eq!(lib.bookmarks().len(), 1);
    }

    #[test]
    fn test_recents_cap_and_move_to_front() {
        let mut lib = store();
        for i in 0..60 {
            lib.add_recent(&item(&i.to_string(), &format!("Book {i}")));
        }
        let recent = lib.recent();
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].item.id, "librivox-59");

        // Replaying an old entry moves it to the front without growing the list
        lib.add_recent(&item("30", "Book 30"));
        let recent = lib.recent();
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].item.id, "librivox-30");
    }

    #[test]
    fn test_positions_default_zero() {
        let mut lib = store();
        assert_eq!(lib.position("librivox-1"), 0);
        lib.set_position("librivox-1", 742);
        assert_eq!(lib.position("librivox-1"), 742);
        assert_eq!(lib.position("librivox-2"), 0);
    }

    #[test]
    fn test_settings_defaults_and_update() {
        let mut lib = store();
        let settings = lib.settings();
        assert_eq!(settings.playback_speed, 1.0);
        assert!(!settings.auto_play);
        assert!(settings.sleep_timer.is_none());

        lib.update_settings(|s| {
            s.playback_speed = 1.5;
            s.sleep_timer = Some(30);
        });
        let settings = lib.settings();
        assert_eq!(settings.playback_speed, 1.5);
        assert_eq!(settings.sleep_timer, Some(30));
    }

    #[test]
    fn test_corrupt_json_degrades_to_empty() {
        let mut backing = MemoryStore::new();
        backing.set(KEY_BOOKMARKS, "{not json");
        backing.set(KEY_SETTINGS, "[]");
        let lib = LibraryStore::new(backing);

        assert!(lib.bookmarks().is_empty());
        assert_eq!(lib.settings(), Settings::default());
    }
}
