// crates/storage/src/podcast.rs
//! Podcast subscriptions and per-episode listening state

use crate::kv::KeyValueStore;
use crate::library::LibraryStore;
use brewbooks_core::Item;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const KEY_SUBSCRIPTIONS: &str = "brewbooks-podcast-subscriptions";
const KEY_EPISODE_PROGRESS: &str = "brewbooks-episode-progress";
const KEY_PLAYED_EPISODES: &str = "brewbooks-played-episodes";

/// A subscribed show, frozen as it looked at subscribe time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(flatten)]
    pub item: Item,
    /// Unix millis at subscribe time
    pub subscribed_at: i64,
}

/// Where the listener stopped within one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeProgress {
    pub position_seconds: u64,
    pub duration_seconds: u64,
    /// Unix millis of the last update
    pub updated_at: i64,
}

impl EpisodeProgress {
    pub fn percentage(&self) -> f64 {
        if self.duration_seconds == 0 {
            0.0
        } else {
            self.position_seconds as f64 / self.duration_seconds as f64 * 100.0
        }
    }
}

impl<S: KeyValueStore> LibraryStore<S> {
    // Subscriptions, keyed by the show's raw collection id

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.read(KEY_SUBSCRIPTIONS)
    }

    pub fn subscribe(&mut self, podcast: &Item) {
        let mut subscriptions = self.subscriptions();
        if subscriptions
            .iter()
            .any(|s| s.item.raw_source_id == podcast.raw_source_id)
        {
            return;
        }
        subscriptions.push(Subscription {
            item: podcast.clone(),
            subscribed_at: Utc::now().timestamp_millis(),
        });
        self.write(KEY_SUBSCRIPTIONS, &subscriptions);
    }

    pub fn unsubscribe(&mut self, collection_id: &str) {
        let mut subscriptions = self.subscriptions();
        subscriptions.retain(|s| s.item.raw_source_id.as_deref() != Some(collection_id));
        self.write(KEY_SUBSCRIPTIONS, &subscriptions);
    }

    pub fn is_subscribed(&self, collection_id: &str) -> bool {
        self.subscriptions()
            .iter()
            .any(|s| s.item.raw_source_id.as_deref() == Some(collection_id))
    }

    // Episode progress

    pub fn episode_progress(&self, episode_id: &str) -> Option<EpisodeProgress> {
        let progress: HashMap<String, EpisodeProgress> = self.read(KEY_EPISODE_PROGRESS);
        progress.get(episode_id).cloned()
    }

    pub fn save_episode_progress(&mut self, episode_id: &str, position: u64, duration: u64) {
        let mut progress: HashMap<String, EpisodeProgress> = self.read(KEY_EPISODE_PROGRESS);
        progress.insert(
            episode_id.to_string(),
            EpisodeProgress {
                position_seconds: position,
                duration_seconds: duration,
                updated_at: Utc::now().timestamp_millis(),
            },
        );
        self.write(KEY_EPISODE_PROGRESS, &progress);
    }

    pub fn clear_episode_progress(&mut self, episode_id: &str) {
        let mut progress: HashMap<String, EpisodeProgress> = self.read(KEY_EPISODE_PROGRESS);
        progress.remove(episode_id);
        self.write(KEY_EPISODE_PROGRESS, &progress);
    }

    /// Episodes started but neither finished nor marked played, most
    /// recently touched first
    pub fn in_progress_episodes(&self) -> Vec<(String, EpisodeProgress)> {
        let progress: HashMap<String, EpisodeProgress> = self.read(KEY_EPISODE_PROGRESS);
        let played = self.played_episodes();
        let mut entries: Vec<(String, EpisodeProgress)> = progress
            .into_iter()
            .filter(|(id, _)| !played.contains(id))
            .collect();
        entries.sort_by_key(|(_, p)| std::cmp::Reverse(p.updated_at));
        entries
    }

    // Played set

    pub fn played_episodes(&self) -> Vec<String> {
        self.read(KEY_PLAYED_EPISODES)
    }

    /// Marking played also clears the in-progress position
    pub fn mark_played(&mut self, episode_id: &str) {
        let mut played = self.played_episodes();
        if !played.iter().any(|id| id == episode_id) {
            played.push(episode_id.to_string());
            self.write(KEY_PLAYED_EPISODES, &played);
        }
        self.clear_episode_progress(episode_id);
    }

    pub fn mark_unplayed(&mut self, episode_id: &str) {
        let mut played = self.played_episodes();
        played.retain(|id| id != episode_id);
        self.write(KEY_PLAYED_EPISODES, &played);
        self.clear_episode_progress(episode_id);
    }

    pub fn is_played(&self, episode_id: &str) -> bool {
        self.played_episodes().iter().any(|id| id == episode_id)
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

    fn podcast(collection_id: &str) -> Item {
        let mut item = Item::new(SourceId::Podcast, collection_id, "Podcast");
        item.flags.is_podcast = true;
        item
    }

    #[test]
    fn test_subscribe_dedups_by_collection_id() {
        let mut lib = store();
        lib.subscribe(&podcast("123"));
        lib.subscribe(&podcast("123"));
        lib.subscribe(&podcast("456"));

        assert_eq!(lib.subscriptions().len(), 2);
        assert!(lib.is_subscribed("123"));

        lib.unsubscribe("123");
        assert!(!lib.is_subscribed("123"));
        assert_eq!(lib.subscriptions().len(), 1);
    }

    #[test]
    fn test_progress_round_trip_and_percentage() {
        let mut lib = store();
        assert!(lib.episode_progress("episode-9").is_none());

        lib.save_episode_progress("episode-9", 300, 1200);
        let progress = lib.episode_progress("episode-9").unwrap();
        assert_eq!(progress.position_seconds, 300);
        assert_eq!(progress.percentage(), 25.0);
    }

    #[test]
    fn test_mark_played_clears_progress() {
        let mut lib = store();
        lib.save_episode_progress("episode-9", 1100, 1200);
        lib.mark_played("episode-9");

        assert!(lib.is_played("episode-9"));
        assert!(lib.episode_progress("episode-9").is_none());

        lib.mark_unplayed("episode-9");
        assert!(!lib.is_played("episode-9"));
    }

    #[test]
    fn test_in_progress_excludes_played() {
        let mut lib = store();
        lib.save_episode_progress("episode-1", 10, 100);
        lib.save_episode_progress("episode-2", 20, 100);
        lib.mark_played("episode-1");

        let in_progress = lib.in_progress_episodes();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].0, "episode-2");
    }

    #[test]
    fn test_zero_duration_percentage() {
        let progress = EpisodeProgress {
            position_seconds: 10,
            duration_seconds: 0,
            updated_at: 0,
        };
        assert_eq!(progress.percentage(), 0.0);
    }
}
