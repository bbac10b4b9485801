// crates/storage/src/lib.rs
//! Persistent library state: bookmarks, recents, positions, settings and
//! podcast subscriptions
//!
//! Everything is stored as JSON strings behind the [`KeyValueStore`] trait,
//! so the same [`LibraryStore`] runs against the in-memory store in tests
//! and whatever durable backend the host app provides. Reads never fail:
//! missing or corrupt entries degrade to empty defaults.

mod kv;
mod library;
mod podcast;

pub use kv::{KeyValueStore, MemoryStore};
pub use library::{BookmarkEntry, LibraryStore, RecentEntry, Settings};
pub use podcast::{EpisodeProgress, Subscription};
