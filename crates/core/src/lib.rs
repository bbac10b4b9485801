//! Core domain types for the Brewbooks aggregation layer
//!
//! Everything here is plain data: the normalized catalog record ([`Item`]),
//! the playable manifest shape ([`Manifest`], [`Segment`]), the source
//! taxonomy ([`SourceId`]) and the genre classifier. No I/O happens in this
//! crate; adapters and resolvers build these values from upstream responses.

pub mod genre;
pub mod types;

pub use genre::{match_genre, Genre, GenreCategory, ALL_GENRES, GENRE_CATEGORIES};
pub use types::{parse_duration, Item, Manifest, Segment, SourceFlags, SourceId};
