// crates/feed-parser/src/lib.rs
//! RSS parser for story and podcast feeds
//!
//! Parses RSS 2.0 with the iTunes extensions these feeds carry, cleans
//! HTML out of the text fields, and derives stable per-item identifiers so
//! the same episode keeps the same id across fetches.
//!
//! # Example
//!
//! ```rust
//! use brewbooks_feed_parser::FeedParser;
//!
//! let rss = r#"<?xml version="1.0"?>
//! <rss version="2.0"><channel>
//!   <title>Bedtime Tales</title>
//!   <item>
//!     <title>The Tin Soldier</title>
//!     <enclosure url="https://cdn.example.org/tin-soldier.mp3" type="audio/mpeg"/>
//!   </item>
//! </channel></rss>"#;
//!
//! let feed = FeedParser::parse(rss).expect("valid feed");
//! assert_eq!(feed.title, "Bedtime Tales");
//! assert_eq!(feed.audio_items().len(), 1);
//! ```

mod error;
mod feed;
mod parser;
pub mod sanitize;

pub use error::{FeedError, FeedResult};
pub use feed::{Enclosure, Feed, FeedItem};
pub use parser::FeedParser;
