//! Domain models shared across the workspace

mod common;
mod item;
mod segment;

pub use common::parse_duration;
pub use item::{Item, SourceFlags, SourceId};
pub use segment::{Manifest, Segment};
