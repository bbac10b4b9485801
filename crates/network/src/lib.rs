//! HTTP plumbing for the Brewbooks source adapters
//!
//! One shared async client with a per-request timeout and a single
//! direct-then-relay fallback for upstreams that reject direct requests.

mod client;
mod error;

pub use client::{urlencoding, ClientConfig, HttpClient, DEFAULT_RELAY};
pub use error::{NetworkError, NetworkResult};
