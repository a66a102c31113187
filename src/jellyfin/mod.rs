//! Jellyfin upstream: `/Sessions` JSON.

mod client;
pub mod models;
pub mod normalize;

pub use client::JellyfinClient;
pub use normalize::{classify, normalize_sessions, JellyfinPlayback};
