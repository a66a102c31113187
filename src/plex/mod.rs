//! Plex upstream: `/status/sessions` XML.

mod client;
pub mod models;
pub mod normalize;

pub use client::PlexClient;
pub use normalize::normalize_sessions;
