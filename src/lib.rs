//! Media Sessions Exporter Library
//!
//! Polls Jellyfin and Plex for active playback sessions and exposes them as
//! Prometheus gauges. The modules are public for the binary and for tests.

pub mod config;
pub mod jellyfin;
pub mod plex;
pub mod poller;
pub mod server;
pub mod sessions;
pub mod upstream;

// Re-export commonly used types for convenience
pub use poller::SessionPoller;
pub use server::run_server;
pub use sessions::{Bitrate, SessionRecord, SessionSnapshot, UpstreamFamily};
pub use upstream::{SessionSource, UpstreamError};
