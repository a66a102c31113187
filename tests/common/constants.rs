//! Shared test constants

#![allow(dead_code)]

pub const JELLYFIN_API_KEY: &str = "jellyfin-test-key";
pub const PLEX_TOKEN: &str = "plex-test-token";

/// Timeout for a spawned server to answer its first request
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;
