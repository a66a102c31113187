//! Common test infrastructure
//!
//! End-to-end tests run the real upstream clients against fake media servers
//! and scrape the real metrics server over HTTP.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeUpstream, TestExporter, JELLYFIN_QUEUE_SESSION};
//!
//! #[tokio::test]
//! async fn test_scrape() {
//!     let jellyfin = FakeUpstream::jellyfin(JELLYFIN_QUEUE_SESSION).await;
//!     let exporter = TestExporter::spawn().await;
//!     let poller = exporter.jellyfin_poller(&jellyfin);
//!     poller.poll_once().await.unwrap();
//!     assert!(exporter.scrape().await.contains("jellyfin_active_sessions{"));
//! }
//! ```

mod constants;
mod fake_upstream;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use constants::*;
pub use fake_upstream::FakeUpstream;
pub use fixtures::*;
pub use server::{series_for, TestExporter};
