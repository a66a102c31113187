//! Fixed-interval polling of one upstream into its session snapshot.

use crate::server::metrics;
use crate::sessions::SessionSnapshot;
use crate::upstream::{SessionSource, UpstreamError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives one upstream: fetch, normalize, publish, sleep, repeat.
pub struct SessionPoller {
    source: Arc<dyn SessionSource>,
    snapshot: Arc<SessionSnapshot>,
    interval: Duration,
}

impl SessionPoller {
    pub fn new(
        source: Arc<dyn SessionSource>,
        snapshot: Arc<SessionSnapshot>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            snapshot,
            interval,
        }
    }

    /// Runs a single cycle.
    ///
    /// On success the snapshot is replaced and the number of published
    /// series is returned. On failure the snapshot is left untouched.
    pub async fn poll_once(&self) -> Result<usize, UpstreamError> {
        let family = self.source.family();
        let start = Instant::now();

        match self.source.fetch_sessions().await {
            Ok(records) => {
                let count = self.snapshot.replace(&records);
                metrics::record_poll(family, "success", start.elapsed());
                debug!("{} now has {} active sessions", family, count);
                Ok(count)
            }
            Err(e) => {
                metrics::record_poll(family, e.outcome(), start.elapsed());
                Err(e)
            }
        }
    }

    /// Polls until `shutdown` is cancelled. The first poll happens immediately.
    ///
    /// A cycle that has already started is allowed to finish.
    pub async fn run(self, shutdown: CancellationToken) {
        let family = self.source.family();
        info!(
            "Polling {} at {} every {:?}",
            family,
            self.source.address(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        warn!("Error getting {} sessions, keeping previous snapshot: {}", family, e);
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("{} poller received shutdown signal", family);
                    break;
                }
            }
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
