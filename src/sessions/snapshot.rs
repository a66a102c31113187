use super::{SessionLabels, SessionRecord, UpstreamFamily, SESSION_LABELS};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::error;

/// The set of session series published for one upstream family.
///
/// Each poll builds a complete new set and swaps it in; readers hold an
/// `Arc` to whichever set was current when they looked, so a scrape never
/// sees a mix of two cycles.
#[derive(Debug, Default)]
pub struct SessionSnapshot {
    current: RwLock<Arc<BTreeSet<SessionLabels>>>,
}

impl SessionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the published set with exactly the series for `records`.
    ///
    /// Returns the number of distinct series now published.
    pub fn replace(&self, records: &[SessionRecord]) -> usize {
        let next: BTreeSet<SessionLabels> = records.iter().map(SessionRecord::labels).collect();
        let count = next.len();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(next);
        count
    }

    /// The currently published set.
    pub fn current(&self) -> Arc<BTreeSet<SessionLabels>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }
}

/// Exposes a [`SessionSnapshot`] as a gauge family, one series per session at value 1.
pub struct SessionsCollector {
    opts: Opts,
    template: GaugeVec,
    snapshot: Arc<SessionSnapshot>,
}

impl SessionsCollector {
    pub fn new(family: UpstreamFamily, snapshot: Arc<SessionSnapshot>) -> prometheus::Result<Self> {
        let opts = Opts::new(family.metric_name(), family.metric_help());
        let template = GaugeVec::new(opts.clone(), &SESSION_LABELS)?;
        Ok(Self {
            opts,
            template,
            snapshot,
        })
    }
}

impl Collector for SessionsCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.template.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let gauges = match GaugeVec::new(self.opts.clone(), &SESSION_LABELS) {
            Ok(gauges) => gauges,
            Err(e) => {
                error!("Failed to build gauge for {}: {}", self.opts.name, e);
                return Vec::new();
            }
        };
        for labels in self.snapshot.current().iter() {
            gauges.with_label_values(&labels.as_strs()).set(1.0);
        }
        gauges.collect()
    }
}
