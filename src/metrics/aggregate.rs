//! Aggregate metrics collection across all sessions

use crate::session::SessionResult;
use std::sync::Mutex;
use std::time::Duration;

/// Run-wide accumulated counters and derived statistics
///
/// Mutated only through `MetricsAggregator::merge` while the run is in
/// flight, then frozen into a read-only snapshot once every session has
/// joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub total_clients: u64,
    pub connected_count: u64,
    pub failed_connect_count: u64,
    pub messages_sent_total: u64,
    pub messages_received_total: u64,
    pub errors_total: u64,
    pub elapsed: Duration,
}

impl AggregateReport {
    /// Messages sent per second over the whole run. Zero when no time
    /// elapsed, never a division fault.
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.messages_sent_total as f64 / seconds
        } else {
            0.0
        }
    }

    /// Confirmed responses as a percentage of sent messages. Zero when
    /// nothing was sent, never a division fault.
    pub fn success_rate(&self) -> f64 {
        if self.messages_sent_total == 0 {
            return 0.0;
        }
        (self.messages_received_total as f64 / self.messages_sent_total as f64) * 100.0
    }
}

/// Thread-safe accumulator merging session results into the shared report
///
/// `merge` is the single entry point: an atomic read-modify-write over all
/// counters under one lock, so no session ever observes a partially updated
/// report from another session's in-flight merge. The critical section only
/// touches in-memory counters and never blocks a session's socket teardown.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    report: Mutex<AggregateReport>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed session into the aggregate. Each result must be
    /// merged exactly once.
    pub fn merge(&self, result: &SessionResult) {
        let mut report = self
            .report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        report.total_clients += 1;
        if result.connected {
            report.connected_count += 1;
        } else {
            report.failed_connect_count += 1;
        }
        report.messages_sent_total += result.messages_sent;
        report.messages_received_total += result.messages_received;
        report.errors_total += result.errors;
    }

    /// Freeze the aggregate into its final read-only form, stamping the
    /// run's wall-clock duration.
    pub fn finalize(&self, elapsed: Duration) -> AggregateReport {
        let mut report = self
            .report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        report.elapsed = elapsed;
        report
    }
}
