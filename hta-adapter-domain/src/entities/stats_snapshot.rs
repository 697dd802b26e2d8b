// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

use std::time::Duration;

/// A point-in-time copy of one direction's (read or write) accumulated
/// counters, as produced by `StatsCollector::collect`.
///
/// `in_pending`/`in_active` are gauges and are never reset by `collect`;
/// every other field is a delta counter that `collect` zeroes after copying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub completed_count: u64,
    pub failed_count: u64,
    pub started_count: u64,
    pub data_size_bytes: u64,
    pub pending_duration: Duration,
    pub active_duration: Duration,
    pub in_pending: i64,
    pub in_active: i64,
}

impl StatsSnapshot {
    pub fn zero(in_pending: i64, in_active: i64) -> Self {
        Self {
            completed_count: 0,
            failed_count: 0,
            started_count: 0,
            data_size_bytes: 0,
            pending_duration: Duration::ZERO,
            active_duration: Duration::ZERO,
            in_pending,
            in_active,
        }
    }

    /// Average time a request spent pending before starting, or zero if no
    /// request started in this window (in which case `pending_duration`
    /// must also be zero — see the invariant on the telemetry driver).
    pub fn average_pending_time(&self) -> Duration {
        if self.started_count == 0 {
            Duration::ZERO
        } else {
            self.pending_duration / self.started_count as u32
        }
    }
}
