// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Thread-safe accumulator of counters/durations, one instance per
//! direction (read, write). Modeled on `original_source/src/db_stats.cpp`'s
//! `StatsCollector`/`DbStatsTransaction`.

use std::sync::Mutex;
use std::time::Duration;

use crate::entities::stats_snapshot::StatsSnapshot;

#[derive(Default)]
struct Counters {
    completed_count: u64,
    failed_count: u64,
    started_count: u64,
    data_size_bytes: u64,
    pending_duration: Duration,
    active_duration: Duration,
    in_pending: i64,
    in_active: i64,
}

/// One direction's (read or write) counters. All operations are protected
/// by a single mutex; critical sections only touch the counter struct.
pub struct StatsCollector {
    counters: Mutex<Counters>,
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
        }
    }

    /// A request has been submitted and is waiting to start.
    pub fn pending(&self) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        c.in_pending += 1;
    }

    /// A request has started running, having waited `pending_duration`.
    pub fn active(&self, pending_duration: Duration) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        c.pending_duration += pending_duration;
        c.in_pending -= 1;
        c.started_count += 1;
        c.in_active += 1;
    }

    /// A request finished successfully after running for `active_duration`,
    /// having produced `data_size` bytes of response/payload.
    pub fn complete(&self, active_duration: Duration, data_size: u64) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        c.completed_count += 1;
        c.in_active -= 1;
        c.active_duration += active_duration;
        c.data_size_bytes += data_size;
    }

    /// A request failed after running for `active_duration`.
    pub fn failed(&self, active_duration: Duration) {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        c.in_active -= 1;
        c.failed_count += 1;
        c.active_duration += active_duration;
    }

    /// Atomically copies the current counters and resets everything except
    /// the `in_pending`/`in_active` gauges.
    pub fn collect(&self) -> StatsSnapshot {
        let mut c = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let snapshot = StatsSnapshot {
            completed_count: c.completed_count,
            failed_count: c.failed_count,
            started_count: c.started_count,
            data_size_bytes: c.data_size_bytes,
            pending_duration: c.pending_duration,
            active_duration: c.active_duration,
            in_pending: c.in_pending,
            in_active: c.in_active,
        };
        c.completed_count = 0;
        c.failed_count = 0;
        c.started_count = 0;
        c.data_size_bytes = 0;
        c.pending_duration = Duration::ZERO;
        c.active_duration = Duration::ZERO;
        snapshot
    }
}

/// RAII guard binding a `pending_since` timestamp to an `active` call at
/// construction, guaranteeing exactly one of `complete`/`fail` runs —
/// explicitly, or as a `failed` recorded by `Drop` if the guard is dropped
/// without either being called. This is the only way the caller obtains
/// reliable failure accounting when a strand task returns early via `?`.
///
/// Mirrors `original_source/src/db_stats.hpp`'s `DbStatsTransaction`.
pub struct StatsTransaction<'a> {
    collector: &'a StatsCollector,
    begin: std::time::Instant,
    settled: bool,
}

impl<'a> StatsTransaction<'a> {
    pub fn begin(collector: &'a StatsCollector, pending_since: std::time::Instant) -> Self {
        let begin = std::time::Instant::now();
        collector.active(begin.saturating_duration_since(pending_since));
        Self {
            collector,
            begin,
            settled: false,
        }
    }

    /// Records a successful completion and returns the elapsed active
    /// duration, matching the original's `completed(data_size) -> Duration`.
    pub fn complete(mut self, data_size: u64) -> Duration {
        let elapsed = self.begin.elapsed();
        self.collector.complete(elapsed, data_size);
        self.settled = true;
        elapsed
    }
}

impl Drop for StatsTransaction<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.collector.failed(self.begin.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn pending_then_active_transitions_gauges() {
        let collector = StatsCollector::new();
        collector.pending();
        let snap = collector.collect();
        assert_eq!(snap.in_pending, 1);

        let _tx = StatsTransaction::begin(&collector, Instant::now());
        let snap = collector.collect();
        assert_eq!(snap.in_pending, 0);
        assert_eq!(snap.in_active, 1);
        assert_eq!(snap.started_count, 1);
    }

    #[test]
    fn explicit_complete_records_completion_not_failure() {
        let collector = StatsCollector::new();
        let tx = StatsTransaction::begin(&collector, Instant::now());
        tx.complete(128);
        let snap = collector.collect();
        assert_eq!(snap.completed_count, 1);
        assert_eq!(snap.failed_count, 0);
        assert_eq!(snap.in_active, 0);
        assert_eq!(snap.data_size_bytes, 128);
    }

    #[test]
    fn dropping_without_complete_records_a_failure() {
        let collector = StatsCollector::new();
        {
            let _tx = StatsTransaction::begin(&collector, Instant::now());
            // dropped without calling complete()
        }
        let snap = collector.collect();
        assert_eq!(snap.completed_count, 0);
        assert_eq!(snap.failed_count, 1);
        assert_eq!(snap.in_active, 0);
    }

    #[test]
    fn collect_resets_counters_but_preserves_gauges() {
        let collector = StatsCollector::new();
        collector.pending();
        collector.pending();
        let first = collector.collect();
        assert_eq!(first.in_pending, 2);
        assert_eq!(first.started_count, 0);

        let second = collector.collect();
        assert_eq!(second.in_pending, 2, "gauge must persist across collect()");
        assert_eq!(second.started_count, 0, "counters reset to zero");
    }
}
