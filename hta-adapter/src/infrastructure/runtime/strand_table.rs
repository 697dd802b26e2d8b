// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Per-metric serialization on top of the shared tokio runtime.
//!
//! Realizes spec.md §4.1/§9's "strand keyed by metric name on top of a
//! thread pool": each [`Strand`] is a FIFO queue of boxed futures guarded by
//! an `owned` flag. `post` enqueues a job and, if it wins the CAS on
//! `owned`, spawns a drain loop onto the ambient tokio runtime — the "worker
//! pool" is simply that runtime's multi-thread scheduler. Two jobs posted to
//! the same strand never run concurrently; jobs on different strands run in
//! parallel up to the runtime's worker-thread count.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use hta_adapter_domain::error::HtaError;
use hta_adapter_domain::value_objects::MetricName;
use tokio::sync::Mutex as AsyncMutex;

use super::supervisor::{join_supervised, spawn_supervised};

type BoxedJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A single-runner FIFO execution context. Jobs queued here run strictly
/// one at a time, in submission order, on whichever worker thread the
/// runtime's scheduler hands the drain loop to.
struct Strand {
    queue: AsyncMutex<VecDeque<BoxedJob>>,
    owned: AtomicBool,
    panics_caught: Arc<AtomicU64>,
}

impl Strand {
    fn new(panics_caught: Arc<AtomicU64>) -> Arc<Self> {
        Arc::new(Self {
            queue: AsyncMutex::new(VecDeque::new()),
            owned: AtomicBool::new(false),
            panics_caught,
        })
    }

    /// Enqueues `job` and, if no drain loop is currently running for this
    /// strand, spawns one. Returns immediately; does not wait for `job` to
    /// run.
    async fn post(self: Arc<Self>, job: BoxedJob) {
        {
            let mut queue = self.queue.lock().await;
            queue.push_back(job);
        }
        if self
            .owned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            tokio::spawn(Self::drain(self));
        }
    }

    /// Runs jobs off the front of the queue until it is empty, then
    /// releases ownership. A race where a job is pushed just after the
    /// queue is observed empty but before `owned` is released is closed by
    /// re-checking the queue under the same lock used to flip `owned`.
    ///
    /// Each job runs on its own spawned task rather than inline: a job that
    /// panics would otherwise unwind this drain loop itself, leaving
    /// `owned` stuck `true` forever and wedging the strand for every
    /// future write/read to that metric. Isolating the panic to its own
    /// task keeps the drain loop — and `owned`'s eventual release — alive
    /// regardless.
    async fn drain(self: Arc<Self>) {
        loop {
            let job = {
                let mut queue = self.queue.lock().await;
                match queue.pop_front() {
                    Some(job) => job,
                    None => {
                        self.owned.store(false, Ordering::Release);
                        // Re-check: a concurrent `post` may have pushed
                        // between the pop miss above and the store here.
                        if queue.is_empty() {
                            return;
                        }
                        if self
                            .owned
                            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                            .is_err()
                        {
                            // Another drain loop already won the race.
                            return;
                        }
                        continue;
                    }
                }
            };
            // `spawn_supervised`/`join_supervised` already log the failure;
            // this only needs to keep the panic counter and the drain loop
            // itself alive.
            let handle = spawn_supervised("strand-job", async move {
                job.await;
                Ok::<(), HtaError>(())
            });
            if join_supervised(handle).await.is_err() {
                self.panics_caught.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Maps metric names to their private strand, creating entries lazily under
/// a single lock (spec.md §9: "a sharded concurrent map is overkill at
/// realistic metric counts").
pub struct StrandTable {
    strands: AsyncMutex<HashMap<MetricName, Arc<Strand>>>,
    panics_caught: Arc<AtomicU64>,
}

impl Default for StrandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StrandTable {
    pub fn new() -> Self {
        Self {
            strands: AsyncMutex::new(HashMap::new()),
            panics_caught: Arc::new(AtomicU64::new(0)),
        }
    }

    async fn strand_for(&self, name: &MetricName) -> Arc<Strand> {
        let mut strands = self.strands.lock().await;
        strands
            .entry(name.clone())
            .or_insert_with(|| Strand::new(self.panics_caught.clone()))
            .clone()
    }

    /// Schedules `job` to run under `name`'s strand. Jobs for the same
    /// `name` run in FIFO order with no overlap; jobs for distinct names may
    /// run concurrently.
    pub async fn post<F>(&self, name: &MetricName, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let strand = self.strand_for(name).await;
        strand.post(Box::pin(job)).await;
    }

    /// Number of strands created so far (metrics touched at least once).
    /// Used only by ambient self-instrumentation (SPEC_FULL §4.8).
    pub async fn strand_count(&self) -> usize {
        self.strands.lock().await.len()
    }

    /// Total number of strand jobs that panicked instead of completing,
    /// across every strand this table has ever created. Used only by
    /// ambient self-instrumentation (SPEC_FULL §4.8).
    pub fn panics_caught(&self) -> u64 {
        self.panics_caught.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn name(s: &str) -> MetricName {
        MetricName::new(s).unwrap()
    }

    #[tokio::test]
    async fn jobs_on_same_strand_never_overlap() {
        let table = Arc::new(StrandTable::new());
        let overlap_detected = Arc::new(AtomicBool::new(false));
        let active = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let table = table.clone();
            let overlap_detected = overlap_detected.clone();
            let active = active.clone();
            handles.push(tokio::spawn(async move {
                table
                    .post(&name("m"), async move {
                        if active.fetch_add(1, Ordering::SeqCst) > 0 {
                            overlap_detected.store(true, Ordering::SeqCst);
                        }
                        tokio::time::sleep(Duration::from_millis(1)).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        // Give the last drain loop a moment to finish its final job.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!overlap_detected.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn jobs_on_different_strands_run_concurrently() {
        let table = Arc::new(StrandTable::new());
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..8 {
            let table = table.clone();
            let concurrent = concurrent.clone();
            let max_concurrent = max_concurrent.clone();
            handles.push(tokio::spawn(async move {
                table
                    .post(&name(&format!("m{i}")), async move {
                        let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                        max_concurrent.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        concurrent.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert!(max_concurrent.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn strand_count_reflects_distinct_metrics_touched() {
        let table = StrandTable::new();
        table.post(&name("a"), async {}).await;
        table.post(&name("b"), async {}).await;
        table.post(&name("a"), async {}).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(table.strand_count().await, 2);
    }

    #[tokio::test]
    async fn a_panicking_job_does_not_wedge_the_strand() {
        let table = StrandTable::new();
        table.post(&name("a"), async { panic!("boom") }).await;

        let completed = Arc::new(AtomicBool::new(false));
        let completed_clone = completed.clone();
        table
            .post(&name("a"), async move {
                completed_clone.store(true, Ordering::SeqCst);
            })
            .await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(completed.load(Ordering::SeqCst), "later job on the same strand must still run");
        assert_eq!(table.panics_caught(), 1);
    }
}
