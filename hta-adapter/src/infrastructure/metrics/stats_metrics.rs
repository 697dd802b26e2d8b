// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Formats `StatsCollector` snapshots as time-series points pushed back onto
//! the output side (spec.md §4.6), and the periodic driver loop that
//! collects both directions on a fixed cadence.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hta_adapter_domain::entities::StatsSnapshot;
use hta_adapter_domain::services::StatsCollector;
use tracing::debug;

/// One emitted telemetry sample: `<prefix><direction>.<suffix>` named per
/// spec.md §6, carrying the `rate` attribute the collector was configured
/// with and a scope tag distinguishing rate-like series from point gauges.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryPoint {
    pub name: String,
    pub value: f64,
    pub rate: f64,
    pub scope: &'static str,
}

/// Read or write, used only to name the emitted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Read => "read",
            Direction::Write => "write",
        }
    }
}

/// Formats snapshots into the seven fixed-suffix series spec.md §4.6
/// describes, under a configured prefix and rate.
pub struct StatsMetrics {
    prefix: String,
    rate: f64,
}

impl StatsMetrics {
    pub fn new(prefix: impl Into<String>, rate: f64) -> Self {
        Self {
            prefix: prefix.into(),
            rate,
        }
    }

    /// Produces the seven points for one direction's snapshot, given the
    /// wall-clock `duration` since the previous collection (used for
    /// `utilization`).
    pub fn format(&self, direction: Direction, snapshot: &StatsSnapshot, duration: Duration) -> Vec<TelemetryPoint> {
        let dir = direction.as_str();
        let name = |suffix: &str| format!("{}{}.{}", self.prefix, dir, suffix);

        let utilization = if duration.is_zero() {
            0.0
        } else {
            snapshot.active_duration.as_secs_f64() / duration.as_secs_f64()
        };

        vec![
            TelemetryPoint {
                name: name("request.rate"),
                value: snapshot.started_count as f64 / duration.as_secs_f64().max(f64::EPSILON),
                rate: self.rate,
                scope: "last",
            },
            TelemetryPoint {
                name: name("data.rate"),
                value: snapshot.data_size_bytes as f64 / duration.as_secs_f64().max(f64::EPSILON),
                rate: self.rate,
                scope: "last",
            },
            TelemetryPoint {
                name: name("pending.time"),
                value: snapshot.average_pending_time().as_secs_f64(),
                rate: self.rate,
                scope: "last",
            },
            TelemetryPoint {
                name: name("utilization"),
                value: utilization,
                rate: self.rate,
                scope: "last",
            },
            TelemetryPoint {
                name: name("pending.count"),
                value: snapshot.in_pending as f64,
                rate: self.rate,
                scope: "point",
            },
            TelemetryPoint {
                name: name("active.count"),
                value: snapshot.in_active as f64,
                rate: self.rate,
                scope: "point",
            },
            TelemetryPoint {
                name: name("failed.count"),
                value: snapshot.failed_count as f64,
                rate: self.rate,
                scope: "last",
            },
        ]
    }
}

/// Runs the self-telemetry collector loop on a fixed period `1/rate`
/// (spec.md §4.6). `sink` receives every emitted point; callers typically
/// bridge it onto the output transport. The loop runs until `shutdown`
/// resolves.
///
/// The first tick after start deliberately snapshots and discards
/// zero-filled state, matching spec.md §4.6's "deliberately discards" note —
/// there is nothing meaningful to report before any request has been
/// submitted.
pub async fn run_stats_loop(
    metrics: StatsMetrics,
    read_stats: Arc<StatsCollector>,
    write_stats: Arc<StatsCollector>,
    mut sink: impl FnMut(TelemetryPoint),
    mut shutdown: tokio::sync::oneshot::Receiver<()>,
) {
    let period = Duration::from_secs_f64(1.0 / metrics.rate);
    let mut interval = tokio::time::interval(period);

    // First tick: snapshot and discard.
    interval.tick().await;
    let _ = read_stats.collect();
    let _ = write_stats.collect();
    let mut previous_tick = Instant::now();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let duration = now.duration_since(previous_tick);
                previous_tick = now;

                let read_snapshot = read_stats.collect();
                let write_snapshot = write_stats.collect();

                for point in metrics.format(Direction::Read, &read_snapshot, duration) {
                    sink(point);
                }
                for point in metrics.format(Direction::Write, &write_snapshot, duration) {
                    sink(point);
                }
                debug!("stats telemetry tick emitted");
            }
            _ = &mut shutdown => {
                debug!("stats telemetry loop shutting down");
                return;
            }
        }
    }
}
