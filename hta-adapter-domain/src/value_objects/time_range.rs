// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

/// The `(min_time, max_time)` span the HTA store reports for a metric.
/// `max_time` is the monotonic write watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub min_time: i64,
    pub max_time: i64,
}

impl TimeRange {
    pub fn new(min_time: i64, max_time: i64) -> Self {
        Self { min_time, max_time }
    }

    /// An empty metric reports the minimum representable watermark so that
    /// the very first sample of any timestamp is accepted.
    pub fn empty() -> Self {
        Self {
            min_time: i64::MIN,
            max_time: i64::MIN,
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::empty()
    }
}
