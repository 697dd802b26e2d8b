// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

/// A per-window summary row as returned by the HTA store's `aggregate`/
/// `retrieve` calls. Mapped one-for-one from the store's rows.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aggregate {
    pub minimum: f64,
    pub maximum: f64,
    pub sum: f64,
    pub count: u64,
    pub integral: f64,
    pub active_time: i64,
}

impl Aggregate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(minimum: f64, maximum: f64, sum: f64, count: u64, integral: f64, active_time: i64) -> Self {
        Self {
            minimum,
            maximum,
            sum,
            count,
            integral,
            active_time,
        }
    }
}
