// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

/// The four fixed query shapes a read request can take, plus `Unknown` for
/// a wire value this service doesn't recognize. `Unknown` is never
/// constructed by the service's own callers; it exists so the read
/// pipeline's `UnknownRequestType` handling (warn, empty response, no
/// failure) has a concrete value to dispatch on rather than rejecting
/// deserialization outright — the original's protobuf enum has the same
/// shape (a `default:` switch arm on an otherwise-closed type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryRequestKind {
    AggregateTimeline,
    FlexTimeline,
    Aggregate,
    LastValue,
    #[serde(other)]
    Unknown,
}

/// A request against the history of a single metric. `metric` addresses the
/// canonical name directly — history requests are not resolved through the
/// input-name mapping, producers of history requests already address
/// canonical names.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HistoryRequest {
    pub kind: HistoryRequestKind,
    pub start_time_ns: i64,
    pub end_time_ns: i64,
    pub interval_max_ns: i64,
}

impl HistoryRequest {
    pub fn new(kind: HistoryRequestKind, start_time_ns: i64, end_time_ns: i64, interval_max_ns: i64) -> Self {
        Self {
            kind,
            start_time_ns,
            end_time_ns,
            interval_max_ns,
        }
    }
}
