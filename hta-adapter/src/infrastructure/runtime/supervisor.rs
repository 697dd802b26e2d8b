// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Supervised task spawning: wraps `tokio::spawn` so a panicking or
//! cancelled strand job is surfaced as an `HtaError` instead of silently
//! dropped.

use hta_adapter_domain::HtaError;
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub type AppResult<T> = Result<T, HtaError>;

/// Spawns `fut` with start/completion logging, under a name used only for
/// observability.
pub fn spawn_supervised<F, T>(name: &'static str, fut: F) -> JoinHandle<AppResult<T>>
where
    F: std::future::Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    debug!(task = name, "task starting");

    tokio::spawn(async move {
        let result = fut.await;
        match &result {
            Ok(_) => debug!(task = name, "task completed successfully"),
            Err(e) => error!(task = name, error = ?e, "task failed"),
        }
        result
    })
}

/// Awaits a supervised task handle, converting a panic or cancellation into
/// an `HtaError::InternalError` rather than propagating a `JoinError`.
pub async fn join_supervised<T>(handle: JoinHandle<AppResult<T>>) -> AppResult<T> {
    match handle.await {
        Ok(task_result) => task_result,
        Err(e) if e.is_panic() => Err(HtaError::internal(format!("task panicked: {e}"))),
        Err(e) => Err(HtaError::internal(format!("task join failed: {e}"))),
    }
}
