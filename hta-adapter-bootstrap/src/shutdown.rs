// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Shutdown coordination.
//!
//! `run_stats_loop` takes a single `tokio::sync::oneshot::Receiver<()>`
//! because a oneshot channel has exactly one consumer. The process needs to
//! notify more than one listener from a single signal (the stats loop, the
//! main service loop, and potentially others), so `ShutdownCoordinator` fans
//! a single shutdown trigger out to as many independent oneshot receivers
//! as are registered before it fires.

use tokio::sync::oneshot;

/// Registers independent shutdown listeners and fires all of them once.
#[derive(Default)]
pub struct ShutdownCoordinator {
    senders: Vec<oneshot::Sender<()>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener, returning the receiver it should hold
    /// onto (typically passed straight into `run_stats_loop` or a
    /// `tokio::select!` in the main loop).
    pub fn subscribe(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.senders.push(tx);
        rx
    }

    /// Fires every registered listener. A listener that has already been
    /// dropped (its task exited early) is silently skipped — there is
    /// nothing left to notify.
    pub fn shutdown(self) {
        for sender in self.senders {
            let _ = sender.send(());
        }
    }
}
