//! Cancel-on-first-failure task group.
//!
//! # Responsibilities
//! - Run independent async units of work
//! - Cancel every sibling as soon as one unit reports a failure
//! - Record exactly one failure cause per group lifetime
//! - Join all spawned tasks before reporting the cause
//!
//! # Design Decisions
//! - Cooperative cancellation via a `watch` flag: late subscribers still
//!   observe a cancellation that already happened, unlike a broadcast
//! - The cause slot is a `OnceLock` scoped to the group, never global
//! - `wait()` is built on `JoinSet::join_next`, which is cancel-safe, so a
//!   caller may race `wait()` against a deadline and re-enter it without
//!   orphaning tasks

use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::error::ProviderError;

#[derive(Debug)]
struct GroupCore {
    cancel_tx: watch::Sender<bool>,
    cause: OnceLock<ProviderError>,
}

impl GroupCore {
    fn cancel(&self, cause: ProviderError) {
        // First cause wins; later failures are discarded.
        let _ = self.cause.set(cause);
        self.cancel_tx.send_replace(true);
    }
}

/// Clonable handle a task polls to learn the group was cancelled.
#[derive(Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Resolves once the group is cancelled. A dropped group counts as
    /// cancelled.
    pub async fn cancelled(&mut self) {
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Non-blocking cancellation check.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// A group of independent tasks sharing one cancellation scope.
///
/// State machine: Created → Running → Cancelling (first failure or
/// explicit cancel) → Completed (all tasks joined). `wait()` after
/// completion is safe and returns the same cause.
#[derive(Debug)]
pub struct TaskGroup {
    core: Arc<GroupCore>,
    tasks: JoinSet<()>,
}

impl TaskGroup {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            core: Arc::new(GroupCore {
                cancel_tx,
                cause: OnceLock::new(),
            }),
            tasks: JoinSet::new(),
        }
    }

    /// Subscribe to this group's cancellation scope.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.core.cancel_tx.subscribe(),
        }
    }

    /// Schedule one unit of work. A returned error cancels the group; an
    /// error reported after cancellation does not overwrite the recorded
    /// cause.
    pub fn spawn<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(CancelSignal) -> Fut,
        Fut: Future<Output = Result<(), ProviderError>> + Send + 'static,
    {
        let fut = task(self.signal());
        let core = self.core.clone();
        self.tasks.spawn(async move {
            if let Err(cause) = fut.await {
                core.cancel(cause);
            }
        });
    }

    /// Request cooperative cancellation. Idempotent.
    pub fn cancel(&self, cause: ProviderError) {
        self.core.cancel(cause);
    }

    /// Block until every spawned task has terminated, then return the
    /// recorded cause. A group that saw no failure and no explicit cancel
    /// reports the terminal `Cancelled` cause.
    pub async fn wait(&mut self) -> ProviderError {
        while self.tasks.join_next().await.is_some() {}
        self.core.cancel(ProviderError::Cancelled);
        self.core
            .cause
            .get()
            .cloned()
            .unwrap_or(ProviderError::Cancelled)
    }
}

impl Default for TaskGroup {
    fn default() -> Self {
        Self::new()
    }
}
