//! Periodic poll loop driving the fetch/merge cycles.
//!
//! # Responsibilities
//! - Start exactly one cycle per tick of the configured interval
//! - Bound each cycle by a deadline equal to the poll interval
//! - Log cycle failures without stopping the loop
//! - Exit promptly on outer cancellation
//!
//! # Design Decisions
//! - The first tick fires immediately; later ticks are measured from
//!   nominal time, not from cycle completion
//! - Cycles never overlap: a cycle that outlives a nominal tick causes
//!   that tick to be skipped (`MissedTickBehavior::Skip`), and the
//!   deadline cancels the cycle itself one interval in
//! - Per-endpoint failures are skip-and-continue: the failing worker
//!   logs, sends the no-result sentinel and lets the rest of the cycle
//!   proceed, so one dead origin does not black-hole the others

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::dynamic::DynamicConfiguration;
use crate::error::ProviderError;
use crate::lifecycle::{CancelSignal, TaskGroup};
use crate::provider::merge::merge_partials;
use crate::upstream::UpstreamClient;

pub(crate) struct PollLoop {
    clients: Arc<Vec<UpstreamClient>>,
    poll_interval: Duration,
    out: mpsc::Sender<DynamicConfiguration>,
}

impl PollLoop {
    pub(crate) fn new(
        clients: Arc<Vec<UpstreamClient>>,
        poll_interval: Duration,
        out: mpsc::Sender<DynamicConfiguration>,
    ) -> Self {
        Self {
            clients,
            poll_interval,
            out,
        }
    }

    pub(crate) async fn run(self, mut signal: CancelSignal) -> Result<(), ProviderError> {
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = signal.cancelled() => return Ok(()),
                _ = ticker.tick() => {}
            }

            match self.run_cycle(&mut signal).await {
                ProviderError::Cancelled => {
                    if signal.is_cancelled() {
                        return Ok(());
                    }
                    tracing::debug!("poll cycle completed");
                }
                cause => tracing::warn!(error = %cause, "poll cycle failed"),
            }
        }
    }

    /// Run one fetch/merge cycle and return its recorded cause. A cycle
    /// that completes without failure reports the terminal `Cancelled`
    /// cause of its task group.
    async fn run_cycle(&self, outer: &mut CancelSignal) -> ProviderError {
        let mut group = TaskGroup::new();
        let expected = self.clients.len();
        let (tx, rx) = mpsc::channel(expected.max(1));

        for client in self.clients.iter().cloned() {
            let tx = tx.clone();
            group.spawn(move |mut signal| async move {
                match client.fetch(&mut signal).await {
                    Ok(partial) => {
                        if tx.send(Some(partial)).await.is_err() {
                            return Err(ProviderError::Cancelled);
                        }
                        Ok(())
                    }
                    Err(ProviderError::Cancelled) => {
                        // Keep the fan-in count correct even when torn
                        // down mid-flight.
                        let _ = tx.try_send(None);
                        Err(ProviderError::Cancelled)
                    }
                    Err(cause) => {
                        tracing::warn!(
                            endpoint = %client.host(),
                            error = %cause,
                            "skipping endpoint for this cycle"
                        );
                        let _ = tx.send(None).await;
                        Ok(())
                    }
                }
            });
        }
        drop(tx);

        let out = self.out.clone();
        group.spawn(move |signal| merge_partials(rx, expected, out, signal));

        let interrupt = tokio::select! {
            cause = group.wait() => return cause,
            _ = outer.cancelled() => ProviderError::Cancelled,
            _ = time::sleep(self.poll_interval) => ProviderError::DeadlineExceeded,
        };

        group.cancel(interrupt);
        group.wait().await
    }
}
