//! Fan-in stage of one poll cycle.
//!
//! # Design Decisions
//! - Termination by received-count against the known expected count,
//!   never by channel closing: the channel must stay open while workers
//!   may still send their no-result sentinel
//! - The merge map is owned and mutated exclusively by this worker; all
//!   partials arrive by message passing
//! - If no endpoint contributed a partial, the cycle publishes nothing

use tokio::sync::mpsc;

use crate::dynamic::{DynamicConfiguration, HttpConfiguration};
use crate::error::ProviderError;
use crate::lifecycle::CancelSignal;

/// Receive exactly one message per fetch worker (a partial or the
/// no-result sentinel) and publish the union of the partials.
///
/// A zero expected count short-circuits with an empty configuration so
/// the aggregator can never deadlock, even though validation rejects
/// that case upstream.
pub(crate) async fn merge_partials(
    mut rx: mpsc::Receiver<Option<DynamicConfiguration>>,
    expected: usize,
    out: mpsc::Sender<DynamicConfiguration>,
    mut signal: CancelSignal,
) -> Result<(), ProviderError> {
    let mut merged = HttpConfiguration::default();
    let mut received = 0usize;
    let mut contributed = 0usize;

    while received < expected {
        let message = tokio::select! {
            _ = signal.cancelled() => return Err(ProviderError::Cancelled),
            message = rx.recv() => message,
        };

        match message {
            Some(Some(partial)) => {
                received += 1;
                contributed += 1;
                merged.merge(partial.http);
            }
            Some(None) => received += 1,
            // Every worker sends exactly once; a closed channel before
            // the expected count means the cycle was torn down.
            None => return Err(ProviderError::Cancelled),
        }
    }

    if expected > 0 && contributed == 0 {
        tracing::debug!("no endpoint contributed a partial; nothing published this cycle");
        return Ok(());
    }

    out.send(DynamicConfiguration { http: merged })
        .await
        .map_err(|_| ProviderError::OutputClosed)
}
