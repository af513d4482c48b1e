//! Cable event logging task
//!
//! Drains a [`CableMonitor`](crate::CableMonitor) broadcast receiver and logs
//! every cable change. The task ends when the monitor is dropped.

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::monitor::CableEvent;

/// Run the cable event logging task
///
/// Returns the number of events logged.
pub async fn run_monitor_log_task(id: String, mut events_rx: broadcast::Receiver<CableEvent>) -> u64 {
    debug!("Starting cable monitor log task for {}", id);
    let mut logged = 0;

    loop {
        match events_rx.recv().await {
            Ok(event) => {
                logged += 1;
                info!(
                    "{}: [{}] {} {}",
                    id,
                    event.sequence,
                    event.cable,
                    if event.active { "connected" } else { "disconnected" }
                );
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("{}: cable monitor log lagged, {} events skipped", id, skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    debug!("Cable monitor log task ended for {}", id);
    logged
}
