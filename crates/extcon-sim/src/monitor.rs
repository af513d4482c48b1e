//! Simulated cable subscriber
//!
//! This module provides a subscriber that remembers what it was told. Tests
//! use it to check notification order and counts; the console uses its
//! broadcast channel to report cable changes as they happen.

use std::sync::{Mutex, MutexGuard, PoisonError};

use extcon_core::{CableState, CableStatus, CableSubscriber, NotifyError};
use tokio::sync::broadcast;
use tracing::{debug, error};

/// Capacity of the cable event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One notification received by a [`CableMonitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CableEvent {
    /// Position in the monitor's history, starting at 1
    pub sequence: u64,
    /// Cable that changed
    pub cable: CableState,
    /// New activity flag
    pub active: bool,
}

#[derive(Debug, Default)]
struct MonitorState {
    status: CableStatus,
    history: Vec<CableEvent>,
    sequence: u64,
    saw_conflict: bool,
    rejected: Option<CableState>,
}

/// Subscriber that records cable notifications
///
/// Tracks the flags it has been told about independently of the notifier, so
/// tests can compare what a device published against what a subscriber saw.
pub struct CableMonitor {
    /// Identifier for logging
    id: String,
    state: Mutex<MonitorState>,
    events_tx: broadcast::Sender<CableEvent>,
}

impl std::fmt::Debug for CableMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CableMonitor")
            .field("id", &self.id)
            .field("state", &*self.lock())
            .finish()
    }
}

impl CableMonitor {
    /// Create a new monitor with no cable attached
    pub fn new(id: impl Into<String>) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            id: id.into(),
            state: Mutex::new(MonitorState::default()),
            events_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Subscribe to cable events
    pub fn subscribe(&self) -> broadcast::Receiver<CableEvent> {
        self.events_tx.subscribe()
    }

    /// Cable flags as observed
    pub fn status(&self) -> CableStatus {
        self.lock().status
    }

    /// The attached cable as observed
    pub fn state(&self) -> CableState {
        self.status().resolved()
    }

    /// All notifications received (for test verification)
    pub fn history(&self) -> Vec<CableEvent> {
        self.lock().history.clone()
    }

    /// Number of notifications received
    pub fn notification_count(&self) -> usize {
        self.lock().history.len()
    }

    /// Whether USB and USB-HOST were ever observed active together
    pub fn saw_conflict(&self) -> bool {
        self.lock().saw_conflict
    }

    /// Clear recorded notifications, keeping the observed flags
    pub fn clear_history(&self) {
        self.lock().history.clear();
    }

    /// Reject future notifications for `cable` (for failure-path tests)
    pub fn reject(&self, cable: Option<CableState>) {
        self.lock().rejected = cable;
    }
}

impl CableSubscriber for CableMonitor {
    fn set_active(&self, cable: CableState, active: bool) -> Result<(), NotifyError> {
        if !cable.is_cable() {
            return Err(NotifyError::UnsupportedCable(cable));
        }

        let event = {
            let mut state = self.lock();
            if state.rejected == Some(cable) {
                return Err(NotifyError::Rejected {
                    cable,
                    reason: format!("{} is configured to reject it", self.id),
                });
            }

            state.status.set_active(cable, active);
            if state.status.is_conflicting() {
                error!("{}: USB and USB-HOST both active", self.id);
                state.saw_conflict = true;
            }

            state.sequence += 1;
            let event = CableEvent {
                sequence: state.sequence,
                cable,
                active,
            };
            state.history.push(event);
            event
        };

        debug!(
            "{}: {} -> {}",
            self.id,
            cable,
            if active { "active" } else { "inactive" }
        );
        // No receivers is fine
        let _ = self.events_tx.send(event);
        Ok(())
    }
}
