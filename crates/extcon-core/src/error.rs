//! Error types for signal input and cable notification

use thiserror::Error;

use crate::cable::CableState;

/// Errors produced while parsing textual integer input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Input is not a well-formed integer
    #[error("invalid input: {0:?}")]
    InvalidInput(String),

    /// Input is a well-formed integer that does not fit in 32 bits
    #[error("value out of range: {0:?}")]
    OutOfRange(String),
}

/// Failure reported by a cable subscriber
///
/// Notifications are fire-and-forget; callers log these and carry on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Subscriber does not handle this cable
    #[error("cable {0} is not supported by the subscriber")]
    UnsupportedCable(CableState),

    /// Subscriber rejected the notification
    #[error("subscriber rejected {cable} update: {reason}")]
    Rejected { cable: CableState, reason: String },
}
