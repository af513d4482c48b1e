//! USB Cable Detection Core
//!
//! This crate provides the synchronous building blocks of a USB cable
//! detection (extcon) engine:
//!
//! - **Signals**: raw ID/VBUS inputs, per-signal support flags and the
//!   resume-override record ([`SignalStore`])
//! - **Cables**: the cable states a device can report ([`CableState`]) and the
//!   per-cable activity flags published so far ([`CableStatus`])
//! - **Resolution**: the mapping from effective ID/VBUS levels to an ordered
//!   list of cable publications ([`resolve`])
//!
//! The ID line is active-low: a low ID means a host-mode (OTG) cable is
//! plugged in. VBUS high means bus power is present.
//!
//! | ID | VBUS | Cable    |
//! |----|------|----------|
//! | H  | H    | USB      |
//! | H  | L    | NONE     |
//! | L  | H    | USB-HOST |
//! | L  | L    | USB-HOST |
//!
//! # Example
//!
//! ```rust
//! use extcon_core::{resolve, CableState, CableStatus, SignalStore};
//!
//! let mut store = SignalStore::new(true, true);
//! store.set_id(true);
//! store.set_vbus(true);
//!
//! let mut status = CableStatus::default();
//! for publication in resolve(store.snapshot()) {
//!     status.set_active(publication.cable, publication.active);
//! }
//! assert_eq!(status.resolved(), CableState::Usb);
//! ```

pub mod cable;
pub mod error;
pub mod input;
pub mod resolve;
pub mod signal;
pub mod subscriber;

pub use cable::{CableState, CableStatus, SUPPORTED_CABLES};
pub use error::{InputError, NotifyError};
pub use input::parse_int;
pub use resolve::{apply, expected_state, resolve, Publication};
pub use signal::{SignalSnapshot, SignalStore};
pub use subscriber::CableSubscriber;
