//! Cable Subscriber Simulation Library
//!
//! This crate provides a stand-in for the USB controller that normally
//! consumes extcon notifications, so detection logic can be exercised
//! without hardware. It includes:
//!
//! - **CableMonitor**: Records every cable notification, tracks the observed
//!   cable flags and broadcasts each change
//! - **run_monitor_log_task**: Logs broadcast cable events until the monitor
//!   goes away
//!
//! # Example
//!
//! ```rust
//! use extcon_core::{CableState, CableSubscriber};
//! use extcon_sim::CableMonitor;
//!
//! let monitor = CableMonitor::new("otg");
//! monitor.set_active(CableState::Usb, true).unwrap();
//!
//! assert_eq!(monitor.state(), CableState::Usb);
//! assert_eq!(monitor.notification_count(), 1);
//! ```

pub mod monitor;
pub mod monitor_task;

pub use monitor::{CableEvent, CableMonitor};
pub use monitor_task::run_monitor_log_task;
