//! Dummy USB extcon device
//!
//! This crate provides a virtual USB cable-detection device. Two raw inputs,
//! ID and VBUS, are written through integer control endpoints; a per-device
//! delayed work task waits for them to settle and then resolves which cable
//! (USB, USB-HOST or none) is attached, notifying a [`CableSubscriber`].
//!
//! # Architecture
//!
//! - [`UsbDummyDriver`] attaches and detaches devices and forwards
//!   suspend/resume
//! - [`ExtconDevice`] owns the signal store and the published cable flags
//! - [`DelayedWork`] is the debounce timer: requests within the settle delay
//!   collapse into a single resolution
//! - [`DebugFs`] exposes the endpoints as `dummy_usb_extcon/<name>` files
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use extcon_dummy::{subscriber_handle, DebugFs, DeviceNode, UsbDummyDriver};
//! use extcon_sim::CableMonitor;
//!
//! # async fn run() -> Result<(), extcon_dummy::AttachError> {
//! let driver = UsbDummyDriver::new(Arc::new(DebugFs::new()));
//! let monitor = Arc::new(CableMonitor::new("otg"));
//!
//! let node = DeviceNode {
//!     default_id: true,
//!     id_det: true,
//!     vbus_det: true,
//!     ..Default::default()
//! };
//! let device = driver
//!     .on_attach(Some(&node), Some(subscriber_handle(&monitor)))
//!     .await?;
//!
//! driver.debugfs().write("dummy_usb_extcon/vbus", "1\n").unwrap();
//!
//! driver.on_detach(device).await;
//! # Ok(())
//! # }
//! ```
//!
//! [`CableSubscriber`]: extcon_core::CableSubscriber

pub mod debugfs;
pub mod device;
pub mod driver;
pub mod endpoint;
pub mod error;
pub mod node;
pub mod work;

pub use debugfs::{DebugFile, DebugFs};
pub use device::ExtconDevice;
pub use driver::{subscriber_handle, UsbDummyDriver, DEBUGFS_DIR};
pub use endpoint::{find_endpoint, SignalEndpoint, SIGNAL_ENDPOINTS};
pub use error::{AttachError, ConfigError, DebugFsError, EndpointError};
pub use node::{DeviceNode, COMPATIBLE, DEFAULT_DEBOUNCE_MS, PLATFORM_NAME};
pub use work::{delayed_work, DelayedWork, PendingWork, WorkHandle};
