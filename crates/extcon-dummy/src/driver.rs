//! Driver lifecycle
//!
//! [`UsbDummyDriver`] brings devices up and down. Attach is all-or-nothing:
//! if any step fails, cables already published are retracted and everything
//! created so far is released in reverse order before the error is returned.
//!
//! Attach order:
//! 1. Validate the device node against the match table
//! 2. Build the signal store from the node's properties
//! 3. Start the device's delayed work
//! 4. Run one resolution synchronously
//! 5. Create the debug directory and one file per endpoint
//! 6. Request one debounced resolution

use std::sync::{Arc, Weak};

use extcon_core::{CableSubscriber, SignalStore};
use tracing::{info, warn};

use crate::debugfs::DebugFs;
use crate::device::{DeviceInner, ExtconDevice};
use crate::endpoint::{EndpointFile, SIGNAL_ENDPOINTS};
use crate::error::{AttachError, ConfigError, DebugFsError};
use crate::node::{DeviceNode, PLATFORM_NAME};
use crate::work::delayed_work;

/// Name of the debug directory holding the endpoints
pub const DEBUGFS_DIR: &str = "dummy_usb_extcon";

/// Downgrade a subscriber into the weak handle a device holds
pub fn subscriber_handle<S>(subscriber: &Arc<S>) -> Weak<dyn CableSubscriber>
where
    S: CableSubscriber + 'static,
{
    let weak: Weak<S> = Arc::downgrade(subscriber);
    weak
}

/// Lifecycle hooks for dummy extcon devices
#[derive(Debug, Clone)]
pub struct UsbDummyDriver {
    debugfs: Arc<DebugFs>,
}

impl UsbDummyDriver {
    /// Create a driver that registers endpoints in `debugfs`
    pub fn new(debugfs: Arc<DebugFs>) -> Self {
        Self { debugfs }
    }

    /// Driver name
    pub fn name(&self) -> &'static str {
        PLATFORM_NAME
    }

    /// Filesystem holding the endpoints of attached devices
    pub fn debugfs(&self) -> &Arc<DebugFs> {
        &self.debugfs
    }

    /// Bring up a device for `node`
    ///
    /// The subscriber is held weakly; if it is gone (or was never given)
    /// resolutions still run but nothing is published. Must be called from
    /// within a tokio runtime.
    pub async fn on_attach(
        &self,
        node: Option<&DeviceNode>,
        subscriber: Option<Weak<dyn CableSubscriber>>,
    ) -> Result<ExtconDevice, AttachError> {
        let node = node.ok_or(ConfigError::MissingNode)?;
        node.check_compatible()?;

        let store = SignalStore::with_defaults(
            node.id_det,
            node.vbus_det,
            node.default_id,
            node.default_vbus,
        );

        let (work_handle, pending) = delayed_work(PLATFORM_NAME, node.debounce());
        let inner = Arc::new(DeviceInner::new(PLATFORM_NAME, store, subscriber, work_handle));
        let work = pending.spawn({
            let inner = inner.clone();
            move || inner.resolve()
        });

        let mut device = ExtconDevice::new(inner, work, self.debugfs.clone(), Vec::new());

        // Perform initial detection
        device.resolve_now();

        if let Err(e) = self.create_endpoints(&mut device) {
            warn!("{}: attach failed: {}", PLATFORM_NAME, e);
            device.retract();
            device.release().await;
            return Err(e.into());
        }

        device.request_resolution();

        info!(
            "{}: attached (id-det={}, vbus-det={}, debounce={}ms)",
            PLATFORM_NAME, node.id_det, node.vbus_det, node.debounce_ms
        );
        Ok(device)
    }

    fn create_endpoints(&self, device: &mut ExtconDevice) -> Result<(), DebugFsError> {
        let dir = self.debugfs.create_dir(DEBUGFS_DIR)?;
        device.track_debugfs_path(dir.clone());

        for endpoint in SIGNAL_ENDPOINTS.iter() {
            let file = Arc::new(EndpointFile::new(endpoint, device.inner().clone()));
            let path = self.debugfs.create_file(&dir, endpoint.name(), file)?;
            device.track_debugfs_path(path);
        }
        Ok(())
    }

    /// Tear a device down, cancelling and joining its pending resolution
    pub async fn on_detach(&self, device: ExtconDevice) {
        let name = device.name().to_string();
        device.detach().await;
        info!("{}: detached", name);
    }

    /// System suspend; never triggers a resolution
    pub fn on_suspend(&self, device: &ExtconDevice) {
        device.suspend();
    }

    /// System resume; applies the resume override if enabled
    pub fn on_resume(&self, device: &ExtconDevice) {
        device.resume();
    }
}
