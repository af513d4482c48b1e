//! Dummy extcon device
//!
//! An [`ExtconDevice`] owns the signal store, the published cable flags and
//! the delayed work that resolves them. Writers (debug endpoints, the
//! in-process API, resume) only store raw values and request a resolution;
//! the resolution itself always runs on the device's work task, except for
//! the one synchronous pass made at attach.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use extcon_core::{
    apply, resolve, CableState, CableStatus, CableSubscriber, Publication, SignalSnapshot,
    SignalStore,
};
use tracing::{debug, info, trace, warn};

use crate::debugfs::DebugFs;
use crate::endpoint::{find_endpoint, SIGNAL_ENDPOINTS};
use crate::error::EndpointError;
use crate::work::{DelayedWork, WorkHandle};

/// Lock a mutex, ignoring poisoning
///
/// Every critical section here is a plain field update, so a panicking
/// holder cannot leave the data half-written.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the device, its endpoints and its work task
pub(crate) struct DeviceInner {
    name: String,
    store: Mutex<SignalStore>,
    status: Mutex<CableStatus>,
    resolutions: AtomicU64,
    subscriber: Option<Weak<dyn CableSubscriber>>,
    work: WorkHandle,
}

impl DeviceInner {
    pub(crate) fn new(
        name: impl Into<String>,
        store: SignalStore,
        subscriber: Option<Weak<dyn CableSubscriber>>,
        work: WorkHandle,
    ) -> Self {
        Self {
            name: name.into(),
            store: Mutex::new(store),
            status: Mutex::new(CableStatus::default()),
            resolutions: AtomicU64::new(0),
            subscriber,
            work,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Read or modify the signal store under its lock
    pub(crate) fn with_store<R>(&self, f: impl FnOnce(&mut SignalStore) -> R) -> R {
        f(&mut lock(&self.store))
    }

    /// Ask the work task for a debounced resolution
    pub(crate) fn request_resolution(&self) {
        if self.work.schedule() {
            trace!("{}: resolution requested", self.name);
        }
    }

    /// Resolve the cable state from the current signals and publish changes
    pub(crate) fn resolve(&self) {
        let snapshot = lock(&self.store).snapshot();
        let pass = self.resolutions.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "{}: resolution #{} id={} vbus={}",
            self.name, pass, snapshot.id, snapshot.vbus
        );

        let Some(subscriber) = self.subscriber.as_ref().and_then(Weak::upgrade) else {
            trace!("{}: no subscriber attached, skipping publication", self.name);
            return;
        };

        let changed = apply(&mut lock(&self.status), &resolve(snapshot));
        self.publish(&*subscriber, changed);
    }

    /// Deactivate every published cable
    pub(crate) fn retract(&self) {
        let Some(subscriber) = self.subscriber.as_ref().and_then(Weak::upgrade) else {
            return;
        };

        // Same order the resolver clears states in
        let cleared = [
            Publication {
                cable: CableState::UsbHost,
                active: false,
            },
            Publication {
                cable: CableState::Usb,
                active: false,
            },
        ];
        let changed = apply(&mut lock(&self.status), &cleared);
        self.publish(&*subscriber, changed);
    }

    fn publish(&self, subscriber: &dyn CableSubscriber, changed: Vec<Publication>) {
        for publication in changed {
            info!(
                "{}: {} {}",
                self.name,
                publication.cable,
                if publication.active { "attached" } else { "detached" }
            );
            if let Err(e) = subscriber.set_active(publication.cable, publication.active) {
                warn!("{}: failed to notify {}: {}", self.name, publication.cable, e);
            }
        }
    }
}

/// A running dummy extcon device
///
/// Created by [`UsbDummyDriver::on_attach`](crate::UsbDummyDriver::on_attach)
/// and torn down with [`ExtconDevice::detach`].
pub struct ExtconDevice {
    inner: Arc<DeviceInner>,
    work: Option<DelayedWork>,
    debugfs: Arc<DebugFs>,
    debugfs_paths: Vec<String>,
    wakeup_capable: AtomicBool,
}

impl std::fmt::Debug for ExtconDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtconDevice")
            .field("name", &self.inner.name)
            .field("debugfs_paths", &self.debugfs_paths)
            .field("work", &"<delayed work>")
            .finish()
    }
}

impl ExtconDevice {
    pub(crate) fn new(
        inner: Arc<DeviceInner>,
        work: DelayedWork,
        debugfs: Arc<DebugFs>,
        debugfs_paths: Vec<String>,
    ) -> Self {
        Self {
            inner,
            work: Some(work),
            debugfs,
            debugfs_paths,
            wakeup_capable: AtomicBool::new(true),
        }
    }

    /// Device name used in logs
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Paths of this device's debug endpoints
    pub fn debugfs_paths(&self) -> &[String] {
        &self.debugfs_paths
    }

    /// Whether the device may wake the system
    pub fn is_wakeup_capable(&self) -> bool {
        self.wakeup_capable.load(Ordering::SeqCst)
    }

    /// Copy of the current signal store
    pub fn signals(&self) -> SignalStore {
        self.inner.with_store(|store| store.clone())
    }

    /// Effective levels the next resolution would use
    pub fn snapshot(&self) -> SignalSnapshot {
        self.inner.with_store(|store| store.snapshot())
    }

    /// Cable flags as last published
    pub fn cable_status(&self) -> CableStatus {
        *lock(&self.inner.status)
    }

    /// The active cable as last published
    pub fn cable_state(&self) -> CableState {
        self.cable_status().resolved()
    }

    /// Number of resolution passes run so far, including the initial one
    pub fn resolution_count(&self) -> u64 {
        self.inner.resolutions.load(Ordering::SeqCst)
    }

    /// Set the raw ID value and request a resolution
    pub fn set_id(&self, value: bool) {
        self.inner.with_store(|store| store.set_id(value));
        self.inner.request_resolution();
    }

    /// Set the raw VBUS value and request a resolution
    pub fn set_vbus(&self, value: bool) {
        self.inner.with_store(|store| store.set_vbus(value));
        self.inner.request_resolution();
    }

    /// Replace the resume-override record and request a resolution
    ///
    /// The record only matters at the next resume; the resolution request
    /// is kept so every write behaves like the debug endpoints.
    pub fn set_override(&self, enabled: bool, id: bool, vbus: bool) {
        self.inner
            .with_store(|store| store.set_override(enabled, id, vbus));
        self.inner.request_resolution();
    }

    /// Read an endpoint by name, formatted as `"<value>\n"`
    pub fn read_endpoint(&self, name: &str) -> Result<String, EndpointError> {
        let endpoint = find_endpoint(name)?;
        Ok(endpoint.read(&self.inner))
    }

    /// Write textual integer input to an endpoint by name
    ///
    /// Returns the number of bytes consumed.
    pub fn write_endpoint(&self, name: &str, text: &str) -> Result<usize, EndpointError> {
        let endpoint = find_endpoint(name)?;
        Ok(endpoint.write(&self.inner, text)?)
    }

    /// Names of all endpoints
    pub fn endpoint_names(&self) -> impl Iterator<Item = &'static str> {
        SIGNAL_ENDPOINTS.iter().map(|e| e.name())
    }

    pub(crate) fn inner(&self) -> &Arc<DeviceInner> {
        &self.inner
    }

    /// Remember a debug path so teardown removes it
    pub(crate) fn track_debugfs_path(&mut self, path: String) {
        self.debugfs_paths.push(path);
    }

    /// Run a resolution immediately on the caller's context
    pub(crate) fn resolve_now(&self) {
        self.inner.resolve();
    }

    /// Request a debounced resolution
    pub(crate) fn request_resolution(&self) {
        self.inner.request_resolution();
    }

    /// Withdraw every cable this device has published
    pub(crate) fn retract(&self) {
        self.inner.retract();
    }

    /// System is going to sleep
    pub fn suspend(&self) {
        trace!("{}: suspend", self.inner.name);
    }

    /// System woke up; apply the resume override if enabled
    pub fn resume(&self) {
        let applied = self.inner.with_store(SignalStore::apply_resume_override);
        if applied {
            info!("{}: resume override applied", self.inner.name);
            self.inner.request_resolution();
        } else {
            trace!("{}: resume without override", self.inner.name);
        }
    }

    /// Tear the device down
    ///
    /// Removes the debug endpoints, then cancels any pending resolution and
    /// waits for the work task to exit. No resolution runs after this
    /// returns.
    pub async fn detach(mut self) {
        self.release().await;
    }

    pub(crate) async fn release(&mut self) {
        for path in self.debugfs_paths.drain(..).rev() {
            if let Err(e) = self.debugfs.remove(&path) {
                warn!("{}: failed to remove {}: {}", self.inner.name, path, e);
            }
        }
        if let Some(work) = self.work.take() {
            work.cancel_and_join().await;
        }
        self.wakeup_capable.store(false, Ordering::SeqCst);
        debug!("{}: released", self.inner.name);
    }
}

impl Drop for ExtconDevice {
    fn drop(&mut self) {
        // Dropped without detach; the work task is aborted by its own Drop
        if self.debugfs_paths.is_empty() {
            return;
        }
        for path in self.debugfs_paths.drain(..).rev() {
            if let Err(e) = self.debugfs.remove(&path) {
                warn!("{}: failed to remove {}: {}", self.inner.name, path, e);
            }
        }
        self.wakeup_capable.store(false, Ordering::SeqCst);
        debug!("{}: dropped without detach", self.inner.name);
    }
}
