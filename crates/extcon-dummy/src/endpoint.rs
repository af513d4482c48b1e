//! Integer control endpoints
//!
//! The five endpoints (`id`, `vbus`, `override_on_resume`, `resume_id`,
//! `resume_vbus`) share one implementation: a name plus a getter/setter pair
//! on [`SignalStore`]. Reads render the stored value as `0`/`1` followed by a
//! newline. Writes accept any integer [`parse_int`] understands; non-zero is
//! high. Every successful write requests a debounced resolution.

use std::sync::Arc;

use extcon_core::{parse_int, InputError, SignalStore};
use tracing::{debug, warn};

use crate::debugfs::DebugFile;
use crate::device::DeviceInner;
use crate::error::EndpointError;

/// A named read/write view of one signal store field
#[derive(Debug, Clone, Copy)]
pub struct SignalEndpoint {
    name: &'static str,
    get: fn(&SignalStore) -> bool,
    set: fn(&mut SignalStore, bool),
}

/// All endpoints exposed by a device, in creation order
pub static SIGNAL_ENDPOINTS: [SignalEndpoint; 5] = [
    SignalEndpoint::new("id", SignalStore::id, SignalStore::set_id),
    SignalEndpoint::new("vbus", SignalStore::vbus, SignalStore::set_vbus),
    SignalEndpoint::new(
        "override_on_resume",
        SignalStore::override_on_resume,
        SignalStore::set_override_on_resume,
    ),
    SignalEndpoint::new("resume_id", SignalStore::resume_id, SignalStore::set_resume_id),
    SignalEndpoint::new("resume_vbus", SignalStore::resume_vbus, SignalStore::set_resume_vbus),
];

/// Look up an endpoint by name
pub fn find_endpoint(name: &str) -> Result<&'static SignalEndpoint, EndpointError> {
    SIGNAL_ENDPOINTS
        .iter()
        .find(|e| e.name == name)
        .ok_or_else(|| EndpointError::Unknown(name.to_string()))
}

impl SignalEndpoint {
    const fn new(
        name: &'static str,
        get: fn(&SignalStore) -> bool,
        set: fn(&mut SignalStore, bool),
    ) -> Self {
        Self { name, get, set }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value of the field as an integer
    pub fn value(&self, store: &SignalStore) -> i32 {
        i32::from((self.get)(store))
    }

    /// Render the field the way a read returns it
    pub(crate) fn read(&self, device: &DeviceInner) -> String {
        let value = device.with_store(|store| self.value(store));
        format!("{}\n", value)
    }

    /// Parse and store written text, then request a resolution
    ///
    /// Malformed input leaves the store untouched.
    pub(crate) fn write(&self, device: &DeviceInner, text: &str) -> Result<usize, InputError> {
        let value = parse_int(text).inspect_err(|e| {
            warn!("{}: rejected write to {}: {}", device.name(), self.name, e);
        })?;
        device.with_store(|store| (self.set)(store, value != 0));
        debug!("{}: {} <- {}", device.name(), self.name, value);
        device.request_resolution();
        Ok(text.len())
    }
}

/// Debug file bound to one endpoint of one device
pub(crate) struct EndpointFile {
    endpoint: &'static SignalEndpoint,
    device: Arc<DeviceInner>,
}

impl EndpointFile {
    pub(crate) fn new(endpoint: &'static SignalEndpoint, device: Arc<DeviceInner>) -> Self {
        Self { endpoint, device }
    }
}

impl DebugFile for EndpointFile {
    fn read(&self) -> String {
        self.endpoint.read(&self.device)
    }

    fn write(&self, text: &str) -> Result<usize, InputError> {
        self.endpoint.write(&self.device, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_are_unique() {
        let names: Vec<_> = SIGNAL_ENDPOINTS.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["id", "vbus", "override_on_resume", "resume_id", "resume_vbus"]
        );
    }

    #[test]
    fn test_each_endpoint_touches_its_own_field() {
        for endpoint in &SIGNAL_ENDPOINTS {
            let mut store = SignalStore::new(true, true);
            (endpoint.set)(&mut store, true);
            assert_eq!(endpoint.value(&store), 1, "{}", endpoint.name());

            let others = SIGNAL_ENDPOINTS
                .iter()
                .filter(|e| e.name() != endpoint.name())
                .map(|e| e.value(&store));
            assert!(others.into_iter().all(|v| v == 0), "{}", endpoint.name());
        }
    }

    #[test]
    fn test_find_unknown() {
        assert!(find_endpoint("vbus").is_ok());
        assert_eq!(
            find_endpoint("state").unwrap_err(),
            EndpointError::Unknown("state".to_string())
        );
    }
}
