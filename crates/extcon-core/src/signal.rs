//! Raw ID/VBUS signal storage

/// Current raw signal values and the resume-override record
///
/// A deployment may wire only one of the two signals. The missing one
/// defaults so that the remaining signal can still tell the meaningful
/// cable states apart:
/// - VBUS only: ID reads high, so USB and NONE remain distinguishable
/// - ID only: VBUS follows ID, so USB and USB-HOST remain distinguishable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalStore {
    id_value: bool,
    vbus_value: bool,
    have_id_support: bool,
    have_vbus_support: bool,
    override_on_resume: bool,
    resume_id_value: bool,
    resume_vbus_value: bool,
}

/// Effective signal levels captured for one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalSnapshot {
    /// Effective ID level (low = host cable)
    pub id: bool,
    /// Effective VBUS level
    pub vbus: bool,
}

impl SignalStore {
    /// Create a store with the given signal support
    ///
    /// Support flags are fixed for the lifetime of the store. All values
    /// start low.
    pub fn new(have_id_support: bool, have_vbus_support: bool) -> Self {
        Self {
            id_value: false,
            vbus_value: false,
            have_id_support,
            have_vbus_support,
            override_on_resume: false,
            resume_id_value: false,
            resume_vbus_value: false,
        }
    }

    /// Create a store with support flags and initial raw values
    pub fn with_defaults(
        have_id_support: bool,
        have_vbus_support: bool,
        default_id: bool,
        default_vbus: bool,
    ) -> Self {
        Self {
            id_value: default_id,
            vbus_value: default_vbus,
            ..Self::new(have_id_support, have_vbus_support)
        }
    }

    pub fn id(&self) -> bool {
        self.id_value
    }

    pub fn vbus(&self) -> bool {
        self.vbus_value
    }

    pub fn have_id_support(&self) -> bool {
        self.have_id_support
    }

    pub fn have_vbus_support(&self) -> bool {
        self.have_vbus_support
    }

    pub fn override_on_resume(&self) -> bool {
        self.override_on_resume
    }

    pub fn resume_id(&self) -> bool {
        self.resume_id_value
    }

    pub fn resume_vbus(&self) -> bool {
        self.resume_vbus_value
    }

    pub fn set_id(&mut self, value: bool) {
        self.id_value = value;
    }

    pub fn set_vbus(&mut self, value: bool) {
        self.vbus_value = value;
    }

    pub fn set_override_on_resume(&mut self, enabled: bool) {
        self.override_on_resume = enabled;
    }

    pub fn set_resume_id(&mut self, value: bool) {
        self.resume_id_value = value;
    }

    pub fn set_resume_vbus(&mut self, value: bool) {
        self.resume_vbus_value = value;
    }

    /// Replace the whole resume-override record
    pub fn set_override(&mut self, enabled: bool, id: bool, vbus: bool) {
        self.override_on_resume = enabled;
        self.resume_id_value = id;
        self.resume_vbus_value = vbus;
    }

    /// ID level used for resolution; high when ID is not wired
    pub fn effective_id(&self) -> bool {
        if self.have_id_support {
            self.id_value
        } else {
            true
        }
    }

    /// VBUS level used for resolution; follows ID when VBUS is not wired
    pub fn effective_vbus(&self) -> bool {
        if self.have_vbus_support {
            self.vbus_value
        } else {
            self.effective_id()
        }
    }

    /// Capture the effective levels
    pub fn snapshot(&self) -> SignalSnapshot {
        SignalSnapshot {
            id: self.effective_id(),
            vbus: self.effective_vbus(),
        }
    }

    /// Copy the resume values over ID/VBUS if the override is enabled
    ///
    /// Returns true if the raw values were overwritten.
    pub fn apply_resume_override(&mut self) -> bool {
        if !self.override_on_resume {
            return false;
        }
        self.id_value = self.resume_id_value;
        self.vbus_value = self.resume_vbus_value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_values_with_both_signals() {
        let store = SignalStore::with_defaults(true, true, false, true);
        assert_eq!(store.snapshot(), SignalSnapshot { id: false, vbus: true });
    }

    #[test]
    fn test_missing_id_reads_high() {
        let mut store = SignalStore::new(false, true);
        store.set_id(false);
        assert!(store.effective_id());
        assert!(!store.effective_vbus());
    }

    #[test]
    fn test_missing_vbus_follows_id() {
        let mut store = SignalStore::new(true, false);
        store.set_vbus(true);
        store.set_id(false);
        assert!(!store.effective_vbus());
        store.set_id(true);
        assert!(store.effective_vbus());
    }

    #[test]
    fn test_no_signals_reads_usb_levels() {
        let store = SignalStore::new(false, false);
        assert_eq!(store.snapshot(), SignalSnapshot { id: true, vbus: true });
    }

    #[test]
    fn test_resume_override_disabled_is_noop() {
        let mut store = SignalStore::with_defaults(true, true, true, false);
        store.set_resume_id(false);
        store.set_resume_vbus(true);
        assert!(!store.apply_resume_override());
        assert!(store.id());
        assert!(!store.vbus());
    }

    #[test]
    fn test_resume_override_copies_values() {
        let mut store = SignalStore::with_defaults(true, true, true, false);
        store.set_override(true, false, true);
        assert!(store.apply_resume_override());
        assert!(!store.id());
        assert!(store.vbus());
        // Record itself is untouched
        assert!(store.override_on_resume());
    }
}
