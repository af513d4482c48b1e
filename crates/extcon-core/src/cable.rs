//! Cable states and published activity flags

use std::fmt;

/// A cable type a USB detection device can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CableState {
    /// Device-mode cable: VBUS present, no host pulled ID low
    Usb,
    /// Host-mode (OTG) cable: ID pulled low
    UsbHost,
    /// Nothing attached
    None,
}

/// Cables advertised by the device, terminated by [`CableState::None`]
pub const SUPPORTED_CABLES: [CableState; 3] = [CableState::Usb, CableState::UsbHost, CableState::None];

impl CableState {
    /// Returns the extcon name of the cable
    pub fn name(&self) -> &'static str {
        match self {
            Self::Usb => "USB",
            Self::UsbHost => "USB-HOST",
            Self::None => "NONE",
        }
    }

    /// Whether this state carries an activity flag
    ///
    /// `None` is the absence of a cable and is never published on its own.
    pub fn is_cable(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for CableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Activity flags of every cable, as last published
///
/// Updates are idempotent: [`CableStatus::set_active`] reports whether the
/// flag actually changed so callers only notify on real transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CableStatus {
    usb: bool,
    usb_host: bool,
}

impl CableStatus {
    /// Check whether a cable is currently active
    pub fn is_active(&self, cable: CableState) -> bool {
        match cable {
            CableState::Usb => self.usb,
            CableState::UsbHost => self.usb_host,
            CableState::None => !self.usb && !self.usb_host,
        }
    }

    /// Set a cable's activity flag
    ///
    /// Returns true if the flag changed. Setting `None` is a no-op.
    pub fn set_active(&mut self, cable: CableState, active: bool) -> bool {
        let flag = match cable {
            CableState::Usb => &mut self.usb,
            CableState::UsbHost => &mut self.usb_host,
            CableState::None => return false,
        };
        if *flag == active {
            return false;
        }
        *flag = active;
        true
    }

    /// The single active cable, or `None` when nothing is attached
    ///
    /// Host mode wins if both flags are somehow set.
    pub fn resolved(&self) -> CableState {
        if self.usb_host {
            CableState::UsbHost
        } else if self.usb {
            CableState::Usb
        } else {
            CableState::None
        }
    }

    /// Whether both USB and USB-HOST are flagged active
    pub fn is_conflicting(&self) -> bool {
        self.usb && self.usb_host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cable_names() {
        assert_eq!(CableState::Usb.to_string(), "USB");
        assert_eq!(CableState::UsbHost.to_string(), "USB-HOST");
        assert_eq!(CableState::None.to_string(), "NONE");
    }

    #[test]
    fn test_supported_cables_terminated_by_none() {
        assert_eq!(SUPPORTED_CABLES.last(), Some(&CableState::None));
        assert!(SUPPORTED_CABLES[..2].iter().all(CableState::is_cable));
    }

    #[test]
    fn test_set_active_reports_changes_only() {
        let mut status = CableStatus::default();
        assert_eq!(status.resolved(), CableState::None);

        assert!(status.set_active(CableState::Usb, true));
        assert!(!status.set_active(CableState::Usb, true));
        assert_eq!(status.resolved(), CableState::Usb);

        assert!(!status.set_active(CableState::UsbHost, false));
        assert!(status.set_active(CableState::Usb, false));
        assert!(status.is_active(CableState::None));
    }

    #[test]
    fn test_none_is_never_stored() {
        let mut status = CableStatus::default();
        assert!(!status.set_active(CableState::None, true));
        assert_eq!(status, CableStatus::default());
    }

    #[test]
    fn test_conflict_detection() {
        let mut status = CableStatus::default();
        status.set_active(CableState::Usb, true);
        assert!(!status.is_conflicting());
        status.set_active(CableState::UsbHost, true);
        assert!(status.is_conflicting());
        assert_eq!(status.resolved(), CableState::UsbHost);
    }
}
