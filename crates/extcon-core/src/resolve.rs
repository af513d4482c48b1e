//! Cable resolution from effective ID/VBUS levels
//!
//! "USB" follows VBUS and "USB-HOST" follows !ID. The two can never be active
//! together, so when ID is low "USB" stays inactive even with VBUS present.
//!
//! Publications come out in a fixed order: every deactivation precedes the
//! single activation. A subscriber applying them one by one never sees both
//! cables active, not even between two notifications.

use tracing::trace;

use crate::cable::{CableState, CableStatus};
use crate::signal::SignalSnapshot;

/// One cable activity update produced by a resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    /// Cable being updated
    pub cable: CableState,
    /// New activity flag
    pub active: bool,
}

impl Publication {
    fn new(cable: CableState, active: bool) -> Self {
        Self { cable, active }
    }
}

/// Compute the ordered publications for the given effective levels
///
/// Deactivations are listed unconditionally; applying them to a
/// [`CableStatus`] filters out the ones that change nothing.
pub fn resolve(snapshot: SignalSnapshot) -> Vec<Publication> {
    let SignalSnapshot { id, vbus } = snapshot;
    let mut out = Vec::with_capacity(3);

    // Clear states which are no longer active first
    if id {
        out.push(Publication::new(CableState::UsbHost, false));
    }
    if !vbus || !id {
        out.push(Publication::new(CableState::Usb, false));
    }

    if !id {
        out.push(Publication::new(CableState::UsbHost, true));
    } else if vbus {
        out.push(Publication::new(CableState::Usb, true));
    }

    trace!("resolve id={} vbus={} -> {:?}", id, vbus, out);
    out
}

/// Apply publications to a status, keeping only those that changed a flag
pub fn apply(status: &mut CableStatus, publications: &[Publication]) -> Vec<Publication> {
    publications
        .iter()
        .copied()
        .filter(|p| status.set_active(p.cable, p.active))
        .collect()
}

/// The cable a snapshot resolves to
pub fn expected_state(snapshot: SignalSnapshot) -> CableState {
    match (snapshot.id, snapshot.vbus) {
        (true, true) => CableState::Usb,
        (true, false) => CableState::None,
        (false, _) => CableState::UsbHost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalStore;
    use proptest::prelude::*;

    fn snap(id: bool, vbus: bool) -> SignalSnapshot {
        SignalSnapshot { id, vbus }
    }

    fn resolved_from(status: CableStatus, snapshot: SignalSnapshot) -> CableStatus {
        let mut status = status;
        apply(&mut status, &resolve(snapshot));
        status
    }

    #[test]
    fn test_truth_table() {
        let start = CableStatus::default();
        assert_eq!(resolved_from(start, snap(true, true)).resolved(), CableState::Usb);
        assert_eq!(resolved_from(start, snap(true, false)).resolved(), CableState::None);
        assert_eq!(resolved_from(start, snap(false, true)).resolved(), CableState::UsbHost);
        assert_eq!(resolved_from(start, snap(false, false)).resolved(), CableState::UsbHost);
    }

    #[test]
    fn test_deactivations_come_first() {
        let pubs = resolve(snap(false, true));
        assert_eq!(
            pubs,
            vec![
                Publication::new(CableState::Usb, false),
                Publication::new(CableState::UsbHost, true),
            ]
        );

        let pubs = resolve(snap(true, true));
        assert_eq!(
            pubs,
            vec![
                Publication::new(CableState::UsbHost, false),
                Publication::new(CableState::Usb, true),
            ]
        );
    }

    #[test]
    fn test_usb_to_host_clears_usb() {
        let mut status = CableStatus::default();
        apply(&mut status, &resolve(snap(true, true)));
        assert!(status.is_active(CableState::Usb));

        let changed = apply(&mut status, &resolve(snap(false, true)));
        assert_eq!(
            changed,
            vec![
                Publication::new(CableState::Usb, false),
                Publication::new(CableState::UsbHost, true),
            ]
        );
        assert!(!status.is_conflicting());
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let mut status = CableStatus::default();
        let first = apply(&mut status, &resolve(snap(true, true)));
        assert_eq!(first.len(), 1);
        let second = apply(&mut status, &resolve(snap(true, true)));
        assert!(second.is_empty());
    }

    fn any_status() -> impl Strategy<Value = CableStatus> {
        prop_oneof![
            Just(CableStatus::default()),
            Just(resolved_from(CableStatus::default(), snap(true, true))),
            Just(resolved_from(CableStatus::default(), snap(false, false))),
        ]
    }

    proptest! {
        #[test]
        fn matches_truth_table_with_missing_signals(
            id_support in any::<bool>(),
            vbus_support in any::<bool>(),
            id in any::<bool>(),
            vbus in any::<bool>(),
            start in any_status(),
        ) {
            let store = SignalStore::with_defaults(id_support, vbus_support, id, vbus);
            let eff_id = if id_support { id } else { true };
            let eff_vbus = if vbus_support { vbus } else { eff_id };
            let expected = match (eff_id, eff_vbus) {
                (true, true) => CableState::Usb,
                (true, false) => CableState::None,
                _ => CableState::UsbHost,
            };

            let status = resolved_from(start, store.snapshot());
            prop_assert_eq!(status.resolved(), expected);
            prop_assert_eq!(expected_state(store.snapshot()), expected);
            prop_assert!(!status.is_conflicting());
        }

        #[test]
        fn never_both_active_between_notifications(
            snapshots in prop::collection::vec((any::<bool>(), any::<bool>()), 1..20)
        ) {
            let mut status = CableStatus::default();
            for (id, vbus) in snapshots {
                for p in resolve(snap(id, vbus)) {
                    status.set_active(p.cable, p.active);
                    prop_assert!(!status.is_conflicting());
                }
            }
        }
    }
}
