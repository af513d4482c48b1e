//! Cable-state subscriber interface

use crate::cable::CableState;
use crate::error::NotifyError;

/// Receiver of cable activity changes
///
/// Called from the resolver's execution context, once per flag that actually
/// changed, in resolution order. Implementations must not call back into the
/// device that notifies them.
pub trait CableSubscriber: Send + Sync {
    /// A cable became active or inactive
    fn set_active(&self, cable: CableState, active: bool) -> Result<(), NotifyError>;
}
