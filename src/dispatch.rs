//! Moves pending device events into the snapshot

use crate::device::{DeviceError, InputDevice, InputEvent};
use crate::snapshot::JoystickSnapshot;
use tracing::debug;

/// What a single [`drain`] pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    /// At least one event changed the snapshot
    pub applied: bool,
    /// A `Quit` event was seen; events queued behind it were left unread
    pub quit: bool,
}

/// Apply every event the device has queued to `snapshot`.
///
/// Stops at the first `Quit`. Unknown event kinds are skipped and only logged
/// at debug level: stderr is underneath the alternate screen while the test
/// view runs, and anything written there corrupts the frame.
pub fn drain<D: InputDevice + ?Sized>(
    device: &mut D,
    snapshot: &mut JoystickSnapshot,
) -> Result<DrainOutcome, DeviceError> {
    let mut outcome = DrainOutcome::default();

    while let Some(event) = device.poll_event()? {
        match event {
            InputEvent::Quit => {
                outcome.quit = true;
                break;
            }
            InputEvent::Unknown { kind } => {
                debug!("Unhandled event type: {}", kind);
            }
            _ => {
                outcome.applied |= snapshot.apply(&event);
            }
        }
    }

    Ok(outcome)
}
