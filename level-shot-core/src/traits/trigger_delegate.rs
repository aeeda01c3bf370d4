use crate::models::error::CaptureError;
use crate::models::photo::CapturedPhoto;
use crate::models::state::ArmingState;
use crate::models::tilt::CalibratedTilt;

/// Event delegate for auto-capture session notifications.
///
/// Called from whichever thread caused the event: the sensor thread for
/// readings and captures, the timer thread for delayed arming, the caller's
/// thread for commands. Never called while session state is locked.
pub trait TriggerDelegate: Send + Sync {
    /// Called when the arming state changes.
    fn on_state_changed(&self, state: &ArmingState);

    /// Called with the calibrated tilt of every reading delivered while armed.
    fn on_tilt_updated(&self, tilt: &CalibratedTilt);

    /// Called for recoverable failures (camera not ready, storage errors).
    fn on_error(&self, error: &CaptureError);

    /// Called once a photo has been taken and awaits save or discard.
    fn on_photo_captured(&self, photo: &CapturedPhoto);
}
