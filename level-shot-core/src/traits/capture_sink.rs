use crate::models::error::CaptureError;
use crate::models::photo::ImageHandle;

/// Interface for the camera that takes the actual picture.
pub trait CaptureSink: Send + Sync {
    /// Whether the user has granted camera access.
    fn is_authorized(&self) -> bool;

    /// Take a picture and return a handle to the stored image.
    ///
    /// May block while the hardware works. `NotReady` is recoverable; the
    /// session retries on the next level reading.
    fn take_picture(&mut self) -> Result<ImageHandle, CaptureError>;
}
