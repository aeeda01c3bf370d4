use crate::models::error::CaptureError;
use crate::models::photo::CapturedPhoto;

/// Interface for the photo library.
///
/// Both operations consume the photo: after either returns, the handle is
/// no longer valid.
pub trait PersistenceSink: Send + Sync {
    /// Store the photo in the library.
    fn save(&mut self, photo: CapturedPhoto) -> Result<(), CaptureError>;

    /// Release the photo without storing it.
    fn discard(&mut self, photo: CapturedPhoto) -> Result<(), CaptureError>;
}
