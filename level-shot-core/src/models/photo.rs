use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tilt::{CalibratedTilt, CalibrationOffset, TiltReading};

/// Opaque reference to an image produced by the camera, usually a URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn uri(&self) -> &str {
        &self.0
    }
}

/// A photo taken by the trigger, awaiting the user's save or discard decision.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub id: String,
    pub handle: ImageHandle,
    pub captured_at: DateTime<Utc>,
    pub raw: TiltReading,
    pub tilt: CalibratedTilt,
}

impl CapturedPhoto {
    pub fn new(handle: ImageHandle, raw: TiltReading, tilt: CalibratedTilt) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            handle,
            captured_at: Utc::now(),
            raw,
            tilt,
        }
    }

    /// The offset that was in effect when the photo was triggered.
    pub fn offset(&self) -> CalibrationOffset {
        CalibrationOffset {
            beta: self.raw.beta - self.tilt.beta,
            gamma: self.raw.gamma - self.tilt.gamma,
        }
    }
}

/// Metadata stored alongside a saved photo.
///
/// Serializable for the JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub id: String,
    pub file_path: String,
    pub album: String,
    pub created_at: String,
    pub raw: TiltReading,
    pub tilt: CalibratedTilt,
    pub offset: CalibrationOffset,
    pub checksum: String,
}

impl PhotoMetadata {
    pub fn for_photo(photo: &CapturedPhoto, file_path: &str, album: &str, checksum: &str) -> Self {
        Self {
            id: photo.id.clone(),
            file_path: file_path.to_string(),
            album: album.to_string(),
            created_at: photo.captured_at.to_rfc3339(),
            raw: photo.raw,
            tilt: photo.tilt,
            offset: photo.offset(),
            checksum: checksum.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn offset_is_recovered_from_raw_and_tilt() {
        let raw = TiltReading::new(0.4, -0.1);
        let offset = CalibrationOffset { beta: 0.35, gamma: -0.12 };
        let photo = CapturedPhoto::new(ImageHandle::new("file:///tmp/a.jpg"), raw, raw.calibrated(offset));

        let recovered = photo.offset();
        assert_abs_diff_eq!(recovered.beta, offset.beta, epsilon = 1e-12);
        assert_abs_diff_eq!(recovered.gamma, offset.gamma, epsilon = 1e-12);
    }

    #[test]
    fn handle_serializes_as_plain_uri() {
        let json = serde_json::to_string(&ImageHandle::new("file:///tmp/a.jpg")).unwrap();
        assert_eq!(json, r#""file:///tmp/a.jpg""#);
    }

    #[test]
    fn each_photo_gets_a_fresh_id() {
        let handle = ImageHandle::new("file:///tmp/a.jpg");
        let a = CapturedPhoto::new(handle.clone(), TiltReading::default(), CalibratedTilt::default());
        let b = CapturedPhoto::new(handle, TiltReading::default(), CalibratedTilt::default());
        assert_ne!(a.id, b.id);
    }
}
