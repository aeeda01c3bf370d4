use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::CaptureError;
use crate::models::photo::PhotoMetadata;

/// Path of the JSON sidecar for a photo file.
pub fn metadata_path(photo_path: &Path) -> PathBuf {
    photo_path.with_extension("metadata.json")
}

/// Write photo metadata as a JSON sidecar file.
///
/// Creates `{photo_stem}.metadata.json` alongside the photo.
pub fn write_metadata(metadata: &PhotoMetadata, photo_path: &Path) -> Result<(), CaptureError> {
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(metadata_path(photo_path), json)
        .map_err(|e| CaptureError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read photo metadata from a JSON sidecar file.
pub fn read_metadata(photo_path: &Path) -> Result<PhotoMetadata, CaptureError> {
    let json = fs::read_to_string(metadata_path(photo_path))
        .map_err(|e| CaptureError::StorageError(format!("failed to read metadata: {}", e)))?;
    let metadata: PhotoMetadata = serde_json::from_str(&json)
        .map_err(|e| CaptureError::StorageError(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::photo::{CapturedPhoto, ImageHandle};
    use crate::models::tilt::{CalibrationOffset, TiltReading};

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("level_shot_test_{}", name))
    }

    #[test]
    fn sidecar_sits_next_to_photo() {
        let path = Path::new("/album/photo_1.jpg");
        assert_eq!(metadata_path(path), PathBuf::from("/album/photo_1.metadata.json"));
    }

    #[test]
    fn write_then_read_sidecar() {
        let path = temp_file_path(&format!("{}.jpg", uuid::Uuid::new_v4()));
        let raw = TiltReading::new(0.12, -0.03);
        let offset = CalibrationOffset { beta: 0.1, gamma: 0.0 };
        let photo = CapturedPhoto::new(ImageHandle::new(path.to_string_lossy()), raw, raw.calibrated(offset));
        let metadata = PhotoMetadata::for_photo(&photo, &path.to_string_lossy(), "AppPhotos", "abc123");

        write_metadata(&metadata, &path).unwrap();
        let loaded = read_metadata(&path).unwrap();

        assert_eq!(loaded.id, photo.id);
        assert_eq!(loaded.album, "AppPhotos");
        assert_eq!(loaded.checksum, "abc123");
        assert_eq!(loaded.raw, raw);

        fs::remove_file(metadata_path(&path)).ok();
    }

    #[test]
    fn missing_sidecar_is_a_storage_error() {
        let path = temp_file_path("does_not_exist.jpg");
        assert!(matches!(read_metadata(&path), Err(CaptureError::StorageError(_))));
    }
}
