//! Photo library backed by a directory per album.
//!
//! Saved photos are moved out of the camera's staging directory into
//! `{root}/{album}/` together with a JSON metadata sidecar.
//!
//! ## Layout
//! ```text
//! {root}/{album}/{photo_id}.jpg
//! {root}/{album}/{photo_id}.metadata.json
//! ```

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use level_shot_core::models::error::{Capability, CaptureError};
use level_shot_core::models::photo::{CapturedPhoto, PhotoMetadata};
use level_shot_core::storage::metadata;
use level_shot_core::traits::persistence_sink::PersistenceSink;

pub const DEFAULT_ALBUM: &str = "AppPhotos";

pub struct AlbumStore {
    root: PathBuf,
    album: String,
    authorized: bool,
}

impl AlbumStore {
    pub fn new(root: impl Into<PathBuf>, album: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            album: album.into(),
            authorized: true,
        }
    }

    pub fn with_default_album(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_ALBUM)
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn album_dir(&self) -> PathBuf {
        self.root.join(&self.album)
    }

    /// Simulate the user granting or denying photo library access.
    pub fn set_authorized(&mut self, authorized: bool) {
        self.authorized = authorized;
    }

    /// Photos currently in the album, sorted by file name.
    pub fn list_photos(&self) -> Result<Vec<PathBuf>, CaptureError> {
        let dir = self.album_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CaptureError::StorageError(format!("failed to list album: {}", e))),
        };

        let mut photos: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| !path.to_string_lossy().ends_with(".metadata.json"))
            .collect();
        photos.sort();
        Ok(photos)
    }
}

impl PersistenceSink for AlbumStore {
    fn save(&mut self, photo: CapturedPhoto) -> Result<(), CaptureError> {
        let staged = PathBuf::from(photo.handle.uri());
        if !self.authorized {
            remove_staged(&staged);
            return Err(CaptureError::PermissionDenied(Capability::PhotoLibrary));
        }

        let dir = self.album_dir();
        fs::create_dir_all(&dir)
            .map_err(|e| CaptureError::StorageError(format!("failed to create album: {}", e)))?;

        let extension = staged.extension().and_then(|e| e.to_str()).unwrap_or("jpg");
        let dest = dir.join(format!("{}.{}", photo.id, extension));
        move_file(&staged, &dest)?;

        let checksum = photo_checksum(&dest)?;
        let meta = PhotoMetadata::for_photo(&photo, &dest.to_string_lossy(), &self.album, &checksum);
        metadata::write_metadata(&meta, &dest)?;

        log::info!("added {} to album {}", dest.display(), self.album);
        Ok(())
    }

    fn discard(&mut self, photo: CapturedPhoto) -> Result<(), CaptureError> {
        remove_staged(Path::new(photo.handle.uri()));
        Ok(())
    }
}

fn remove_staged(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            log::warn!("failed to remove staged capture {}: {}", path.display(), e);
        }
    }
}

/// Rename, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<(), CaptureError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|e| CaptureError::StorageError(format!("failed to copy photo: {}", e)))?;
    remove_staged(from);
    Ok(())
}

/// Lowercase hex SHA-256 of the file at `path`, hashed while streaming.
fn photo_checksum(path: &Path) -> Result<String, CaptureError> {
    let checksum_err = |e: io::Error| CaptureError::StorageError(format!("failed to checksum {}: {}", path.display(), e));
    let mut file = fs::File::open(path).map_err(checksum_err)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(checksum_err)?;

    let mut hex = String::with_capacity(64);
    for byte in hasher.finalize() {
        // Writing into a String cannot fail.
        let _ = write!(hex, "{:02x}", byte);
    }
    Ok(hex)
}
