//! Camera that snapshots the latest preview frame to a staging directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use level_shot_core::models::error::{Capability, CaptureError};
use level_shot_core::models::photo::ImageHandle;
use level_shot_core::traits::capture_sink::CaptureSink;

/// Producer side of a `FrameCamera`, handed to whatever renders the preview.
#[derive(Clone)]
pub struct FrameFeed {
    latest: Arc<Mutex<Option<Vec<u8>>>>,
}

impl FrameFeed {
    /// Replace the current preview frame with an encoded (JPEG) image.
    pub fn push(&self, frame: Vec<u8>) {
        *self.latest.lock() = Some(frame);
    }

    /// Drop the current frame, e.g. when the preview stops.
    pub fn clear(&self) {
        *self.latest.lock() = None;
    }
}

/// Capture sink writing the newest preview frame to `staging_dir`.
///
/// Reports `NotReady` until the first frame arrives, which is how a camera
/// that is still starting up behaves.
pub struct FrameCamera {
    staging_dir: PathBuf,
    latest: Arc<Mutex<Option<Vec<u8>>>>,
    authorized: Arc<AtomicBool>,
}

impl FrameCamera {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            latest: Arc::new(Mutex::new(None)),
            authorized: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn feed(&self) -> FrameFeed {
        FrameFeed {
            latest: Arc::clone(&self.latest),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Simulate the user granting or revoking camera access.
    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }
}

impl CaptureSink for FrameCamera {
    fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    fn take_picture(&mut self) -> Result<ImageHandle, CaptureError> {
        if !self.is_authorized() {
            return Err(CaptureError::PermissionDenied(Capability::Camera));
        }
        let frame = self
            .latest
            .lock()
            .clone()
            .ok_or_else(|| CaptureError::NotReady("no preview frame yet".into()))?;

        fs::create_dir_all(&self.staging_dir)
            .map_err(|e| CaptureError::StorageError(format!("failed to create staging directory: {}", e)))?;
        let path = self
            .staging_dir
            .join(format!("capture_{}.jpg", uuid::Uuid::new_v4()));
        fs::write(&path, &frame)
            .map_err(|e| CaptureError::StorageError(format!("failed to write capture: {}", e)))?;

        log::debug!("staged {} byte frame at {}", frame.len(), path.display());
        Ok(ImageHandle::new(path.to_string_lossy()))
    }
}
