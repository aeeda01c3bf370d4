use std::fmt;

use thiserror::Error;

/// Device capability guarded by a host permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Camera,
    Motion,
    PhotoLibrary,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Camera => "camera",
            Self::Motion => "motion sensor",
            Self::PhotoLibrary => "photo library",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while arming, capturing or persisting photos.
///
/// Only `PermissionDenied` blocks the user; everything else is local to the
/// attempt that produced it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied: {0}")]
    PermissionDenied(Capability),

    #[error("camera not ready: {0}")]
    NotReady(String),

    #[error("orientation sensor unavailable")]
    SensorUnavailable,

    #[error("a captured photo is still awaiting save or discard")]
    PhotoPending,

    #[error("no captured photo to save or discard")]
    NoPendingPhoto,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("timer failed: {0}")]
    TimerFailed(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Whether the failed operation may simply be retried later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotReady(_) | Self::StorageError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_message_names_capability() {
        let err = CaptureError::PermissionDenied(Capability::PhotoLibrary);
        assert_eq!(err.to_string(), "permission denied: photo library");
    }

    #[test]
    fn only_transient_errors_are_recoverable() {
        assert!(CaptureError::NotReady("warming up".into()).is_recoverable());
        assert!(!CaptureError::PermissionDenied(Capability::Camera).is_recoverable());
        assert!(!CaptureError::SensorUnavailable.is_recoverable());
    }
}
