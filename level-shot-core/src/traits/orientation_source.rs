use std::fmt;
use std::sync::Arc;

use crate::models::error::CaptureError;
use crate::models::tilt::TiltReading;

/// Callback invoked for every tilt reading the sensor produces.
pub type ReadingCallback = Arc<dyn Fn(TiltReading) + Send + Sync + 'static>;

/// Interface for platform orientation sensors.
///
/// Implementations must deliver readings from their own thread (or event
/// loop), never synchronously from inside `subscribe`, and the cancel closure
/// of a [`Subscription`] must not block on callbacks that are in flight.
pub trait OrientationSource: Send + Sync {
    /// Whether the sensor exists on this device.
    fn is_available(&self) -> bool;

    /// Start delivering readings to `callback` until the returned
    /// subscription is dropped.
    ///
    /// Returns `PermissionDenied(Capability::Motion)` when the user has not
    /// granted sensor access.
    fn subscribe(&mut self, callback: ReadingCallback) -> Result<Subscription, CaptureError>;

    /// The most recent reading the sensor produced, if any.
    fn latest_reading(&self) -> Option<TiltReading>;
}

/// Live registration with an [`OrientationSource`]. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
