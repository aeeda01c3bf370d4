//! Orientation source that replays recorded tilt readings.
//!
//! Stands in for the device motion sensor on hosts without one: readings
//! are delivered at a fixed cadence on a dedicated thread, the same way a
//! platform sensor delivers its callbacks.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use level_shot_core::models::error::{Capability, CaptureError};
use level_shot_core::models::tilt::TiltReading;
use level_shot_core::traits::orientation_source::{OrientationSource, ReadingCallback, Subscription};

/// Replays a fixed sequence of readings to each subscriber.
pub struct ReplayOrientationSource {
    readings: Arc<Vec<TiltReading>>,
    interval: Duration,
    looping: bool,
    permission_granted: bool,
    latest: Arc<Mutex<Option<TiltReading>>>,
}

impl ReplayOrientationSource {
    pub fn new(readings: Vec<TiltReading>, interval: Duration) -> Self {
        Self {
            readings: Arc::new(readings),
            interval,
            looping: false,
            permission_granted: true,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Load readings from a JSON array of `{"beta": .., "gamma": ..}` objects.
    pub fn from_json_file(path: &Path, interval: Duration) -> Result<Self, CaptureError> {
        let json = fs::read_to_string(path)
            .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to read readings: {}", e)))?;
        let readings: Vec<TiltReading> = serde_json::from_str(&json)
            .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to parse readings: {}", e)))?;
        Ok(Self::new(readings, interval))
    }

    /// Start over from the first reading after the last one.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Simulate the user granting or denying motion access.
    pub fn set_permission_granted(&mut self, granted: bool) {
        self.permission_granted = granted;
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl OrientationSource for ReplayOrientationSource {
    fn is_available(&self) -> bool {
        !self.readings.is_empty()
    }

    fn subscribe(&mut self, callback: ReadingCallback) -> Result<Subscription, CaptureError> {
        if !self.permission_granted {
            return Err(CaptureError::PermissionDenied(Capability::Motion));
        }
        if self.readings.is_empty() {
            return Err(CaptureError::SensorUnavailable);
        }

        let active = Arc::new(AtomicBool::new(true));
        let thread_active = Arc::clone(&active);
        let readings = Arc::clone(&self.readings);
        let latest = Arc::clone(&self.latest);
        let interval = self.interval;
        let looping = self.looping;

        thread::Builder::new()
            .name("orientation-replay".into())
            .spawn(move || {
                'replay: loop {
                    for reading in readings.iter().copied() {
                        thread::sleep(interval);
                        if !thread_active.load(Ordering::SeqCst) {
                            break 'replay;
                        }
                        *latest.lock() = Some(reading);
                        callback(reading);
                    }
                    if !looping {
                        break;
                    }
                }
                log::debug!("orientation replay finished");
            })
            .map_err(|e| CaptureError::Unknown(format!("failed to spawn replay thread: {}", e)))?;

        // The replay thread is detached; it exits at its next tick.
        Ok(Subscription::new(move || {
            active.store(false, Ordering::SeqCst);
        }))
    }

    fn latest_reading(&self) -> Option<TiltReading> {
        *self.latest.lock()
    }
}
