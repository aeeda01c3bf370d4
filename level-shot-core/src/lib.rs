//! # level-shot-core
//!
//! Platform-agnostic core for level-triggered auto capture.
//!
//! Watches the device tilt, subtracts the user's calibration offset and
//! fires the camera once per arming period when both axes are within
//! tolerance. Platform backends implement the collaborator traits and plug
//! into the generic `AutoCaptureSession`.
//!
//! ## Architecture
//!
//! ```text
//! level-shot-core (this crate)
//! ├── traits/       ← OrientationSource, CaptureSink, PersistenceSink, HapticSink, TriggerDelegate
//! ├── models/       ← CaptureError, ArmingState, TriggerConfiguration, TiltReading, CapturedPhoto, etc.
//! ├── calibration/  ← CalibrationStore
//! ├── detection/    ← LevelDetector, CaptureLock
//! ├── arming/       ← pure arming transitions, DelayTimer
//! ├── session/      ← AutoCaptureSession (generic orchestrator)
//! └── storage/      ← photo metadata sidecar
//! ```

pub mod arming;
pub mod calibration;
pub mod detection;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use arming::delay_timer::DelayTimer;
pub use arming::machine::{transition, ArmingEffect, ArmingEvent, Transition};
pub use calibration::offset_store::CalibrationStore;
pub use detection::capture_lock::{CaptureGuard, CaptureLock};
pub use detection::level_detector::LevelDetector;
pub use models::config::{TriggerConfiguration, MAX_ARM_DELAY};
pub use models::error::{Capability, CaptureError};
pub use models::photo::{CapturedPhoto, ImageHandle, PhotoMetadata};
pub use models::state::{ArmingState, TimerToken};
pub use models::tilt::{CalibratedTilt, CalibrationOffset, TiltReading};
pub use session::auto_capture::AutoCaptureSession;
pub use traits::capture_sink::CaptureSink;
pub use traits::haptic_sink::HapticSink;
pub use traits::orientation_source::{OrientationSource, ReadingCallback, Subscription};
pub use traits::persistence_sink::PersistenceSink;
pub use traits::trigger_delegate::TriggerDelegate;
