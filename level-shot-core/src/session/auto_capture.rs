use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::arming::delay_timer::DelayTimer;
use crate::arming::machine::{transition, ArmingEffect, ArmingEvent, Transition};
use crate::calibration::offset_store::CalibrationStore;
use crate::detection::capture_lock::CaptureLock;
use crate::detection::level_detector::LevelDetector;
use crate::models::config::TriggerConfiguration;
use crate::models::error::{Capability, CaptureError};
use crate::models::photo::{CapturedPhoto, ImageHandle};
use crate::models::state::{ArmingState, TimerToken};
use crate::models::tilt::{CalibratedTilt, CalibrationOffset, TiltReading};
use crate::traits::capture_sink::CaptureSink;
use crate::traits::haptic_sink::HapticSink;
use crate::traits::orientation_source::{OrientationSource, ReadingCallback, Subscription};
use crate::traits::persistence_sink::PersistenceSink;
use crate::traits::trigger_delegate::TriggerDelegate;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionState {
    arming: ArmingState,
    /// Incremented each time an arming period starts listening. Readings
    /// carry the epoch of the subscription that delivered them.
    epoch: u64,
    next_timer: u64,
    subscription: Option<Subscription>,
    timer: Option<DelayTimer>,
    calibration: CalibrationStore,
    last_raw: Option<TiltReading>,
    last_tilt: Option<CalibratedTilt>,
    pending: Option<CapturedPhoto>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            arming: ArmingState::Idle,
            epoch: 0,
            next_timer: 0,
            subscription: None,
            timer: None,
            calibration: CalibrationStore::new(),
            last_raw: None,
            last_tilt: None,
            pending: None,
        }
    }
}

/// Work left over after a transition, performed once the state lock is released.
#[derive(Default)]
struct Outcome {
    subscription: Option<Subscription>,
    timer: Option<DelayTimer>,
    subscribe_epoch: Option<u64>,
    states: Vec<ArmingState>,
}

enum Command {
    Toggle,
    DelayedArm,
    Cancel,
}

struct Inner<O, C, P> {
    source: Mutex<O>,
    camera: Mutex<C>,
    persistence: Mutex<P>,
    haptics: RwLock<Option<Arc<dyn HapticSink>>>,
    delegate: RwLock<Option<Arc<dyn TriggerDelegate>>>,
    state: Mutex<SessionState>,
    capture_lock: CaptureLock,
    detector: LevelDetector,
    config: TriggerConfiguration,
}

/// Level-triggered auto-capture session.
///
/// Generic over the orientation sensor, camera and photo library via the
/// collaborator traits. Owns the calibration offset, the arming state and the
/// capture lock.
///
/// ```text
/// [OrientationSource] → [CalibrationStore] → [LevelDetector] → [CaptureSink]
///                                                                    ↓
///             [PersistenceSink] ← save / discard ← pending photo ← disarm
/// ```
pub struct AutoCaptureSession<O, C, P>
where
    O: OrientationSource + 'static,
    C: CaptureSink + 'static,
    P: PersistenceSink + 'static,
{
    inner: Arc<Inner<O, C, P>>,
}

impl<O, C, P> AutoCaptureSession<O, C, P>
where
    O: OrientationSource + 'static,
    C: CaptureSink + 'static,
    P: PersistenceSink + 'static,
{
    pub fn new(source: O, camera: C, persistence: P, config: TriggerConfiguration) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;

        Ok(Self {
            inner: Arc::new(Inner {
                source: Mutex::new(source),
                camera: Mutex::new(camera),
                persistence: Mutex::new(persistence),
                haptics: RwLock::new(None),
                delegate: RwLock::new(None),
                state: Mutex::new(SessionState::new()),
                capture_lock: CaptureLock::new(),
                detector: LevelDetector::new(config.tolerance_rad),
                config,
            }),
        })
    }

    pub fn set_delegate(&self, delegate: Arc<dyn TriggerDelegate>) {
        *self.inner.delegate.write() = Some(delegate);
    }

    pub fn set_haptics(&self, haptics: Arc<dyn HapticSink>) {
        *self.inner.haptics.write() = Some(haptics);
    }

    pub fn config(&self) -> &TriggerConfiguration {
        &self.inner.config
    }

    pub fn state(&self) -> ArmingState {
        self.inner.state.lock().arming
    }

    /// Whether the orientation stream is currently subscribed.
    pub fn is_listening(&self) -> bool {
        self.inner.state.lock().subscription.is_some()
    }

    /// Whether a capture is in flight.
    pub fn is_capturing(&self) -> bool {
        self.inner.capture_lock.is_held()
    }

    /// Time left before a delayed arming starts evaluating readings, or
    /// `None` when no countdown is running.
    pub fn countdown_remaining(&self) -> Option<Duration> {
        self.inner.state.lock().arming.remaining(Instant::now())
    }

    pub fn calibration_offset(&self) -> CalibrationOffset {
        self.inner.state.lock().calibration.offset()
    }

    /// Calibrated tilt of the most recent reading delivered while armed.
    pub fn latest_tilt(&self) -> Option<CalibratedTilt> {
        self.inner.state.lock().last_tilt
    }

    pub fn pending_photo(&self) -> Option<CapturedPhoto> {
        self.inner.state.lock().pending.clone()
    }

    /// Main activation button: arm immediately, or disarm if already armed.
    pub fn toggle(&self) -> Result<ArmingState, CaptureError> {
        self.inner.dispatch(Command::Toggle)
    }

    /// Delayed activation button: start the countdown, or cancel it (or an
    /// immediate arming) on a second press.
    pub fn arm_delayed(&self) -> Result<ArmingState, CaptureError> {
        self.inner.dispatch(Command::DelayedArm)
    }

    /// Disarm unconditionally.
    pub fn disarm(&self) -> Result<ArmingState, CaptureError> {
        self.inner.dispatch(Command::Cancel)
    }

    /// Treat the device's current orientation as level.
    pub fn calibrate(&self) -> Result<CalibrationOffset, CaptureError> {
        let from_sensor = self.inner.source.lock().latest_reading();
        let raw = from_sensor
            .or_else(|| self.inner.state.lock().last_raw)
            .ok_or(CaptureError::SensorUnavailable)?;
        Ok(self.calibrate_to(raw))
    }

    /// Treat `raw` as level from now on.
    pub fn calibrate_to(&self, raw: TiltReading) -> CalibrationOffset {
        let (offset, tilt) = {
            let mut s = self.inner.state.lock();
            let offset = s.calibration.calibrate(raw);
            let tilt = s.last_raw.map(|r| s.calibration.apply(r));
            s.last_tilt = tilt;
            (offset, tilt)
        };
        log::info!("calibrated zero point to beta {:.3}, gamma {:.3}", offset.beta, offset.gamma);
        if let Some(tilt) = tilt {
            self.inner.notify_tilt(&tilt);
        }
        offset
    }

    pub fn reset_calibration(&self) {
        self.inner.state.lock().calibration.reset();
        log::info!("calibration reset");
    }

    /// Keep the pending photo. The photo is released even if the library
    /// reports a failure.
    pub fn save_photo(&self) -> Result<(), CaptureError> {
        let photo = self.take_pending()?;
        let id = photo.id.clone();
        let result = self.inner.persistence.lock().save(photo);
        match result {
            Ok(()) => {
                log::info!("photo {} saved", id);
                Ok(())
            }
            Err(e) => {
                log::error!("failed to save photo {}: {}", id, e);
                self.inner.notify_error(&e);
                Err(e)
            }
        }
    }

    /// Drop the pending photo.
    pub fn discard_photo(&self) -> Result<(), CaptureError> {
        let photo = self.take_pending()?;
        let id = photo.id.clone();
        let result = self.inner.persistence.lock().discard(photo);
        match result {
            Ok(()) => {
                log::info!("photo {} discarded", id);
                Ok(())
            }
            Err(e) => {
                log::error!("failed to discard photo {}: {}", id, e);
                self.inner.notify_error(&e);
                Err(e)
            }
        }
    }

    fn take_pending(&self) -> Result<CapturedPhoto, CaptureError> {
        self.inner.state.lock().pending.take().ok_or(CaptureError::NoPendingPhoto)
    }
}

impl<O, C, P> Drop for AutoCaptureSession<O, C, P>
where
    O: OrientationSource + 'static,
    C: CaptureSink + 'static,
    P: PersistenceSink + 'static,
{
    fn drop(&mut self) {
        let released = {
            let mut s = self.inner.state.lock();
            s.arming = ArmingState::Idle;
            (s.subscription.take(), s.timer.take())
        };
        drop(released);
    }
}

impl<O, C, P> Inner<O, C, P>
where
    O: OrientationSource + 'static,
    C: CaptureSink + 'static,
    P: PersistenceSink + 'static,
{
    fn dispatch(self: &Arc<Self>, command: Command) -> Result<ArmingState, CaptureError> {
        // Collaborator checks happen before the state lock: a capture in
        // flight holds the camera mutex and needs the state lock to finish.
        let current = self.state.lock().arming;
        let arming = current.is_idle() && !matches!(command, Command::Cancel);
        if arming {
            if !self.camera.lock().is_authorized() {
                return Err(CaptureError::PermissionDenied(Capability::Camera));
            }
            if !self.source.lock().is_available() {
                return Err(CaptureError::SensorUnavailable);
            }
        }

        let mut out = Outcome::default();
        {
            let mut s = self.state.lock();
            let event = match command {
                Command::Toggle => ArmingEvent::Toggle,
                Command::Cancel => ArmingEvent::Cancel,
                Command::DelayedArm => {
                    let delay = self.config.arm_delay;
                    let deadline = Instant::now()
                        .checked_add(delay)
                        .ok_or_else(|| CaptureError::TimerFailed(format!("arm delay {:?} out of range", delay)))?;
                    s.next_timer += 1;
                    ArmingEvent::DelayedArm {
                        token: TimerToken(s.next_timer),
                        deadline,
                        delay,
                    }
                }
            };

            let t = transition(&s.arming, event);
            if t.effects.contains(&ArmingEffect::StartListening) && s.pending.is_some() {
                return Err(CaptureError::PhotoPending);
            }
            self.apply(&mut s, t, &mut out)?;
        }
        self.finish(out)?;

        Ok(self.state.lock().arming)
    }

    /// Carry out a transition's effects that are safe under the state lock
    /// and record the rest in `out`.
    fn apply(self: &Arc<Self>, s: &mut SessionState, t: Transition, out: &mut Outcome) -> Result<(), CaptureError> {
        let from = s.arming;

        for effect in &t.effects {
            match *effect {
                ArmingEffect::StartListening => {
                    s.epoch += 1;
                    out.subscribe_epoch = Some(s.epoch);
                }
                ArmingEffect::StopListening => {
                    out.subscription = s.subscription.take();
                    out.subscribe_epoch = None;
                }
                ArmingEffect::StartTimer { token, delay } => {
                    let weak: Weak<Self> = Arc::downgrade(self);
                    let scheduled = DelayTimer::schedule(token, delay, move |token| {
                        if let Some(inner) = weak.upgrade() {
                            inner.on_timer_expired(token);
                        }
                    });
                    match scheduled {
                        Ok(timer) => out.timer = s.timer.replace(timer),
                        Err(e) => {
                            out.subscribe_epoch = None;
                            return Err(e);
                        }
                    }
                }
                ArmingEffect::CancelTimer => {
                    out.timer = s.timer.take();
                }
            }
        }

        if t.changed(&from) {
            log::debug!("arming: {} -> {}", from.name(), t.next.name());
            out.states.push(t.next);
        }
        s.arming = t.next.settle();
        if s.arming != t.next {
            log::debug!("arming: {} -> {}", t.next.name(), s.arming.name());
            out.states.push(s.arming);
        }
        Ok(())
    }

    fn finish(self: &Arc<Self>, out: Outcome) -> Result<(), CaptureError> {
        let Outcome {
            subscription,
            timer,
            subscribe_epoch,
            states,
        } = out;
        drop(subscription);
        drop(timer);

        for state in &states {
            self.notify_state(state);
        }

        match subscribe_epoch {
            Some(epoch) => self.start_listening(epoch),
            None => Ok(()),
        }
    }

    fn start_listening(self: &Arc<Self>, epoch: u64) -> Result<(), CaptureError> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let callback: ReadingCallback = Arc::new(move |reading: TiltReading| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_reading(epoch, reading);
            }
        });

        let subscribed = self.source.lock().subscribe(callback);
        match subscribed {
            Ok(subscription) => {
                let stale = {
                    let mut s = self.state.lock();
                    if s.epoch == epoch && s.arming.is_listening() {
                        s.subscription = Some(subscription);
                        None
                    } else {
                        // Disarmed while subscribing.
                        Some(subscription)
                    }
                };
                drop(stale);
                log::debug!("orientation subscription {} started", epoch);
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to subscribe to orientation updates: {}", e);
                self.abort_arming(epoch);
                Err(e)
            }
        }
    }

    fn on_timer_expired(self: &Arc<Self>, token: TimerToken) {
        let mut out = Outcome::default();
        {
            let mut s = self.state.lock();
            let t = transition(&s.arming, ArmingEvent::TimerExpired(token));
            if !t.changed(&s.arming) {
                log::trace!("ignoring stale delay timer {}", token.0);
                return;
            }
            log::info!("arm delay elapsed, watching for level");
            out.timer = s.timer.take();
            if let Err(e) = self.apply(&mut s, t, &mut out) {
                log::error!("failed to arm after delay: {}", e);
            }
        }
        if let Err(e) = self.finish(out) {
            self.notify_error(&e);
        }
    }

    fn handle_reading(self: &Arc<Self>, epoch: u64, reading: TiltReading) {
        let (tilt, guard) = {
            let mut s = self.state.lock();
            if s.epoch != epoch || !s.arming.is_listening() {
                log::trace!("ignoring reading from stale subscription {}", epoch);
                return;
            }
            s.last_raw = Some(reading);
            let tilt = s.calibration.apply(reading);
            s.last_tilt = Some(tilt);

            let triggered = s.arming.is_evaluating() && s.pending.is_none() && self.detector.is_level(&tilt);
            let guard = if triggered {
                let guard = self.capture_lock.try_acquire();
                if guard.is_none() {
                    log::trace!("capture in flight, ignoring level reading");
                }
                guard
            } else {
                None
            };
            (tilt, guard)
        };

        self.notify_tilt(&tilt);

        let Some(_guard) = guard else {
            return;
        };

        log::info!("level reached (deviation {:.3} rad), taking picture", tilt.max_deviation());
        let result = self.camera.lock().take_picture();
        match result {
            Ok(handle) => self.complete_capture(epoch, reading, tilt, handle),
            Err(e) if e.is_recoverable() => {
                log::warn!("camera not ready, retrying on next level reading: {}", e);
                self.notify_error(&e);
            }
            Err(e) => {
                log::error!("capture failed, disarming: {}", e);
                self.abort_arming(epoch);
                self.notify_error(&e);
            }
        }
    }

    /// Disarm the arming period `epoch` if it is still the current one.
    fn abort_arming(self: &Arc<Self>, epoch: u64) {
        let mut out = Outcome::default();
        {
            let mut s = self.state.lock();
            if s.epoch != epoch || !s.arming.is_listening() {
                return;
            }
            let t = transition(&s.arming, ArmingEvent::Cancel);
            if let Err(e) = self.apply(&mut s, t, &mut out) {
                log::error!("failed to disarm: {}", e);
            }
        }
        if let Err(e) = self.finish(out) {
            self.notify_error(&e);
        }
    }

    fn complete_capture(self: &Arc<Self>, epoch: u64, raw: TiltReading, tilt: CalibratedTilt, handle: ImageHandle) {
        let photo = CapturedPhoto::new(handle, raw, tilt);
        log::info!("captured photo {} at {}", photo.id, photo.handle.uri());

        let mut out = Outcome::default();
        {
            let mut s = self.state.lock();
            if s.epoch == epoch {
                let t = transition(&s.arming, ArmingEvent::CaptureSucceeded);
                if let Err(e) = self.apply(&mut s, t, &mut out) {
                    log::error!("failed to disarm after capture: {}", e);
                }
            }
            s.pending = Some(photo.clone());
        }
        if let Err(e) = self.finish(out) {
            self.notify_error(&e);
        }

        if self.config.haptic_feedback {
            if let Some(haptics) = self.haptics.read().clone() {
                haptics.pulse();
            }
        }
        if let Some(delegate) = self.delegate() {
            delegate.on_photo_captured(&photo);
        }
    }

    // --- Notifications, always sent without the state lock ---

    fn delegate(&self) -> Option<Arc<dyn TriggerDelegate>> {
        self.delegate.read().clone()
    }

    fn notify_state(&self, state: &ArmingState) {
        if let Some(delegate) = self.delegate() {
            delegate.on_state_changed(state);
        }
    }

    fn notify_tilt(&self, tilt: &CalibratedTilt) {
        if let Some(delegate) = self.delegate() {
            delegate.on_tilt_updated(tilt);
        }
    }

    fn notify_error(&self, error: &CaptureError) {
        if let Some(delegate) = self.delegate() {
            delegate.on_error(error);
        }
    }
}
