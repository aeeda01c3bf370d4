//! Pure arming transitions.
//!
//! The session feeds events in and carries out the returned effects; nothing
//! here touches the sensor, the camera or the clock.

use std::time::{Duration, Instant};

use crate::models::state::{ArmingState, TimerToken};

/// Inputs to the arming state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingEvent {
    /// Main activation button.
    Toggle,
    /// Delayed activation button. `token` identifies the countdown to start.
    DelayedArm {
        token: TimerToken,
        deadline: Instant,
        delay: Duration,
    },
    TimerExpired(TimerToken),
    CaptureSucceeded,
    Cancel,
}

/// Side effects the caller must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingEffect {
    StartListening,
    StopListening,
    StartTimer { token: TimerToken, delay: Duration },
    CancelTimer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ArmingState,
    pub effects: Vec<ArmingEffect>,
}

impl Transition {
    fn stay(state: ArmingState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    fn to(next: ArmingState, effects: Vec<ArmingEffect>) -> Self {
        Self { next, effects }
    }

    pub fn changed(&self, from: &ArmingState) -> bool {
        &self.next != from
    }
}

pub fn transition(state: &ArmingState, event: ArmingEvent) -> Transition {
    use ArmingEffect::*;

    match (*state, event) {
        (ArmingState::Idle | ArmingState::Disarmed, ArmingEvent::Toggle) => {
            Transition::to(ArmingState::ArmedImmediate, vec![StartListening])
        }
        (ArmingState::Idle | ArmingState::Disarmed, ArmingEvent::DelayedArm { token, deadline, delay }) => {
            Transition::to(
                ArmingState::ArmedDelayed { timer: token, deadline },
                vec![StartListening, StartTimer { token, delay }],
            )
        }

        // A second press of either button disarms.
        (
            ArmingState::ArmedImmediate,
            ArmingEvent::Toggle | ArmingEvent::DelayedArm { .. } | ArmingEvent::Cancel,
        ) => Transition::to(ArmingState::Idle, vec![StopListening]),
        (
            ArmingState::ArmedDelayed { .. },
            ArmingEvent::Toggle | ArmingEvent::DelayedArm { .. } | ArmingEvent::Cancel,
        ) => Transition::to(ArmingState::Idle, vec![CancelTimer, StopListening]),

        (ArmingState::ArmedDelayed { timer, .. }, ArmingEvent::TimerExpired(token)) if timer == token => {
            Transition::to(ArmingState::ArmedImmediate, Vec::new())
        }

        (ArmingState::ArmedImmediate, ArmingEvent::CaptureSucceeded) => {
            Transition::to(ArmingState::Disarmed, vec![StopListening])
        }

        (ArmingState::Disarmed, ArmingEvent::Cancel) => Transition::to(ArmingState::Idle, Vec::new()),

        // Stale timers, captures that finished after a disarm, cancel while idle.
        (current, _) => Transition::stay(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_secs(3);

    fn delayed_arm(token: u64, now: Instant) -> ArmingEvent {
        ArmingEvent::DelayedArm {
            token: TimerToken(token),
            deadline: now + DELAY,
            delay: DELAY,
        }
    }

    fn delayed(token: u64, now: Instant) -> ArmingState {
        ArmingState::ArmedDelayed {
            timer: TimerToken(token),
            deadline: now + DELAY,
        }
    }

    #[test]
    fn toggle_arms_and_disarms() {
        let armed = transition(&ArmingState::Idle, ArmingEvent::Toggle);
        assert_eq!(armed.next, ArmingState::ArmedImmediate);
        assert_eq!(armed.effects, vec![ArmingEffect::StartListening]);

        let idle = transition(&armed.next, ArmingEvent::Toggle);
        assert_eq!(idle.next, ArmingState::Idle);
        assert_eq!(idle.effects, vec![ArmingEffect::StopListening]);
    }

    #[test]
    fn delayed_arm_starts_timer_and_listening() {
        let now = Instant::now();
        let t = transition(&ArmingState::Idle, delayed_arm(1, now));

        assert_eq!(t.next, delayed(1, now));
        assert_eq!(
            t.effects,
            vec![
                ArmingEffect::StartListening,
                ArmingEffect::StartTimer {
                    token: TimerToken(1),
                    delay: DELAY
                }
            ]
        );
    }

    #[test]
    fn timer_expiry_promotes_to_immediate() {
        let now = Instant::now();
        let t = transition(&delayed(4, now), ArmingEvent::TimerExpired(TimerToken(4)));
        assert_eq!(t.next, ArmingState::ArmedImmediate);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn cancelled_countdown_never_promotes() {
        let now = Instant::now();
        let armed = transition(&ArmingState::Idle, delayed_arm(1, now));

        // Second press one second into the countdown.
        let cancelled = transition(&armed.next, delayed_arm(2, now + Duration::from_secs(1)));
        assert_eq!(cancelled.next, ArmingState::Idle);
        assert_eq!(
            cancelled.effects,
            vec![ArmingEffect::CancelTimer, ArmingEffect::StopListening]
        );

        // The first countdown firing at the three second mark does nothing.
        let expired = transition(&cancelled.next, ArmingEvent::TimerExpired(TimerToken(1)));
        assert_eq!(expired.next, ArmingState::Idle);
        assert!(expired.effects.is_empty());
    }

    #[test]
    fn stale_token_is_ignored_in_a_new_countdown() {
        let now = Instant::now();
        let t = transition(&delayed(2, now), ArmingEvent::TimerExpired(TimerToken(1)));
        assert_eq!(t.next, delayed(2, now));
        assert!(!t.changed(&delayed(2, now)));
    }

    #[test]
    fn toggle_cancels_delayed_arming() {
        let now = Instant::now();
        let t = transition(&delayed(1, now), ArmingEvent::Toggle);
        assert_eq!(t.next, ArmingState::Idle);
        assert_eq!(t.effects, vec![ArmingEffect::CancelTimer, ArmingEffect::StopListening]);
    }

    #[test]
    fn capture_disarms_only_immediate() {
        let now = Instant::now();
        let t = transition(&ArmingState::ArmedImmediate, ArmingEvent::CaptureSucceeded);
        assert_eq!(t.next, ArmingState::Disarmed);
        assert_eq!(t.effects, vec![ArmingEffect::StopListening]);
        assert_eq!(t.next.settle(), ArmingState::Idle);

        assert_eq!(
            transition(&ArmingState::Idle, ArmingEvent::CaptureSucceeded).next,
            ArmingState::Idle
        );
        assert_eq!(
            transition(&delayed(1, now), ArmingEvent::CaptureSucceeded).next,
            delayed(1, now)
        );
    }

    #[test]
    fn delayed_button_while_immediate_disarms() {
        let t = transition(&ArmingState::ArmedImmediate, delayed_arm(3, Instant::now()));
        assert_eq!(t.next, ArmingState::Idle);
        assert_eq!(t.effects, vec![ArmingEffect::StopListening]);
    }

    #[test]
    fn cancel_while_idle_is_a_no_op() {
        let t = transition(&ArmingState::Idle, ArmingEvent::Cancel);
        assert_eq!(t.next, ArmingState::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn disarmed_behaves_like_idle() {
        let t = transition(&ArmingState::Disarmed, ArmingEvent::Toggle);
        assert_eq!(t.next, ArmingState::ArmedImmediate);
    }
}
