use std::time::{Duration, Instant};

/// Identifies one scheduled delayed-arm countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Arming state machine.
///
/// State transitions:
/// ```text
/// idle ──toggle──────→ armed-immediate ──capture──→ disarmed → idle
///  │                        ↑    │
///  └──delayed arm─→ armed-delayed │ toggle / cancel
///                  │   (timer)   ↓
///                  └─cancel────→ idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingState {
    Idle,
    ArmedImmediate,
    ArmedDelayed { timer: TimerToken, deadline: Instant },
    Disarmed,
}

impl ArmingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle | Self::Disarmed)
    }

    /// Whether the orientation stream must be subscribed in this state.
    pub fn is_listening(&self) -> bool {
        matches!(self, Self::ArmedImmediate | Self::ArmedDelayed { .. })
    }

    /// Whether incoming readings may trigger a capture.
    pub fn is_evaluating(&self) -> bool {
        matches!(self, Self::ArmedImmediate)
    }

    /// Time left on the delayed-arm countdown, if one is running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self {
            Self::ArmedDelayed { deadline, .. } => Some(deadline.saturating_duration_since(now)),
            _ => None,
        }
    }

    /// `Disarmed` is transient; everything else is already settled.
    pub fn settle(self) -> Self {
        match self {
            Self::Disarmed => Self::Idle,
            other => other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ArmedImmediate => "armed",
            Self::ArmedDelayed { .. } => "armed-delayed",
            Self::Disarmed => "disarmed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_armed_states_listen() {
        let delayed = ArmingState::ArmedDelayed {
            timer: TimerToken(1),
            deadline: Instant::now(),
        };
        assert!(!ArmingState::Idle.is_listening());
        assert!(!ArmingState::Disarmed.is_listening());
        assert!(ArmingState::ArmedImmediate.is_listening());
        assert!(delayed.is_listening());
        assert!(!delayed.is_evaluating());
    }

    #[test]
    fn disarmed_settles_to_idle() {
        assert_eq!(ArmingState::Disarmed.settle(), ArmingState::Idle);
        assert_eq!(ArmingState::ArmedImmediate.settle(), ArmingState::ArmedImmediate);
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let now = Instant::now();
        let state = ArmingState::ArmedDelayed {
            timer: TimerToken(7),
            deadline: now + Duration::from_secs(3),
        };
        assert_eq!(state.remaining(now), Some(Duration::from_secs(3)));
        assert_eq!(state.remaining(now + Duration::from_secs(5)), Some(Duration::ZERO));
        assert_eq!(ArmingState::ArmedImmediate.remaining(now), None);
    }
}
