use std::time::Duration;

/// Longest accepted countdown before delayed arming.
pub const MAX_ARM_DELAY: Duration = Duration::from_secs(60 * 60);

/// Configuration for an auto-capture session.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerConfiguration {
    /// Maximum absolute calibrated tilt on each axis that counts as level,
    /// in radians (default: 0.1).
    pub tolerance_rad: f64,

    /// Countdown before delayed arming starts evaluating readings (default: 3 s).
    pub arm_delay: Duration,

    /// Pulse the haptic sink after each successful capture (default: true).
    pub haptic_feedback: bool,
}

impl TriggerConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !self.tolerance_rad.is_finite() || self.tolerance_rad <= 0.0 {
            return Err(format!("tolerance must be a positive angle: {}", self.tolerance_rad));
        }
        if self.arm_delay.is_zero() {
            return Err("arm delay must be positive".into());
        }
        if self.arm_delay > MAX_ARM_DELAY {
            return Err(format!("arm delay must not exceed {:?}: {:?}", MAX_ARM_DELAY, self.arm_delay));
        }
        Ok(())
    }
}

impl Default for TriggerConfiguration {
    fn default() -> Self {
        Self {
            tolerance_rad: 0.1,
            arm_delay: Duration::from_secs(3),
            haptic_feedback: true,
        }
    }
}
