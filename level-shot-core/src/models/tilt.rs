use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Raw device tilt from the orientation sensor, in radians.
///
/// `beta` is front-back tilt, `gamma` is left-right tilt, both relative to
/// gravity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TiltReading {
    pub beta: f64,
    pub gamma: f64,
}

impl TiltReading {
    pub const fn new(beta: f64, gamma: f64) -> Self {
        Self { beta, gamma }
    }

    /// Tilt relative to `offset`.
    pub fn calibrated(self, offset: CalibrationOffset) -> CalibratedTilt {
        self - offset
    }
}

/// Reference orientation treated as level. Zero until the first calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationOffset {
    pub beta: f64,
    pub gamma: f64,
}

impl CalibrationOffset {
    pub const ZERO: Self = Self { beta: 0.0, gamma: 0.0 };

    pub fn is_zero(&self) -> bool {
        self.beta == 0.0 && self.gamma == 0.0
    }
}

impl From<TiltReading> for CalibrationOffset {
    fn from(reading: TiltReading) -> Self {
        Self {
            beta: reading.beta,
            gamma: reading.gamma,
        }
    }
}

/// Raw reading minus the current calibration offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibratedTilt {
    pub beta: f64,
    pub gamma: f64,
}

impl CalibratedTilt {
    /// Largest absolute deviation from level across both axes.
    pub fn max_deviation(&self) -> f64 {
        self.beta.abs().max(self.gamma.abs())
    }
}

impl Sub<CalibrationOffset> for TiltReading {
    type Output = CalibratedTilt;

    fn sub(self, offset: CalibrationOffset) -> CalibratedTilt {
        CalibratedTilt {
            beta: self.beta - offset.beta,
            gamma: self.gamma - offset.gamma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn calibrated_is_componentwise_difference() {
        let samples = [
            (TiltReading::new(0.3, -0.2), CalibrationOffset { beta: 0.1, gamma: 0.05 }),
            (TiltReading::new(-1.2, 0.7), CalibrationOffset { beta: -0.4, gamma: 0.9 }),
            (TiltReading::new(0.0, 0.0), CalibrationOffset::ZERO),
        ];

        for (raw, offset) in samples {
            let tilt = raw.calibrated(offset);
            assert_abs_diff_eq!(tilt.beta, raw.beta - offset.beta, epsilon = 1e-12);
            assert_abs_diff_eq!(tilt.gamma, raw.gamma - offset.gamma, epsilon = 1e-12);
        }
    }

    #[test]
    fn max_deviation_uses_absolute_values() {
        let tilt = CalibratedTilt { beta: 0.02, gamma: -0.3 };
        assert_abs_diff_eq!(tilt.max_deviation(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn reading_deserializes_from_sensor_json() {
        let reading: TiltReading = serde_json::from_str(r#"{"beta":0.05,"gamma":-0.01}"#).unwrap();
        assert_eq!(reading, TiltReading::new(0.05, -0.01));
    }
}
