use crate::models::tilt::{CalibratedTilt, CalibrationOffset, TiltReading};

/// Holds the session's zero point and applies it to raw readings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationStore {
    offset: CalibrationOffset,
}

impl CalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }

    /// Treat `raw` as level from now on.
    pub fn calibrate(&mut self, raw: TiltReading) -> CalibrationOffset {
        self.offset = CalibrationOffset::from(raw);
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = CalibrationOffset::ZERO;
    }

    pub fn apply(&self, raw: TiltReading) -> CalibratedTilt {
        raw.calibrated(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn starts_at_zero() {
        let store = CalibrationStore::new();
        assert!(store.offset().is_zero());

        let tilt = store.apply(TiltReading::new(0.2, -0.3));
        assert_eq!(tilt, CalibratedTilt { beta: 0.2, gamma: -0.3 });
    }

    #[test]
    fn calibrated_reading_becomes_level() {
        let mut store = CalibrationStore::new();
        let held = TiltReading::new(0.42, -0.17);

        store.calibrate(held);

        let tilt = store.apply(held);
        assert_abs_diff_eq!(tilt.beta, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tilt.gamma, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn recalibration_replaces_previous_offset() {
        let mut store = CalibrationStore::new();
        store.calibrate(TiltReading::new(0.5, 0.5));
        store.calibrate(TiltReading::new(0.1, -0.1));

        let tilt = store.apply(TiltReading::new(0.3, 0.0));
        assert_abs_diff_eq!(tilt.beta, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(tilt.gamma, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn reset_restores_raw_readings() {
        let mut store = CalibrationStore::new();
        store.calibrate(TiltReading::new(0.3, 0.3));
        store.reset();

        assert_eq!(store.offset(), CalibrationOffset::ZERO);
        assert_eq!(store.apply(TiltReading::new(0.3, 0.3)), CalibratedTilt { beta: 0.3, gamma: 0.3 });
    }
}
