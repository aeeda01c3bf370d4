use crate::models::tilt::CalibratedTilt;

/// Decides whether a calibrated tilt counts as level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelDetector {
    tolerance: f64,
}

impl LevelDetector {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Both axes must be strictly inside the tolerance.
    pub fn is_level(&self, tilt: &CalibratedTilt) -> bool {
        tilt.beta.abs() < self.tolerance && tilt.gamma.abs() < self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilt(beta: f64, gamma: f64) -> CalibratedTilt {
        CalibratedTilt { beta, gamma }
    }

    #[test]
    fn inside_tolerance_is_level() {
        let detector = LevelDetector::new(0.1);
        assert!(detector.is_level(&tilt(0.05, 0.05)));
        assert!(detector.is_level(&tilt(-0.09, 0.0)));
    }

    #[test]
    fn one_axis_outside_is_not_level() {
        let detector = LevelDetector::new(0.1);
        assert!(!detector.is_level(&tilt(0.2, 0.0)));
        assert!(!detector.is_level(&tilt(0.0, -0.15)));
    }

    #[test]
    fn boundary_is_exclusive() {
        let detector = LevelDetector::new(0.1);
        assert!(!detector.is_level(&tilt(0.1, 0.0)));
        assert!(!detector.is_level(&tilt(0.0, -0.1)));
    }

    #[test]
    fn nan_is_never_level() {
        let detector = LevelDetector::new(0.1);
        assert!(!detector.is_level(&tilt(f64::NAN, 0.0)));
    }
}
