//! Heading controller: bearing error to commanded bank angle.

use crate::gains::Gains;
use crate::types::saturate;

/// Largest bank angle the heading loop may command, degrees.
pub const BANK_LIMIT_DEG: f32 = 30.0;

/// Wrap `current - desired` into [-180, 180] degrees.
///
/// Both inputs are assumed to lie in [0, 360), so a single correction of
/// 360° is enough.
#[inline]
#[must_use]
pub fn wrap_heading_error(error_deg: f32) -> f32 {
    if error_deg < -180.0 {
        error_deg + 360.0
    } else if error_deg > 180.0 {
        error_deg - 360.0
    } else {
        error_deg
    }
}

/// Proportional heading law.
///
/// `bank = wrap(current - desired) * ground_speed * heading_kp`, clamped to
/// ±[`BANK_LIMIT_DEG`]. Only `heading_kp` is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingController {
    kp: f32,
}

impl HeadingController {
    /// Take the heading gain from `gains`.
    #[must_use]
    pub const fn new(gains: &Gains) -> Self {
        Self {
            kp: gains.heading_kp,
        }
    }

    /// Commanded bank angle in degrees.
    #[must_use]
    pub fn update(
        &self,
        current_heading_deg: f32,
        desired_bearing_deg: f32,
        ground_speed_mps: f32,
    ) -> f32 {
        let error = wrap_heading_error(current_heading_deg - desired_bearing_deg);
        let bank = (error * ground_speed_mps) * self.kp;
        saturate(bank, -BANK_LIMIT_DEG, BANK_LIMIT_DEG)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::gains::DEFAULT_GAINS;

    #[test]
    fn test_wrap_positive() {
        assert_eq!(wrap_heading_error(10.0 - 350.0), 20.0);
    }

    #[test]
    fn test_wrap_negative() {
        assert_eq!(wrap_heading_error(350.0 - 10.0), -20.0);
    }

    #[test]
    fn test_wrap_boundaries_unchanged() {
        assert_eq!(wrap_heading_error(180.0), 180.0);
        assert_eq!(wrap_heading_error(-180.0), -180.0);
        assert_eq!(wrap_heading_error(0.0), 0.0);
    }

    #[test]
    fn test_wrap_range_over_grid() {
        let mut current = 0.0f32;
        while current < 360.0 {
            let mut desired = 0.0f32;
            while desired < 360.0 {
                let wrapped = wrap_heading_error(current - desired);
                assert!((-180.0..=180.0).contains(&wrapped), "{current} {desired}");
                desired += 7.5;
            }
            current += 7.5;
        }
    }

    #[test]
    fn test_proportional_bank() {
        let ctrl = HeadingController::new(&DEFAULT_GAINS);
        // 20° error at 10 m/s with kp 0.03 -> 6° bank
        let bank = ctrl.update(30.0, 10.0, 10.0);
        assert!((bank - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrapped_error_sign() {
        let ctrl = HeadingController::new(&DEFAULT_GAINS);
        let bank = ctrl.update(10.0, 350.0, 10.0);
        assert!((bank - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_speed_gives_zero_bank() {
        let ctrl = HeadingController::new(&DEFAULT_GAINS);
        assert_eq!(ctrl.update(90.0, 270.0, 0.0), 0.0);
    }

    #[test]
    fn test_saturation() {
        let ctrl = HeadingController::new(&DEFAULT_GAINS.with_heading_kp(1.0e30));
        assert_eq!(ctrl.update(100.0, 0.0, 30.0), BANK_LIMIT_DEG);
        assert_eq!(ctrl.update(0.0, 100.0, 30.0), -BANK_LIMIT_DEG);
        assert_eq!(ctrl.update(0.0, 100.0, f32::MAX), -BANK_LIMIT_DEG);
    }

    #[test]
    fn test_reserved_gains_are_inert() {
        let plain = HeadingController::new(&DEFAULT_GAINS);
        let tuned =
            HeadingController::new(&DEFAULT_GAINS.with_heading_ki(5.0).with_heading_kd(5.0));
        assert_eq!(plain.update(45.0, 10.0, 3.0), tuned.update(45.0, 10.0, 3.0));
    }
}
