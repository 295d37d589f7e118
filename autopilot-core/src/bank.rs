//! Bank controller: commanded bank angle to aileron deflection.

use core::f32::consts::PI;

use crate::gains::Gains;
use crate::types::{saturate, Orientation};

/// Largest aileron deflection the bank loop may command, normalised units.
pub const AILERON_LIMIT: f32 = 0.1;

/// Proportional bank law with roll-rate damping.
///
/// The target is the commanded bank shifted by 90° (the angle the body Y
/// axis makes with earth Z when level), compared with `acos(dcm[2][1])`.
/// The damping term uses the absolute roll rate, not its error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankController {
    kp: f32,
    kd: f32,
}

impl BankController {
    /// Take the bank and damping gains from `gains`.
    #[must_use]
    pub const fn new(gains: &Gains) -> Self {
        Self {
            kp: gains.bank_kp,
            kd: gains.bank_kd,
        }
    }

    /// Commanded aileron deflection in [-[`AILERON_LIMIT`], [`AILERON_LIMIT`]].
    #[must_use]
    pub fn update(&self, commanded_bank_deg: f32, orientation: &Orientation) -> f32 {
        let target = ((commanded_bank_deg + 90.0) * PI) / 180.0;
        let error = target - orientation.body_y_earth_z_rad();
        let aileron = (error * self.kp) + (orientation.roll_rate() * self.kd);
        saturate(aileron, -AILERON_LIMIT, AILERON_LIMIT)
    }
}
