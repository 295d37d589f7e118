//! Orientation estimate supplied by the inertial reference subsystem.

use core::f32::consts::PI;
use libm::acosf;

/// 3×3 direction cosine matrix, row-major (`dcm[row][col]`).
pub type Matrix3 = [[f32; 3]; 3];

/// Identity rotation: wings level, nose north.
pub const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// One orientation snapshot.
///
/// The matrix is expected to be orthonormal. It is only ever read here,
/// never renormalised.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    /// Body-to-earth rotation matrix.
    pub dcm: Matrix3,
    /// Body angular rates (rad/s), roll rate first.
    pub omega: [f32; 3],
}

impl Default for Orientation {
    fn default() -> Self {
        Self::level()
    }
}

impl Orientation {
    /// Create a snapshot from a matrix and rate vector.
    #[must_use]
    pub const fn new(dcm: Matrix3, omega: [f32; 3]) -> Self {
        Self { dcm, omega }
    }

    /// Wings level, nose north, no rotation.
    #[must_use]
    pub const fn level() -> Self {
        Self {
            dcm: IDENTITY,
            omega: [0.0; 3],
        }
    }

    /// Current heading in degrees, 0 to 360.
    ///
    /// `acos(dcm[0][0])`, mirrored to `360 - angle` when `dcm[0][1]` is
    /// positive.
    #[must_use]
    pub fn heading_deg(&self) -> f32 {
        let mut khi = (acosf(self.dcm[0][0]) * 180.0) / PI;
        if self.dcm[0][1] > 0.0 {
            khi = 360.0 - khi;
        }
        khi
    }

    /// Angle between the body Y axis and the earth Z axis, radians.
    #[inline]
    #[must_use]
    pub fn body_y_earth_z_rad(&self) -> f32 {
        acosf(self.dcm[2][1])
    }

    /// Roll rate, rad/s.
    #[inline]
    #[must_use]
    pub const fn roll_rate(&self) -> f32 {
        self.omega[0]
    }
}

/// Clamp `value` into `[min, max]`.
///
/// NaN maps to 0.0, the neutral command, so an output never leaves its
/// range.
#[inline]
#[must_use]
pub fn saturate(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
