//! Control law gains.
//!
//! Gains are chosen once at startup and then only read. Build a custom
//! `const` (or chain the `with_*` setters) to tune a different airframe.

/// Controller coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gains {
    /// Heading error proportional gain (degrees of bank per degree·m/s).
    pub heading_kp: f32,
    /// Heading error integral gain. Reserved, not used by the heading law.
    pub heading_ki: f32,
    /// Heading error derivative gain. Reserved, not used by the heading law.
    pub heading_kd: f32,
    /// Bank error proportional gain.
    pub bank_kp: f32,
    /// Roll rate damping gain.
    pub bank_kd: f32,
}

/// Gains tuned for the reference airframe.
pub const DEFAULT_GAINS: Gains = Gains {
    heading_kp: 0.03,
    heading_ki: 0.0,
    heading_kd: 0.0,
    bank_kp: 2.0,
    bank_kd: 0.1,
};

impl Default for Gains {
    fn default() -> Self {
        DEFAULT_GAINS
    }
}

impl Gains {
    /// Replace the heading proportional gain.
    ///
    /// ```
    /// use autopilot_core::DEFAULT_GAINS;
    ///
    /// const SOFT: autopilot_core::Gains = DEFAULT_GAINS.with_heading_kp(0.01);
    /// assert_eq!(SOFT.heading_kp, 0.01);
    /// assert_eq!(SOFT.bank_kp, DEFAULT_GAINS.bank_kp);
    /// ```
    #[must_use]
    pub const fn with_heading_kp(mut self, value: f32) -> Self {
        self.heading_kp = value;
        self
    }

    /// Replace the (unused) heading integral gain.
    #[must_use]
    pub const fn with_heading_ki(mut self, value: f32) -> Self {
        self.heading_ki = value;
        self
    }

    /// Replace the (unused) heading derivative gain.
    #[must_use]
    pub const fn with_heading_kd(mut self, value: f32) -> Self {
        self.heading_kd = value;
        self
    }

    /// Replace the bank proportional gain.
    #[must_use]
    pub const fn with_bank_kp(mut self, value: f32) -> Self {
        self.bank_kp = value;
        self
    }

    /// Replace the roll rate damping gain.
    #[must_use]
    pub const fn with_bank_kd(mut self, value: f32) -> Self {
        self.bank_kd = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gains() {
        let gains = Gains::default();
        assert_eq!(gains, DEFAULT_GAINS);
        assert_eq!(gains.heading_kp, 0.03);
        assert_eq!(gains.bank_kp, 2.0);
        assert_eq!(gains.bank_kd, 0.1);
    }

    #[test]
    fn test_builder_setters() {
        let gains = DEFAULT_GAINS
            .with_heading_kp(0.05)
            .with_heading_ki(0.01)
            .with_heading_kd(0.02)
            .with_bank_kp(1.5)
            .with_bank_kd(0.2);
        assert_eq!(gains.heading_kp, 0.05);
        assert_eq!(gains.heading_ki, 0.01);
        assert_eq!(gains.heading_kd, 0.02);
        assert_eq!(gains.bank_kp, 1.5);
        assert_eq!(gains.bank_kd, 0.2);
    }
}
