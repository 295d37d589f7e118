//! Aileron servo output on an RP2040 PWM slice.
//!
//! The slice counts at 1 MHz so one compare unit is one microsecond of
//! pulse width; a top of 19 999 gives the 50 Hz servo frame.

use autopilot_core::saturate;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::types::U12F4;

/// Servo frame rate.
pub const SERVO_PWM_HZ: u32 = 50;

/// PWM counter rate after the divider.
const PWM_TICK_HZ: u32 = 1_000_000;

/// Servo frame length in counter ticks (µs).
pub const SERVO_PERIOD_US: u16 = (PWM_TICK_HZ / SERVO_PWM_HZ) as u16;

/// Centred servo pulse.
pub const SERVO_CENTER_US: u16 = 1500;

/// Pulse offset at full deflection (±1.0).
pub const SERVO_HALF_RANGE_US: f32 = 500.0;

/// Pulse limits accepted by the servo.
pub const SERVO_MIN_US: u16 = 1000;
pub const SERVO_MAX_US: u16 = 2000;

/// Deflection (±1.0 full throw) to pulse width, clamped to the servo range.
///
/// NaN gives the centred pulse.
#[must_use]
pub fn servo_pulse_us(aileron: f32) -> u16 {
    let deflection = saturate(aileron, -1.0, 1.0);
    let pulse = f32::from(SERVO_CENTER_US) + deflection * SERVO_HALF_RANGE_US;
    (pulse as u16).clamp(SERVO_MIN_US, SERVO_MAX_US)
}

/// PWM configuration for a servo on channel A, starting at `pulse_us`.
#[must_use]
pub fn servo_config(sys_clk_hz: u32, pulse_us: u16) -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = U12F4::from_num(sys_clk_hz / PWM_TICK_HZ);
    config.top = SERVO_PERIOD_US - 1;
    config.compare_a = pulse_us;
    config
}

/// Aileron servo on PWM channel A.
pub struct AileronServo<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    pulse_us: u16,
}

impl<'d> AileronServo<'d> {
    /// Wrap a PWM slice created with [`servo_config`].
    #[must_use]
    pub fn new(pwm: Pwm<'d>, config: PwmConfig) -> Self {
        let pulse_us = config.compare_a;
        Self { pwm, config, pulse_us }
    }

    /// Drive the servo to `aileron`; returns the pulse width applied.
    pub fn set_command(&mut self, aileron: f32) -> u16 {
        let pulse_us = servo_pulse_us(aileron);
        if pulse_us != self.pulse_us {
            self.config.compare_a = pulse_us;
            self.pwm.set_config(&self.config);
            self.pulse_us = pulse_us;
        }
        pulse_us
    }

    /// Pulse width currently applied.
    pub fn pulse_us(&self) -> u16 {
        self.pulse_us
    }
}
