//! Aileron autopilot firmware for RP2040.
//!
//! This crate wires the platform-agnostic [`autopilot_core`] control cycle
//! to the RP2040 peripherals.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives NMEA RMC sentences from a GPS (4800 baud, 8N1)
//! 2. Receives RC channels from a CRSF receiver (420000 baud, 8N1)
//! 3. Runs heading, bank and mixer at 50 Hz
//! 4. Drives the aileron servo with 50 Hz PWM
//! 5. Reports each committed fix back over CRSF telemetry
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART0 TX | 0    | GPS transmit (unused) |
//! | UART0 RX | 1    | GPS receive |
//! | PWM1 A   | 2    | Aileron servo |
//! | UART1 TX | 8    | CRSF telemetry |
//! | UART1 RX | 9    | CRSF RC frames |
//! | LED      | 25   | On-board LED (link error indicator) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with these tasks:
//!
//! - **GPS Task**: Moves UART bytes into a queue
//! - **CRSF Task**: Parses RC frames, publishes the channel snapshot
//! - **Control Task**: Every tick drains the GPS queue, samples all inputs
//!   once and runs the cascade
//! - **Servo Task**: Applies the latest command to the PWM slice
//! - **Telemetry Task**: Sends each new fix to the transmitter
//!
//! Orientation and desired bearing are read from [`ORIENTATION`] and
//! [`BEARING`]; the attitude estimator and navigator publish into them.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`gps-echo`**: Log every raw GPS sentence

#![no_std]

// Re-export core types for convenience
pub use autopilot_core::{
    Autopilot, ChannelMap, ControlMode, ControlOutput, Gains, Orientation, SharedBearing,
    SharedOrientation, DEFAULT_CHANNEL_MAP, DEFAULT_GAINS,
};

pub mod echo;
pub mod input;
pub mod servo;

pub use echo::DefmtEcho;
pub use input::{CrsfInput, CrsfTelemetry, GpsBytes, GpsQueue, GpsReceiver, SharedChannels};
pub use servo::{servo_config, servo_pulse_us, AileronServo};

/// Control loop rate.
pub const CONTROL_TICK_HZ: u64 = 50;

/// Latest attitude estimate.
pub static ORIENTATION: SharedOrientation = SharedOrientation::level();

/// Latest desired bearing, degrees.
pub static BEARING: SharedBearing = SharedBearing::new(0.0);
