//! Platform-agnostic control law for a fixed-wing aileron autopilot.
//!
//! This crate turns an orientation estimate, a desired bearing, the GPS
//! ground speed and two radio channels into one bounded aileron command.
//! It has no platform dependencies and runs both in `no_std` firmware and
//! on host for testing.
//!
//! # Overview
//!
//! - [`types`]: the orientation snapshot ([`Orientation`]) and [`saturate`]
//! - [`gains`]: controller coefficients ([`Gains`], [`DEFAULT_GAINS`])
//! - [`heading`]: bearing error to bank angle ([`HeadingController`])
//! - [`bank`]: bank angle to aileron ([`BankController`])
//! - [`mixer`]: manual override switch ([`AileronMixer`], [`ControlMode`])
//! - [`input`]: collaborator traits ([`ByteSource`], [`ChannelSource`],
//!   [`OrientationSource`], [`BearingSource`])
//! - [`snapshot`]: latest-value cells for inputs written by other tasks
//! - [`autopilot`]: the context that runs one control cycle ([`Autopilot`])
//!
//! # Control cascade
//!
//! ```text
//! bearing, heading, speed ─► HeadingController ─► bank (±30°)
//! bank, orientation       ─► BankController    ─► aileron (±0.1)
//! aileron, ch4, ch1       ─► AileronMixer      ─► servo command
//! ```
//!
//! Channel 4 below 1200 µs hands the aileron to the pilot stick on
//! channel 1, every cycle, with no hysteresis.
//!
//! # Example
//!
//! ```rust
//! use autopilot_core::{Autopilot, ChannelSource, ControlMode, Orientation};
//!
//! struct Switch(u16);
//!
//! impl ChannelSource for Switch {
//!     fn pulse_width(&self, channel: u8) -> u16 {
//!         if channel == 4 { self.0 } else { 1500 }
//!     }
//! }
//!
//! let mut autopilot = Autopilot::default();
//! let mut gps: &[u8] =
//!     b"$GPRMC,194617.04,A,4534.6714,N,01128.8559,E,010.0,287.0,091008,001.9,E,A*31\n";
//!
//! let out = autopilot.run_cycle(&mut gps, &Orientation::level(), &0.0f32, &Switch(1900));
//! assert_eq!(out.mode, ControlMode::Autonomous);
//! assert!(autopilot.fix().acquired);
//!
//! let out = autopilot.run_cycle(&mut gps, &Orientation::level(), &0.0f32, &Switch(1000));
//! assert_eq!(out.mode, ControlMode::Manual);
//! assert_eq!(out.aileron, 0.0);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and mode-change logging
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod autopilot;
pub mod bank;
pub mod gains;
pub mod heading;
pub mod input;
pub mod mixer;
pub mod snapshot;
pub mod types;

// Re-export main types at crate root
pub use autopilot::{Autopilot, ControlOutput, ControllerState, CycleInputs};
pub use bank::{BankController, AILERON_LIMIT};
pub use gains::{Gains, DEFAULT_GAINS};
pub use heading::{wrap_heading_error, HeadingController, BANK_LIMIT_DEG};
pub use input::{BearingSource, ByteSource, ChannelSource, OrientationSource};
pub use mixer::{
    manual_command, select_mode, AileronMixer, ChannelMap, ControlMode, MixerOutput,
    DEFAULT_CHANNEL_MAP, OVERRIDE_THRESHOLD,
};
pub use snapshot::{SharedBearing, SharedOrientation, SnapshotCell};
pub use types::{saturate, Matrix3, Orientation};

pub use nmea_proto;
