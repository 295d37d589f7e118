//! CRSF radio-control input for the autopilot.
//!
//! This crate provides chip-agnostic CRSF frame handling for the autopilot
//! control channels. It is designed to be fed byte by byte from any UART
//! implementation.
//!
//! # Features
//!
//! - Parse CRSF RC channel packets via `uf-crsf`
//! - Convert channel values to servo pulse widths ([`RcChannels`]), which
//!   implement [`autopilot_core::ChannelSource`]
//! - Configurable per-channel inversion ([`CrsfMapping`])
//! - GPS fix telemetry for the transmitter backchannel
//! - No chip-specific dependencies - works on any platform
//!
//! # Example
//!
//! ```ignore
//! use autopilot_core::ChannelSource;
//! use crsf_proto::CrsfReceiver;
//!
//! let mut receiver = CrsfReceiver::new();
//!
//! // Feed bytes from UART
//! for byte in uart_bytes {
//!     if receiver.push_byte(byte) {
//!         let override_pulse = receiver.channels().pulse_width(4);
//!         // Use pulse...
//!     }
//! }
//! ```
//!
//! # UART Configuration
//!
//! CRSF uses 420000 baud, 8N1:
//! - Baud rate: 420000 (ExpressLRS) or 416666 (TBS Crossfire)
//! - Data bits: 8
//! - Parity: None
//! - Stop bits: 1

#![cfg_attr(not(feature = "std"), no_std)]

pub mod mapping;
pub mod receiver;
pub mod telemetry;

// Re-export main types from mapping
pub use mapping::{
    crsf_to_pulse, CrsfMapping, RcChannels, CHANNEL_COUNT, CRSF_CENTER, CRSF_MAX, CRSF_MIN,
    DEFAULT_CRSF_MAPPING,
};
pub use receiver::CrsfReceiver;

// Re-export telemetry encoding
pub use telemetry::{
    encode_fix, knots_tenths_to_kmh_tenths, TelemetryError, LATITUDE_LIMIT_DEG, LONGITUDE_LIMIT_DEG,
    MAX_TELEMETRY_FRAME_SIZE,
};

/// CRSF baud rate for ExpressLRS receivers.
pub const CRSF_BAUDRATE_ELRS: u32 = 420_000;

/// CRSF baud rate for TBS Crossfire receivers.
pub const CRSF_BAUDRATE_TBS: u32 = 416_666;
