//! Byte-driven CRSF receiver keeping the latest channel snapshot.

use uf_crsf::packets::Packet;
use uf_crsf::parser::CrsfParser;

use crate::mapping::{CrsfMapping, RcChannels, DEFAULT_CRSF_MAPPING};

#[cfg(feature = "defmt")]
use defmt::trace;

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

/// CRSF frame parser plus the pulse widths of the last RC frame.
///
/// Telemetry and link-statistics frames are ignored.
pub struct CrsfReceiver {
    parser: CrsfParser,
    mapping: CrsfMapping,
    channels: RcChannels,
    frames: u32,
    errors: u32,
}

impl Default for CrsfReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl CrsfReceiver {
    /// Create a receiver with the default channel mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mapping(DEFAULT_CRSF_MAPPING)
    }

    /// Create a receiver with a custom channel mapping.
    #[must_use]
    pub fn with_mapping(mapping: CrsfMapping) -> Self {
        Self {
            parser: CrsfParser::new(),
            mapping,
            channels: RcChannels::new(),
            frames: 0,
            errors: 0,
        }
    }

    /// Feed one UART byte. Returns `true` when an RC frame completed.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        match self.parser.push_byte(byte) {
            Ok(Some(Packet::RCChannels(rc))) => {
                self.channels = RcChannels::from_crsf(&rc.0, &self.mapping);
                self.frames = self.frames.wrapping_add(1);
                true
            }
            Ok(_) => false,
            Err(_) => {
                // Resynchronise on the next sync byte
                trace!("crsf: frame error, resetting parser");
                self.parser.reset();
                self.errors = self.errors.wrapping_add(1);
                false
            }
        }
    }

    /// Feed a slice; returns `true` if any RC frame completed.
    pub fn push_slice(&mut self, bytes: &[u8]) -> bool {
        let mut updated = false;
        for &b in bytes {
            updated |= self.push_byte(b);
        }
        updated
    }

    /// Pulse widths of the last RC frame.
    #[must_use]
    pub fn channels(&self) -> RcChannels {
        self.channels
    }

    /// RC frames received.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Frames rejected by the parser.
    #[must_use]
    pub fn errors(&self) -> u32 {
        self.errors
    }
}
