//! CRSF channel values to servo pulse widths.
//!
//! CRSF carries 16 RC channels with 11-bit resolution. Transmitters send
//! 172..=1811 for a full stick throw, centred on 992, which this module maps
//! onto the 988..=2011 µs servo range centred on 1500 µs.

use autopilot_core::ChannelSource;

/// Number of RC channels in one CRSF frame.
pub const CHANNEL_COUNT: usize = 16;

/// CRSF channel center value (11-bit).
pub const CRSF_CENTER: u16 = 992;

/// CRSF value at full negative stick.
pub const CRSF_MIN: u16 = 172;

/// CRSF value at full positive stick.
pub const CRSF_MAX: u16 = 1811;

/// Servo pulse width at stick centre, µs.
pub const PULSE_CENTER_US: i32 = 1500;

/// Per-channel conversion settings.
///
/// Customize this at compile-time by creating your own const.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CrsfMapping {
    /// Mirror the channel around [`CRSF_CENTER`], indexed from 0.
    pub invert: [bool; CHANNEL_COUNT],
}

/// Nothing inverted.
pub const DEFAULT_CRSF_MAPPING: CrsfMapping = CrsfMapping {
    invert: [false; CHANNEL_COUNT],
};

impl Default for CrsfMapping {
    fn default() -> Self {
        DEFAULT_CRSF_MAPPING
    }
}

impl CrsfMapping {
    /// Same mapping with channel `index` (0-based) inverted.
    #[must_use]
    pub const fn with_inverted(mut self, index: usize) -> Self {
        if index < CHANNEL_COUNT {
            self.invert[index] = true;
        }
        self
    }
}

/// Convert a CRSF channel value to a pulse width in µs.
///
/// `1500 + (ticks - 992) * 5 / 8`, truncating toward zero.
#[inline]
#[must_use]
pub fn crsf_to_pulse(ticks: u16, invert: bool) -> u16 {
    let mut centered = i32::from(ticks) - i32::from(CRSF_CENTER);
    if invert {
        centered = -centered;
    }
    let pulse = PULSE_CENTER_US + centered * 5 / 8;
    pulse.clamp(0, i32::from(u16::MAX)) as u16
}

/// Latest pulse widths of all 16 channels.
///
/// Every channel reads 0 until the first frame arrives, which keeps the
/// override switch below its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RcChannels {
    pulses: [u16; CHANNEL_COUNT],
}

impl Default for RcChannels {
    fn default() -> Self {
        Self::new()
    }
}

impl RcChannels {
    /// No frame received yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pulses: [0; CHANNEL_COUNT],
        }
    }

    /// Convert one frame of raw CRSF values.
    #[must_use]
    pub fn from_crsf(channels: &[u16; CHANNEL_COUNT], mapping: &CrsfMapping) -> Self {
        let mut pulses = [0; CHANNEL_COUNT];
        let inputs = channels.iter().zip(mapping.invert.iter());
        for (pulse, (&ticks, &invert)) in pulses.iter_mut().zip(inputs) {
            *pulse = crsf_to_pulse(ticks, invert);
        }
        Self { pulses }
    }

    /// Pulse width at CRSF index `index` (0-based), 0 if out of range.
    #[must_use]
    pub fn pulse(&self, index: usize) -> u16 {
        self.pulses.get(index).copied().unwrap_or(0)
    }

    /// All pulse widths, CRSF order.
    #[must_use]
    pub const fn pulses(&self) -> &[u16; CHANNEL_COUNT] {
        &self.pulses
    }

    /// True once any frame has been applied.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.pulses.iter().any(|&p| p != 0)
    }
}

/// Receiver channel 1 is CRSF index 0.
impl ChannelSource for RcChannels {
    fn pulse_width(&self, channel: u8) -> u16 {
        match channel {
            0 => 0,
            n => self.pulse(usize::from(n) - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crsf_to_pulse_center() {
        assert_eq!(crsf_to_pulse(CRSF_CENTER, false), 1500);
        assert_eq!(crsf_to_pulse(CRSF_CENTER, true), 1500);
    }

    #[test]
    fn test_crsf_to_pulse_extremes() {
        assert_eq!(crsf_to_pulse(CRSF_MIN, false), 988);
        assert_eq!(crsf_to_pulse(CRSF_MAX, false), 2011);
        assert_eq!(crsf_to_pulse(0, false), 880);
        assert_eq!(crsf_to_pulse(2047, false), 2159);
    }

    #[test]
    fn test_crsf_to_pulse_invert() {
        assert_eq!(crsf_to_pulse(CRSF_MAX, true), 989);
        assert_eq!(crsf_to_pulse(CRSF_MIN, true), 2012);
    }

    #[test]
    fn test_override_threshold_reachable() {
        // A switch at full low must read below 1200 µs, full high above.
        assert!(crsf_to_pulse(CRSF_MIN, false) < 1200);
        assert!(crsf_to_pulse(CRSF_MAX, false) >= 1200);
    }

    #[test]
    fn test_channels_read_zero_before_first_frame() {
        let rc = RcChannels::new();
        assert!(!rc.is_live());
        for channel in 0..=20 {
            assert_eq!(rc.pulse_width(channel), 0);
        }
    }

    #[test]
    fn test_channel_numbering_is_one_based() {
        let mut raw = [CRSF_CENTER; CHANNEL_COUNT];
        raw[0] = CRSF_MAX;
        raw[3] = CRSF_MIN;
        let rc = RcChannels::from_crsf(&raw, &DEFAULT_CRSF_MAPPING);
        assert!(rc.is_live());
        assert_eq!(rc.pulse_width(1), 2011);
        assert_eq!(rc.pulse_width(4), 988);
        assert_eq!(rc.pulse_width(2), 1500);
        assert_eq!(rc.pulse_width(16), 1500);
        assert_eq!(rc.pulse_width(17), 0);
        assert_eq!(rc.pulse(0), 2011);
    }

    #[test]
    fn test_inverted_mapping() {
        let mapping = DEFAULT_CRSF_MAPPING.with_inverted(3).with_inverted(99);
        let mut raw = [CRSF_CENTER; CHANNEL_COUNT];
        raw[3] = CRSF_MIN;
        let rc = RcChannels::from_crsf(&raw, &mapping);
        assert_eq!(rc.pulse_width(4), 2012);
    }
}
