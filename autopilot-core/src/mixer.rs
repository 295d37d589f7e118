//! Aileron mixer: manual override versus autonomous command.

use crate::input::ChannelSource;

/// Override channel pulse width below which the pilot has control, µs.
pub const OVERRIDE_THRESHOLD: u16 = 1200;
/// Stick-centred pulse width, µs.
pub const PULSE_CENTER: i32 = 1500;
/// Pulse width offset that maps to full deflection.
pub const PULSE_HALF_RANGE: f32 = 500.0;

/// Who is flying the aileron channel this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// Pilot stick passed through.
    Manual,
    /// Bank controller output.
    Autonomous,
}

/// Which receiver channels carry the override switch and the aileron stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMap {
    pub override_channel: u8,
    pub primary_channel: u8,
}

/// Override on channel 4, aileron stick on channel 1.
pub const DEFAULT_CHANNEL_MAP: ChannelMap = ChannelMap {
    override_channel: 4,
    primary_channel: 1,
};

impl Default for ChannelMap {
    fn default() -> Self {
        DEFAULT_CHANNEL_MAP
    }
}

/// Mode selected by an override pulse width. No hysteresis.
#[inline]
#[must_use]
pub const fn select_mode(override_pulse: u16) -> ControlMode {
    if override_pulse < OVERRIDE_THRESHOLD {
        ControlMode::Manual
    } else {
        ControlMode::Autonomous
    }
}

/// Stick pulse width mapped to a deflection, `(pulse - 1500) / 500`.
///
/// Not clamped: a 2000 µs stick gives 1.0, a 0 µs reading gives -3.0.
#[inline]
#[must_use]
pub fn manual_command(primary_pulse: u16) -> f32 {
    (i32::from(primary_pulse) - PULSE_CENTER) as f32 / PULSE_HALF_RANGE
}

/// Final aileron command and the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MixerOutput {
    pub mode: ControlMode,
    pub aileron: f32,
}

/// Hard cut between the pilot stick and the autonomous command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AileronMixer {
    map: ChannelMap,
}

impl AileronMixer {
    #[must_use]
    pub const fn new(map: ChannelMap) -> Self {
        Self { map }
    }

    pub const fn channel_map(&self) -> ChannelMap {
        self.map
    }

    /// Read the override and primary pulse widths through the channel map.
    pub fn read_pulses<C: ChannelSource + ?Sized>(&self, channels: &C) -> (u16, u16) {
        (
            channels.pulse_width(self.map.override_channel),
            channels.pulse_width(self.map.primary_channel),
        )
    }

    /// Choose the aileron command for this cycle.
    pub fn mix<C: ChannelSource + ?Sized>(&self, channels: &C, autonomous: f32) -> MixerOutput {
        let (override_pulse, primary_pulse) = self.read_pulses(channels);
        mix_pulses(override_pulse, primary_pulse, autonomous)
    }
}

/// Mix already sampled pulse widths.
#[must_use]
pub fn mix_pulses(override_pulse: u16, primary_pulse: u16, autonomous: f32) -> MixerOutput {
    let mode = select_mode(override_pulse);
    let aileron = match mode {
        ControlMode::Manual => manual_command(primary_pulse),
        ControlMode::Autonomous => autonomous,
    };
    MixerOutput { mode, aileron }
}
