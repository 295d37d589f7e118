//! Collaborator traits for the autopilot inputs.
//!
//! Every source is polled, never awaited: the control cycle takes one
//! snapshot from each and must not block. Implementations backed by
//! interrupt or task state copy their value out (see
//! [`crate::snapshot::SnapshotCell`]).

use crate::types::Orientation;

/// Serial byte stream carrying GPS sentences.
pub trait ByteSource {
    /// Next received byte, or `None` if nothing is waiting.
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Radio-control receiver channel snapshot.
pub trait ChannelSource {
    /// Pulse width of `channel` in microseconds.
    ///
    /// Channels are numbered from 1. Unknown or not yet received channels
    /// read 0.
    fn pulse_width(&self, channel: u8) -> u16;
}

/// Attitude estimate supplied by the inertial subsystem.
pub trait OrientationSource {
    /// Latest estimate; never blocks.
    fn orientation(&self) -> Orientation;
}

/// Bearing supplied by waypoint navigation.
pub trait BearingSource {
    /// Desired bearing in degrees, 0 to 360.
    fn desired_bearing_deg(&self) -> f32;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn poll_byte(&mut self) -> Option<u8> {
        (**self).poll_byte()
    }
}

/// A byte slice drains front to back.
impl ByteSource for &[u8] {
    fn poll_byte(&mut self) -> Option<u8> {
        let (&first, rest) = self.split_first()?;
        *self = rest;
        Some(first)
    }
}

impl<T: ChannelSource + ?Sized> ChannelSource for &T {
    fn pulse_width(&self, channel: u8) -> u16 {
        (**self).pulse_width(channel)
    }
}

impl<T: OrientationSource + ?Sized> OrientationSource for &T {
    fn orientation(&self) -> Orientation {
        (**self).orientation()
    }
}

impl<T: BearingSource + ?Sized> BearingSource for &T {
    fn desired_bearing_deg(&self) -> f32 {
        (**self).desired_bearing_deg()
    }
}

/// A fixed estimate, for bench setups without an IMU.
impl OrientationSource for Orientation {
    fn orientation(&self) -> Orientation {
        *self
    }
}

/// A fixed bearing.
impl BearingSource for f32 {
    fn desired_bearing_deg(&self) -> f32 {
        *self
    }
}
