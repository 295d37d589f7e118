//! Autopilot: the GPS parser and the control cascade in one context.
//!
//! One control cycle drains the GPS byte source, samples every
//! collaborator once, then runs heading → bank → mixer in that order over
//! the sampled values.

use nmea_proto::{EchoSink, FixEvent, FixParser, NavFix, NoEcho};

use crate::bank::BankController;
use crate::gains::Gains;
use crate::heading::HeadingController;
use crate::input::{BearingSource, ByteSource, ChannelSource, OrientationSource};
use crate::mixer::{mix_pulses, AileronMixer, ChannelMap, ControlMode};
use crate::types::Orientation;

#[cfg(feature = "defmt")]
use defmt::debug;

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

/// Everything one cycle reads, copied out of the collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleInputs {
    /// Attitude estimate.
    pub orientation: Orientation,
    /// Bearing to the next waypoint, degrees.
    pub desired_bearing_deg: f32,
    /// Ground speed from the last committed fix.
    pub ground_speed_mps: f32,
    /// Override channel pulse width, µs.
    pub override_pulse: u16,
    /// Primary (aileron stick) channel pulse width, µs.
    pub primary_pulse: u16,
}

/// Controller outputs of the last cycle, each already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState {
    /// Heading controller output, degrees within ±30.
    pub commanded_bank_deg: f32,
    /// Bank controller output within ±0.1.
    pub commanded_aileron: f32,
}

/// Result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlOutput {
    pub mode: ControlMode,
    /// Command to drive the aileron servo with.
    pub aileron: f32,
    pub state: ControllerState,
}

/// Autopilot context.
///
/// Owns the configuration, the fix parser and the controller state; there
/// is no global state.
pub struct Autopilot<E = NoEcho> {
    gains: Gains,
    heading: HeadingController,
    bank: BankController,
    mixer: AileronMixer,
    parser: FixParser<E>,
    state: ControllerState,
    mode: Option<ControlMode>,
}

impl Autopilot<NoEcho> {
    /// Create an autopilot without sentence echo.
    #[must_use]
    pub fn new(gains: Gains, channels: ChannelMap) -> Self {
        Self::with_echo(gains, channels, NoEcho)
    }
}

impl Default for Autopilot<NoEcho> {
    fn default() -> Self {
        Self::new(Gains::default(), ChannelMap::default())
    }
}

impl<E: EchoSink> Autopilot<E> {
    /// Create an autopilot whose parser echoes raw sentences to `echo`.
    #[must_use]
    pub fn with_echo(gains: Gains, channels: ChannelMap, echo: E) -> Self {
        Self {
            gains,
            heading: HeadingController::new(&gains),
            bank: BankController::new(&gains),
            mixer: AileronMixer::new(channels),
            parser: FixParser::with_echo(echo),
            state: ControllerState::default(),
            mode: None,
        }
    }

    /// Feed at most one GPS byte. An empty source gives `NeedMore`.
    pub fn poll_gps<S: ByteSource + ?Sized>(&mut self, gps: &mut S) -> FixEvent {
        match gps.poll_byte() {
            Some(byte) => self.parser.push_byte(byte),
            None => FixEvent::NeedMore,
        }
    }

    /// Feed GPS bytes until the source runs dry.
    ///
    /// Returns `true` if a fix was committed on the way.
    pub fn drain_gps<S: ByteSource + ?Sized>(&mut self, gps: &mut S) -> bool {
        let mut ready = false;
        while let Some(byte) = gps.poll_byte() {
            ready |= self.parser.push_byte(byte).is_fix_ready();
        }
        ready
    }

    /// Copy one value out of every collaborator.
    pub fn sample<O, B, C>(&self, orientation: &O, bearing: &B, channels: &C) -> CycleInputs
    where
        O: OrientationSource + ?Sized,
        B: BearingSource + ?Sized,
        C: ChannelSource + ?Sized,
    {
        let (override_pulse, primary_pulse) = self.mixer.read_pulses(channels);
        CycleInputs {
            orientation: orientation.orientation(),
            desired_bearing_deg: bearing.desired_bearing_deg(),
            ground_speed_mps: self.parser.fix().speed_mps() as f32,
            override_pulse,
            primary_pulse,
        }
    }

    /// Run heading, bank and mixer over one input snapshot.
    pub fn step(&mut self, inputs: &CycleInputs) -> ControlOutput {
        let current_heading = inputs.orientation.heading_deg();
        let commanded_bank_deg = self.heading.update(
            current_heading,
            inputs.desired_bearing_deg,
            inputs.ground_speed_mps,
        );
        let commanded_aileron = self.bank.update(commanded_bank_deg, &inputs.orientation);
        self.state = ControllerState {
            commanded_bank_deg,
            commanded_aileron,
        };

        let mixed = mix_pulses(inputs.override_pulse, inputs.primary_pulse, commanded_aileron);
        if self.mode != Some(mixed.mode) {
            debug!("control mode -> {}", mixed.mode);
            self.mode = Some(mixed.mode);
        }

        ControlOutput {
            mode: mixed.mode,
            aileron: mixed.aileron,
            state: self.state,
        }
    }

    /// Drain the GPS source, sample the collaborators and step once.
    pub fn run_cycle<S, O, B, C>(
        &mut self,
        gps: &mut S,
        orientation: &O,
        bearing: &B,
        channels: &C,
    ) -> ControlOutput
    where
        S: ByteSource + ?Sized,
        O: OrientationSource + ?Sized,
        B: BearingSource + ?Sized,
        C: ChannelSource + ?Sized,
    {
        self.drain_gps(gps);
        let inputs = self.sample(orientation, bearing, channels);
        self.step(&inputs)
    }

    /// Last committed fix.
    pub fn fix(&self) -> &NavFix {
        self.parser.fix()
    }

    /// Controller outputs of the last cycle.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Mode chosen by the last cycle, `None` before the first.
    pub fn mode(&self) -> Option<ControlMode> {
        self.mode
    }

    /// Gains the controllers were built from.
    pub fn gains(&self) -> &Gains {
        &self.gains
    }

    pub fn channel_map(&self) -> ChannelMap {
        self.mixer.channel_map()
    }

    /// Get a reference to the GPS parser.
    pub fn parser(&self) -> &FixParser<E> {
        &self.parser
    }

    /// Get a mutable reference to the GPS parser.
    pub fn parser_mut(&mut self) -> &mut FixParser<E> {
        &mut self.parser
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::gains::DEFAULT_GAINS;
    use crate::mixer::DEFAULT_CHANNEL_MAP;
    use crate::types::tests::yaw;
    use std::vec::Vec;

    const REFERENCE: &[u8] =
        b"$GPRMC,194617.04,A,4534.6714,N,01128.8559,E,000.0,287.0,091008,001.9,E,A*31\r\n";
    // 100 tenths of a knot -> 5 m/s
    const MOVING: &[u8] =
        b"$GPRMC,194617.04,A,4534.6714,N,01128.8559,E,010.0,090.0,091008,001.9,E,A*31\r\n";

    struct Radio {
        pulses: [u16; 8],
    }

    impl Radio {
        fn new(override_pulse: u16, primary_pulse: u16) -> Self {
            let mut pulses = [1500; 8];
            pulses[4] = override_pulse;
            pulses[1] = primary_pulse;
            Self { pulses }
        }
    }

    impl ChannelSource for Radio {
        fn pulse_width(&self, channel: u8) -> u16 {
            self.pulses.get(usize::from(channel)).copied().unwrap_or(0)
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<u8>);

    impl EchoSink for Recorder {
        fn put_byte(&mut self, byte: u8) {
            self.0.push(byte);
        }
    }

    #[test]
    fn test_poll_gps_one_byte_at_a_time() {
        let mut autopilot = Autopilot::default();
        let mut gps: &[u8] = REFERENCE;
        let mut events = Vec::new();
        for _ in 0..REFERENCE.len() + 3 {
            events.push(autopilot.poll_gps(&mut gps));
        }
        assert_eq!(events.iter().filter(|e| e.is_fix_ready()).count(), 1);
        assert_eq!(events[REFERENCE.len()], FixEvent::NeedMore);
        assert_eq!(autopilot.fix().heading_deg, 287);
        assert_eq!(autopilot.fix().north_deg, 73);
    }

    #[test]
    fn test_drain_gps_reports_fix() {
        let mut autopilot = Autopilot::default();
        let mut gps: &[u8] = REFERENCE;
        assert!(autopilot.drain_gps(&mut gps));
        assert!(gps.is_empty());
        assert!(autopilot.fix().acquired);

        let mut empty: &[u8] = &[];
        assert!(!autopilot.drain_gps(&mut empty));
    }

    #[test]
    fn test_manual_before_any_radio_frame() {
        let mut autopilot = Autopilot::default();
        let silent = Radio { pulses: [0; 8] };
        let mut none: &[u8] = &[];
        let out = autopilot.run_cycle(&mut none, &Orientation::level(), &0.0f32, &silent);
        assert_eq!(out.mode, ControlMode::Manual);
        assert_eq!(out.aileron, -3.0);
    }

    #[test]
    fn test_autonomous_turns_toward_bearing() {
        let mut autopilot = Autopilot::new(DEFAULT_GAINS, DEFAULT_CHANNEL_MAP);
        let mut gps: &[u8] = MOVING;
        // Heading 90, bearing 80: error +10 * 5 m/s * 0.03 = 1.5° bank
        let out = autopilot.run_cycle(&mut gps, &yaw(90.0), &80.0f32, &Radio::new(1900, 1500));
        assert_eq!(out.mode, ControlMode::Autonomous);
        assert!((out.state.commanded_bank_deg - 1.5).abs() < 1e-2);
        assert_eq!(out.aileron, out.state.commanded_aileron);
        assert!(out.aileron > 0.0 && out.aileron <= 0.1);
    }

    #[test]
    fn test_manual_override_ignores_controller() {
        let mut autopilot = Autopilot::default();
        let mut gps: &[u8] = MOVING;
        // Heading 90, bearing 300: error wraps to +150 -> 22.5° bank
        let out = autopilot.run_cycle(&mut gps, &yaw(90.0), &300.0f32, &Radio::new(1000, 1250));
        assert_eq!(out.mode, ControlMode::Manual);
        assert_eq!(out.aileron, -0.5);
        // controller still ran
        assert!((out.state.commanded_bank_deg - 22.5).abs() < 1e-2);
        assert_eq!(out.state.commanded_aileron, 0.1);
        assert_eq!(autopilot.state(), out.state);
    }

    #[test]
    fn test_mode_follows_switch_every_cycle() {
        let mut autopilot = Autopilot::default();
        assert_eq!(autopilot.mode(), None);
        let level = Orientation::level();
        let mut none: &[u8] = &[];
        for (pulse, mode) in [
            (1199, ControlMode::Manual),
            (1200, ControlMode::Autonomous),
            (1199, ControlMode::Manual),
        ] {
            let out = autopilot.run_cycle(&mut none, &level, &0.0f32, &Radio::new(pulse, 1500));
            assert_eq!(out.mode, mode);
            assert_eq!(autopilot.mode(), Some(mode));
        }
    }

    #[test]
    fn test_step_uses_snapshot_only() {
        let mut autopilot = Autopilot::default();
        let inputs = CycleInputs {
            orientation: yaw(10.0),
            desired_bearing_deg: 350.0,
            ground_speed_mps: 10.0,
            override_pulse: 2000,
            primary_pulse: 1500,
        };
        let out = autopilot.step(&inputs);
        assert!((out.state.commanded_bank_deg - 6.0).abs() < 1e-2);
        assert_eq!(out.mode, ControlMode::Autonomous);
    }

    #[test]
    fn test_sample_reads_fix_speed() {
        let mut autopilot = Autopilot::default();
        assert!(autopilot.parser_mut().push_slice(MOVING));
        let inputs = autopilot.sample(&Orientation::level(), &12.0f32, &Radio::new(1300, 1600));
        assert_eq!(inputs.ground_speed_mps, 5.0);
        assert_eq!(inputs.desired_bearing_deg, 12.0);
        assert_eq!(inputs.override_pulse, 1300);
        assert_eq!(inputs.primary_pulse, 1600);
    }

    #[test]
    fn test_echo_reaches_sink() {
        let mut autopilot =
            Autopilot::with_echo(DEFAULT_GAINS, DEFAULT_CHANNEL_MAP, Recorder::default());
        let mut gps: &[u8] = REFERENCE;
        autopilot.drain_gps(&mut gps);
        let echoed = &autopilot.parser().echo().0;
        assert_eq!(echoed.len(), REFERENCE.len() - 1);
        assert!(!echoed.contains(&b'\r'));
        assert_eq!(echoed.last(), Some(&b'\n'));
    }

    #[test]
    fn test_accessors() {
        let gains = DEFAULT_GAINS.with_bank_kp(1.0);
        let autopilot = Autopilot::new(gains, DEFAULT_CHANNEL_MAP);
        assert_eq!(autopilot.gains(), &gains);
        assert_eq!(autopilot.channel_map(), DEFAULT_CHANNEL_MAP);
        assert_eq!(autopilot.state(), ControllerState::default());
        assert!(!autopilot.fix().acquired);
    }
}
