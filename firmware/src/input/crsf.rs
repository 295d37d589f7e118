//! CRSF radio link: RC channels in, fix telemetry out.
//!
//! # Pins
//!
//! Uses UART1 at 420000 baud:
//! - GPIO 8: TX (telemetry to the receiver)
//! - GPIO 9: RX (RC frames from the receiver)

use crsf_proto::{encode_fix, CrsfReceiver, RcChannels, TelemetryError, MAX_TELEMETRY_FRAME_SIZE};
use defmt::{debug, Format};
use embassy_rp::uart::{Async, UartRx, UartTx};
use nmea_proto::NavFix;

use autopilot_core::SnapshotCell;

/// Latest RC channel pulse widths, written by the link task.
pub type SharedChannels = SnapshotCell<RcChannels>;

/// Errors on the CRSF link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum LinkError {
    /// UART I/O error.
    Io,
    /// Telemetry frame could not be built.
    Telemetry(TelemetryError),
}

/// Receives RC frames and publishes the channel snapshot.
pub struct CrsfInput<'d> {
    rx: UartRx<'d, Async>,
    receiver: CrsfReceiver,
    channels: &'static SharedChannels,
}

impl<'d> CrsfInput<'d> {
    /// Create an input from a UART receiver configured for 420000 baud.
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>, channels: &'static SharedChannels) -> Self {
        Self {
            rx,
            receiver: CrsfReceiver::new(),
            channels,
        }
    }

    /// Read bytes until the next RC frame and publish it.
    pub async fn receive(&mut self) -> Result<RcChannels, LinkError> {
        let mut byte = [0u8; 1];

        loop {
            self.rx.read(&mut byte).await.map_err(|_| LinkError::Io)?;

            if self.receiver.push_byte(byte[0]) {
                let channels = self.receiver.channels();
                self.channels.publish(channels);
                if self.receiver.frames() == 1 {
                    debug!("first RC frame: {}", channels);
                }
                return Ok(channels);
            }
        }
    }
}

/// Sends the committed fix back to the transmitter.
pub struct CrsfTelemetry<'d> {
    tx: UartTx<'d, Async>,
    buf: [u8; MAX_TELEMETRY_FRAME_SIZE],
}

impl<'d> CrsfTelemetry<'d> {
    #[must_use]
    pub fn new(tx: UartTx<'d, Async>) -> Self {
        Self {
            tx,
            buf: [0; MAX_TELEMETRY_FRAME_SIZE],
        }
    }

    /// Encode and transmit one GPS frame.
    pub async fn send_fix(&mut self, fix: &NavFix) -> Result<(), LinkError> {
        let len = encode_fix(fix, &mut self.buf).map_err(LinkError::Telemetry)?;
        self.tx.write(&self.buf[..len]).await.map_err(|_| LinkError::Io)
    }
}
