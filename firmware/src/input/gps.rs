//! UART GPS receiver and the byte queue feeding the control cycle.
//!
//! The receive task only moves bytes; parsing happens inside the control
//! cycle, which drains the queue through [`GpsBytes`].
//!
//! # Pins
//!
//! Uses UART0:
//! - GPIO 0: TX (unused, the receiver is listen-only)
//! - GPIO 1: RX

use autopilot_core::ByteSource;
use defmt::{warn, Format};
use embassy_rp::uart::{Async, Error as UartError, UartRx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Bytes buffered between the UART and the control cycle.
///
/// At 4800 baud about ten bytes arrive per 50 Hz tick.
pub const GPS_QUEUE_DEPTH: usize = 128;

/// Queue from the receive task to the control task.
pub type GpsQueue = Channel<CriticalSectionRawMutex, u8, GPS_QUEUE_DEPTH>;

/// Receive-side failures. None of them reach the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum GpsError {
    /// UART framing error (wrong baud rate or noise).
    Framing,
    /// UART FIFO overrun.
    Overrun,
    /// Line held low.
    Break,
    /// Parity mismatch.
    Parity,
    /// Any other UART error.
    Io,
}

/// Convert UART errors to [`GpsError`].
#[inline]
fn uart_error_to_gps_error(e: UartError) -> GpsError {
    match e {
        UartError::Framing => GpsError::Framing,
        UartError::Overrun => GpsError::Overrun,
        UartError::Break => GpsError::Break,
        UartError::Parity => GpsError::Parity,
        _ => GpsError::Io,
    }
}

/// Moves GPS bytes from the UART into a [`GpsQueue`].
pub struct GpsReceiver<'d> {
    rx: UartRx<'d, Async>,
    queue: &'static GpsQueue,
    dropped: u32,
}

impl<'d> GpsReceiver<'d> {
    /// Create a receiver from a UART configured for [`nmea_proto::GPS_BAUDRATE`].
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>, queue: &'static GpsQueue) -> Self {
        Self {
            rx,
            queue,
            dropped: 0,
        }
    }

    /// Read one byte and queue it.
    ///
    /// A full queue drops the byte; the parser resynchronises on the next
    /// `$`.
    pub async fn receive(&mut self) -> Result<(), GpsError> {
        let mut byte = [0u8; 1];
        self.rx.read(&mut byte).await.map_err(uart_error_to_gps_error)?;

        if self.queue.try_send(byte[0]).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            if self.dropped.is_power_of_two() {
                warn!("GPS queue full, {} bytes dropped", self.dropped);
            }
        }
        Ok(())
    }

    /// Bytes dropped because the control cycle fell behind.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Control-side view of the queue: never waits.
pub struct GpsBytes {
    queue: &'static GpsQueue,
}

impl GpsBytes {
    #[must_use]
    pub const fn new(queue: &'static GpsQueue) -> Self {
        Self { queue }
    }
}

impl ByteSource for GpsBytes {
    fn poll_byte(&mut self) -> Option<u8> {
        self.queue.try_receive().ok()
    }
}
