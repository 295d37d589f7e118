//! UART-backed collaborators for the control cycle.
//!
//! - [`gps`]: NMEA GPS bytes (4800 baud, UART0)
//! - [`crsf`]: CRSF RC channels and fix telemetry (420000 baud, UART1)

pub mod crsf;
pub mod gps;

pub use crsf::{CrsfInput, CrsfTelemetry, LinkError, SharedChannels};
pub use gps::{GpsBytes, GpsError, GpsQueue, GpsReceiver, GPS_QUEUE_DEPTH};
