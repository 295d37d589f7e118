//! Raw GPS sentence logging over defmt.

use defmt::debug;
use heapless::Vec;
use nmea_proto::{EchoSink, ECHO_CAPACITY};

/// Collects an echoed sentence and logs it as one line.
#[derive(Default)]
pub struct DefmtEcho {
    line: Vec<u8, ECHO_CAPACITY>,
}

impl DefmtEcho {
    #[must_use]
    pub const fn new() -> Self {
        Self { line: Vec::new() }
    }
}

impl EchoSink for DefmtEcho {
    fn put_byte(&mut self, byte: u8) {
        if byte != b'\n' {
            // The parser never echoes more than one buffer's worth.
            let _ = self.line.push(byte);
        }
    }

    fn end_line(&mut self) {
        debug!("gps: {=[u8]:a}", self.line.as_slice());
        self.line.clear();
    }
}
