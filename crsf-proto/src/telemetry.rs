//! CRSF telemetry encoding.
//!
//! Reports the committed GPS fix back to the transmitter as a CRSF GPS frame.

use nmea_proto::NavFix;
use uf_crsf::packets::{write_packet_to_buffer, Gps, PacketAddress};

/// Maximum size for a CRSF telemetry frame.
pub const MAX_TELEMETRY_FRAME_SIZE: usize = 64;

/// CRSF altitude field offset: this value means 0 m.
pub const ALTITUDE_OFFSET_M: u16 = 1000;

/// Error type for telemetry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryError {
    /// No valid fix to report.
    NoFix,
    /// A field was rejected by the packet encoder.
    Encode,
    /// Output buffer too small.
    BufferFull,
}

/// Largest latitude magnitude, degrees.
pub const LATITUDE_LIMIT_DEG: f32 = 90.0;

/// Largest longitude magnitude, degrees.
pub const LONGITUDE_LIMIT_DEG: f32 = 180.0;

/// Degrees to the CRSF 1e-7 degree unit.
///
/// `None` for NaN or anything beyond `limit`; 180° still fits an `i32`.
#[inline]
fn degrees_to_e7(deg: f32, limit: f32) -> Option<i32> {
    if (-limit..=limit).contains(&deg) {
        Some((f64::from(deg) * 1.0e7) as i32)
    } else {
        None
    }
}

/// Tenths of a knot to the CRSF 0.1 km/h unit.
#[inline]
#[must_use]
pub fn knots_tenths_to_kmh_tenths(raw: u32) -> u16 {
    let kmh = u64::from(raw) * 1852 / 1000;
    kmh.min(u64::from(u16::MAX)) as u16
}

/// Encode `fix` as a CRSF GPS frame into `buf`.
///
/// Altitude and satellite count are not known to the fix and are sent as
/// 0 m and 0 satellites.
///
/// A position outside ±90° latitude or ±180° longitude is rejected with
/// [`TelemetryError::Encode`] rather than clipped.
///
/// # Returns
///
/// The number of bytes written to the buffer, or an error.
pub fn encode_fix(fix: &NavFix, buf: &mut [u8]) -> Result<usize, TelemetryError> {
    if !fix.acquired {
        return Err(TelemetryError::NoFix);
    }

    let latitude = degrees_to_e7(fix.latitude_deg, LATITUDE_LIMIT_DEG)
        .ok_or(TelemetryError::Encode)?;
    let longitude = degrees_to_e7(fix.longitude_deg, LONGITUDE_LIMIT_DEG)
        .ok_or(TelemetryError::Encode)?;

    let heading_cdeg = fix.heading_deg.clamp(0, 360) as u16 * 100;
    let packet = Gps::new(
        latitude,
        longitude,
        knots_tenths_to_kmh_tenths(fix.speed_raw),
        heading_cdeg,
        ALTITUDE_OFFSET_M,
        0,
    )
    .map_err(|_| TelemetryError::Encode)?;
    write_packet_to_buffer(buf, PacketAddress::FlightController, &packet)
        .map_err(|_| TelemetryError::BufferFull)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmea_proto::FixParser;

    const REFERENCE: &[u8] =
        b"$GPRMC,194617.04,A,4534.6714,N,01128.8559,E,000.0,287.0,091008,001.9,E,A*31\r\n";
    // Both fields decode to 63.0
    const LOW_LATITUDE: &[u8] =
        b"$GPRMC,194617.04,A,0130.0000,N,00130.0000,E,010.0,090.0,091008,001.9,E,A*31\r\n";

    fn parsed_fix(sentence: &[u8]) -> NavFix {
        let mut parser = FixParser::new();
        assert!(parser.push_slice(sentence));
        *parser.fix()
    }

    fn acquired_fix() -> NavFix {
        let mut fix = NavFix::new();
        fix.acquired = true;
        fix.latitude_deg = 45.5;
        fix.longitude_deg = 11.25;
        fix.heading_deg = 287;
        fix.north_deg = 73;
        fix.speed_raw = 100;
        fix
    }

    #[test]
    fn test_speed_units() {
        assert_eq!(knots_tenths_to_kmh_tenths(0), 0);
        // 10.0 kn = 18.52 km/h
        assert_eq!(knots_tenths_to_kmh_tenths(100), 185);
        assert_eq!(knots_tenths_to_kmh_tenths(u32::MAX), u16::MAX);
    }

    #[test]
    fn test_no_fix_is_not_reported() {
        let mut buf = [0u8; MAX_TELEMETRY_FRAME_SIZE];
        assert_eq!(encode_fix(&NavFix::new(), &mut buf), Err(TelemetryError::NoFix));
    }

    #[test]
    fn test_gps_frame_layout() {
        let mut buf = [0u8; MAX_TELEMETRY_FRAME_SIZE];
        let len = encode_fix(&acquired_fix(), &mut buf).unwrap();
        // address, length, type, 15 payload bytes, crc
        assert_eq!(len, 19);
        assert_eq!(buf[0], 0xC8);
        assert_eq!(buf[1], 17);
        assert_eq!(buf[2], 0x02);
        assert_eq!(&buf[3..7], &455_000_000i32.to_be_bytes());
        assert_eq!(&buf[7..11], &112_500_000i32.to_be_bytes());
        assert_eq!(&buf[11..13], &185u16.to_be_bytes());
        assert_eq!(&buf[13..15], &28_700u16.to_be_bytes());
    }

    #[test]
    fn test_parsed_fix_out_of_range_is_rejected() {
        let fix = parsed_fix(REFERENCE);
        assert!(fix.latitude_deg > LATITUDE_LIMIT_DEG);

        let mut buf = [0u8; MAX_TELEMETRY_FRAME_SIZE];
        assert_eq!(encode_fix(&fix, &mut buf), Err(TelemetryError::Encode));
    }

    #[test]
    fn test_parsed_fix_in_range() {
        let fix = parsed_fix(LOW_LATITUDE);
        let mut buf = [0u8; MAX_TELEMETRY_FRAME_SIZE];
        let len = encode_fix(&fix, &mut buf).unwrap();
        assert_eq!(len, 19);
        assert_eq!(&buf[3..7], &630_000_000i32.to_be_bytes());
        assert_eq!(&buf[7..11], &630_000_000i32.to_be_bytes());
    }

    #[test]
    fn test_position_limits() {
        let mut buf = [0u8; MAX_TELEMETRY_FRAME_SIZE];

        let mut fix = acquired_fix();
        fix.longitude_deg = -180.0;
        assert!(encode_fix(&fix, &mut buf).is_ok());
        assert_eq!(&buf[7..11], &(-1_800_000_000i32).to_be_bytes());

        fix.longitude_deg = 180.5;
        assert_eq!(encode_fix(&fix, &mut buf), Err(TelemetryError::Encode));

        let mut fix = acquired_fix();
        fix.latitude_deg = f32::NAN;
        assert_eq!(encode_fix(&fix, &mut buf), Err(TelemetryError::Encode));
    }

    #[test]
    fn test_small_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(encode_fix(&acquired_fix(), &mut buf), Err(TelemetryError::BufferFull));
    }
}
