//! Leaf value decoders for RCP TLVs.
//!
//! Each decoder maps the raw value bytes of a leaf TLV to the textual
//! representation used by the domain tree. A length or encoding violation is
//! reported as a [`FieldError`]; its `Display` output becomes the placeholder
//! recorded on the decoded node, so a bad leaf never aborts a walk.

use chrono::{DateTime, NaiveDate};
use std::fmt::Write as _;
use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;

/// Errors produced when a leaf value does not match its documented encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The value length is outside the documented bounds.
    #[error("invalid length: {got}, want: {want}")]
    Length {
        /// Actual value length in bytes.
        got: usize,
        /// Documented length or range.
        want: String,
    },
    /// The value bytes do not form a valid RFC 2579 DateAndTime.
    #[error("invalid DateAndTime value")]
    BadDateAndTime,
}

fn length_err(got: usize, want: &str) -> FieldError {
    FieldError::Length {
        got,
        want: want.to_string(),
    }
}

/// Decodes a 1-byte unsigned integer as decimal text.
///
/// # Errors
///
/// Returns [`FieldError::Length`] unless the value is exactly 1 byte.
pub fn u8_field(b: &[u8]) -> Result<String, FieldError> {
    if b.len() != 1 {
        return Err(length_err(b.len(), "1"));
    }
    Ok(b[0].to_string())
}

/// Decodes a 2-byte big-endian unsigned integer as decimal text.
///
/// # Errors
///
/// Returns [`FieldError::Length`] unless the value is exactly 2 bytes.
pub fn u16_field(b: &[u8]) -> Result<String, FieldError> {
    match <[u8; 2]>::try_from(b) {
        Ok(v) => Ok(u16::from_be_bytes(v).to_string()),
        Err(_) => Err(length_err(b.len(), "2")),
    }
}

/// Decodes a 4-byte big-endian unsigned integer as decimal text.
///
/// # Errors
///
/// Returns [`FieldError::Length`] unless the value is exactly 4 bytes.
pub fn u32_field(b: &[u8]) -> Result<String, FieldError> {
    match <[u8; 4]>::try_from(b) {
        Ok(v) => Ok(u32::from_be_bytes(v).to_string()),
        Err(_) => Err(length_err(b.len(), "4")),
    }
}

/// Decodes an octet string within the given length bounds.
///
/// The bytes are rendered as text; invalid UTF-8 sequences are replaced
/// rather than rejected, since the wire format treats the value as opaque.
///
/// # Errors
///
/// Returns [`FieldError::Length`] when the length is outside `min..=max`.
pub fn string_field(b: &[u8], min: usize, max: usize) -> Result<String, FieldError> {
    if b.len() < min || b.len() > max {
        return Err(length_err(b.len(), &format!("{min}-{max}")));
    }
    Ok(String::from_utf8_lossy(b).into_owned())
}

/// Decodes a 6-byte MAC address as colon-separated lowercase hex.
///
/// # Errors
///
/// Returns [`FieldError::Length`] unless the value is exactly 6 bytes.
pub fn mac_field(b: &[u8]) -> Result<String, FieldError> {
    if b.len() != 6 {
        return Err(length_err(b.len(), "6"));
    }
    let mut s = String::with_capacity(17);
    for (i, byte) in b.iter().enumerate() {
        if i > 0 {
            s.push(':');
        }
        let _ = write!(s, "{byte:02x}");
    }
    Ok(s)
}

/// Decodes a 4-byte IPv4 or 16-byte IPv6 address in canonical textual form.
///
/// # Errors
///
/// Returns [`FieldError::Length`] unless the value is 4 or 16 bytes.
pub fn ip_field(b: &[u8]) -> Result<String, FieldError> {
    if let Ok(v4) = <[u8; 4]>::try_from(b) {
        return Ok(Ipv4Addr::from(v4).to_string());
    }
    if let Ok(v6) = <[u8; 16]>::try_from(b) {
        return Ok(Ipv6Addr::from(v6).to_string());
    }
    Err(length_err(b.len(), "4 or 16"))
}

/// Decodes a 4-byte counter of hundredths of a second since the Unix epoch.
///
/// Zero renders as the literal `"0"`; any other value renders as
/// `YYYY-MM-DD HH:MM:SS.CC +00:00`.
///
/// # Errors
///
/// Returns [`FieldError::Length`] unless the value is exactly 4 bytes.
pub fn epoch_centis_field(b: &[u8]) -> Result<String, FieldError> {
    let v = match <[u8; 4]>::try_from(b) {
        Ok(v) => u32::from_be_bytes(v),
        Err(_) => return Err(length_err(b.len(), "4")),
    };
    if v == 0 {
        return Ok("0".to_string());
    }
    let secs = i64::from(v / 100);
    let centis = v % 100;
    let t = DateTime::from_timestamp(secs, centis * 10_000_000).ok_or(FieldError::BadDateAndTime)?;
    Ok(format!(
        "{}.{centis:02} +00:00",
        t.format("%Y-%m-%d %H:%M:%S")
    ))
}

/// Decodes an RFC 2579 DateAndTime value.
///
/// The 8-byte form carries year (2 bytes, big-endian), month, day, hour,
/// minute, second, and deci-seconds; the 11-byte form appends a direction
/// byte (`'+'` or `'-'`) and the UTC offset hours and minutes. The 8-byte
/// form renders with a `+00:00` offset.
///
/// # Errors
///
/// Returns [`FieldError::Length`] unless the value is 8 or 11 bytes, and
/// [`FieldError::BadDateAndTime`] when the encoded fields do not form a
/// valid calendar date and time.
pub fn date_time_field(b: &[u8]) -> Result<String, FieldError> {
    if b.len() != 8 && b.len() != 11 {
        return Err(length_err(b.len(), "8 or 11"));
    }
    let year = u16::from_be_bytes([b[0], b[1]]);
    let (month, day, hour, min, sec, deci) = (b[2], b[3], b[4], b[5], b[6], b[7]);
    let (dir, off_hour, off_min) = if b.len() == 11 {
        (b[8], b[9], b[10])
    } else {
        (b'+', 0, 0)
    };

    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .ok_or(FieldError::BadDateAndTime)?;
    if hour > 23 || min > 59 || sec > 60 || deci > 9 || off_hour > 13 || off_min > 59 {
        return Err(FieldError::BadDateAndTime);
    }
    let sign = match dir {
        b'+' => '+',
        b'-' => '-',
        _ => return Err(FieldError::BadDateAndTime),
    };

    Ok(format!(
        "{year:04}-{month:02}-{day:02} {hour:02}:{min:02}:{sec:02}.{deci} {sign}{off_hour:02}:{off_min:02}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_decode_big_endian() {
        assert_eq!(u8_field(&[9]).unwrap(), "9");
        assert_eq!(u16_field(&[0x11, 0x3d]).unwrap(), "4413");
        assert_eq!(u32_field(&[0x00, 0x00, 0x05, 0xdc]).unwrap(), "1500");
    }

    #[test]
    fn numeric_fields_reject_wrong_length() {
        assert!(matches!(
            u8_field(&[1, 2]),
            Err(FieldError::Length { got: 2, .. })
        ));
        assert_eq!(
            u16_field(&[1]).unwrap_err().to_string(),
            "invalid length: 1, want: 2"
        );
        assert!(u32_field(&[0; 3]).is_err());
    }

    #[test]
    fn string_field_respects_bounds() {
        assert_eq!(string_field(b"Cisco", 0, 255).unwrap(), "Cisco");
        assert_eq!(string_field(b"", 0, 255).unwrap(), "");
        assert!(string_field(b"1.0", 5, 32).is_err());
        assert_eq!(
            string_field(b"+000000.0", 9, 9).unwrap(),
            "+000000.0"
        );
        assert!(string_field(b"+000000.00", 9, 9).is_err());
    }

    #[test]
    fn mac_field_renders_lowercase_colons() {
        let mac = [0xa0, 0xf8, 0x49, 0x6f, 0x43, 0x1c];
        assert_eq!(mac_field(&mac).unwrap(), "a0:f8:49:6f:43:1c");
        assert!(mac_field(&mac[..5]).is_err());
    }

    #[test]
    fn ip_field_handles_both_families() {
        assert_eq!(ip_field(&[10, 0, 1, 254]).unwrap(), "10.0.1.254");
        let mut v6 = [0u8; 16];
        v6[0] = 0x20;
        v6[1] = 0x01;
        v6[2] = 0x05;
        v6[3] = 0x78;
        v6[4] = 0x10;
        v6[6] = 0x75;
        v6[7] = 0xa8;
        v6[15] = 0x01;
        assert_eq!(ip_field(&v6).unwrap(), "2001:578:1000:75a8::1");
        assert_eq!(
            ip_field(&[1, 2, 3]).unwrap_err().to_string(),
            "invalid length: 3, want: 4 or 16"
        );
    }

    #[test]
    fn epoch_centis_zero_is_literal_zero() {
        assert_eq!(epoch_centis_field(&[0, 0, 0, 0]).unwrap(), "0");
    }

    #[test]
    fn epoch_centis_divides_by_hundred() {
        // 13661 hundredths of a second = 136.61 s past the epoch.
        assert_eq!(
            epoch_centis_field(&[0x00, 0x00, 0x35, 0x5d]).unwrap(),
            "1970-01-01 00:02:16.61 +00:00"
        );
        assert!(epoch_centis_field(&[0, 0, 1]).is_err());
    }

    #[test]
    fn date_and_time_eight_byte_form_is_utc() {
        let b = [0x07, 0xe3, 0x04, 0x02, 0x12, 0x32, 0x2a, 0x05];
        assert_eq!(
            date_time_field(&b).unwrap(),
            "2019-04-02 18:50:42.5 +00:00"
        );
    }

    #[test]
    fn date_and_time_eleven_byte_form_carries_offset() {
        let plus = [0x07, 0xe3, 0x08, 0x07, 0x09, 0x0f, 0x00, 0x00, b'+', 5, 30];
        assert_eq!(
            date_time_field(&plus).unwrap(),
            "2019-08-07 09:15:00.0 +05:30"
        );
        let minus = [0x07, 0xe3, 0x08, 0x07, 0x09, 0x0f, 0x00, 0x00, b'-', 5, 30];
        assert_eq!(
            date_time_field(&minus).unwrap(),
            "2019-08-07 09:15:00.0 -05:30"
        );
    }

    #[test]
    fn date_and_time_rejects_bad_values() {
        assert!(matches!(
            date_time_field(&[0; 7]),
            Err(FieldError::Length { got: 7, .. })
        ));
        // Month 13 is not a calendar date.
        let bad = [0x07, 0xe3, 0x0d, 0x01, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(date_time_field(&bad), Err(FieldError::BadDateAndTime));
        // Direction byte must be '+' or '-'.
        let bad_dir = [0x07, 0xe3, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, b'x', 0, 0];
        assert_eq!(date_time_field(&bad_dir), Err(FieldError::BadDateAndTime));
    }
}
