//! Snapshot/restore ("selfie") support.
//!
//! A selfie is a magic-version-tagged copy of a [`Buffer`]'s words, cheap
//! to produce and cheap to validate: a version mismatch fails before any
//! existing state is touched.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::layout::{read_u16_le, write_u16_le, SELFIE_MAGIC};

/// Structured binary form: a 2-byte magic/version tag followed by the raw
/// buffer bytes.
pub fn to_selfie(buf: &Buffer) -> Vec<u8> {
    let mut out = vec![0u8; 2];
    write_u16_le(&mut out, 0, SELFIE_MAGIC);
    out.extend_from_slice(buf.byte_view());
    out
}

pub fn from_selfie(data: &[u8]) -> Result<Buffer> {
    if data.len() < 2 {
        return Err(Error::SelfieMalformed);
    }
    let found = read_u16_le(data, 0);
    if found != SELFIE_MAGIC {
        return Err(Error::SelfieVersionMismatch {
            expected: SELFIE_MAGIC,
            found,
        });
    }
    Ok(Buffer::from_bytes(data[2..].to_vec()))
}

/// String form: `"<version>\t<hex-encoded buffer bytes>"`. Useful when the
/// snapshot needs to travel through a text-only channel.
pub fn to_selfie_string(buf: &Buffer) -> String {
    let mut out = String::with_capacity(2 + 1 + buf.len() * 2);
    out.push_str(&SELFIE_MAGIC.to_string());
    out.push('\t');
    for byte in buf.byte_view() {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

pub fn from_selfie_string(s: &str) -> Result<Buffer> {
    let (version_str, hex) = s.split_once('\t').ok_or(Error::SelfieMalformed)?;
    let found: u16 = version_str.parse().map_err(|_| Error::SelfieMalformed)?;
    if found != SELFIE_MAGIC {
        return Err(Error::SelfieVersionMismatch {
            expected: SELFIE_MAGIC,
            found,
        });
    }
    if hex.len() % 2 != 0 {
        return Err(Error::SelfieEncoding);
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    let hex_bytes = hex.as_bytes();
    for chunk in hex_bytes.chunks(2) {
        let pair = std::str::from_utf8(chunk).map_err(|_| Error::SelfieEncoding)?;
        let byte = u8::from_str_radix(pair, 16).map_err(|_| Error::SelfieEncoding)?;
        bytes.push(byte);
    }
    Ok(Buffer::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::parse;

    #[test]
    fn structured_selfie_round_trips() {
        let mut buf = Buffer::new();
        parse(&mut buf, "com\nco.uk\n", |s| s.to_string());
        let selfie = to_selfie(&buf);
        let restored = from_selfie(&selfie).unwrap();
        assert_eq!(buf.byte_view(), restored.byte_view());
    }

    #[test]
    fn string_selfie_round_trips() {
        let mut buf = Buffer::new();
        parse(&mut buf, "com\nco.uk\n", |s| s.to_string());
        let selfie = to_selfie_string(&buf);
        let restored = from_selfie_string(&selfie).unwrap();
        assert_eq!(buf.byte_view(), restored.byte_view());
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let mut bad = vec![9u8, 0];
        bad.extend_from_slice(&[0u8; 512]);
        let err = from_selfie(&bad).unwrap_err();
        assert_eq!(
            err,
            Error::SelfieVersionMismatch {
                expected: SELFIE_MAGIC,
                found: 9
            }
        );
    }
}
