//! `bytea` text encodings.
//!
//! The server reads and writes binary strings in one of two formats:
//!
//! - hex (9.0+): `\x` followed by two hex digits per byte
//! - escape (legacy): printable bytes as-is, backslash doubled, everything
//!   else as `\ooo` octal

use bytes::{BufMut, Bytes, BytesMut};

use crate::context::HEX_BYTEA_MIN_VERSION;
use crate::error::CodecError;

/// Prefix marking hex-format bytea text.
pub const HEX_PREFIX: &[u8] = b"\\x";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Decode bytea text in either hex or escape format.
pub fn decode(text: &[u8]) -> Result<Bytes, CodecError> {
    match text.strip_prefix(HEX_PREFIX) {
        Some(hex) => decode_hex(hex),
        None => decode_escape(text),
    }
}

/// Encode bytes for a server of the given version.
///
/// Servers from 9.0 on get the hex format; older servers only understand
/// the escape format.
#[must_use]
pub fn encode(server_version: i32, data: &[u8]) -> Bytes {
    let mut buf = BytesMut::new();
    encode_into(server_version, data, &mut buf);
    buf.freeze()
}

/// Append the bytea text for `data` to `buf`.
pub fn encode_into(server_version: i32, data: &[u8], buf: &mut BytesMut) {
    if server_version >= HEX_BYTEA_MIN_VERSION {
        encode_hex(data, buf);
    } else {
        tracing::debug!(server_version, len = data.len(), "using escape format for bytea");
        encode_escape(data, buf);
    }
}

/// Append `\x` and the lowercase hex digits of `data` to `buf`.
pub fn encode_hex(data: &[u8], buf: &mut BytesMut) {
    buf.reserve(HEX_PREFIX.len() + data.len() * 2);
    buf.put_slice(HEX_PREFIX);
    for &b in data {
        buf.put_u8(HEX_DIGITS[usize::from(b >> 4)]);
        buf.put_u8(HEX_DIGITS[usize::from(b & 0x0f)]);
    }
}

fn encode_escape(data: &[u8], buf: &mut BytesMut) {
    buf.reserve(data.len());
    for &b in data {
        match b {
            b'\\' => buf.put_slice(b"\\\\"),
            0x20..=0x7e => buf.put_u8(b),
            _ => {
                buf.put_u8(b'\\');
                buf.put_u8(b'0' + (b >> 6));
                buf.put_u8(b'0' + ((b >> 3) & 0o7));
                buf.put_u8(b'0' + (b & 0o7));
            }
        }
    }
}

fn decode_hex(hex: &[u8]) -> Result<Bytes, CodecError> {
    if hex.len() % 2 != 0 {
        return Err(CodecError::InvalidBytea(format!(
            "odd number of hex digits ({})",
            hex.len()
        )));
    }

    let mut out = BytesMut::with_capacity(hex.len() / 2);
    for (i, pair) in hex.chunks_exact(2).enumerate() {
        let (Some(high), Some(low)) = (hex_value(pair[0]), hex_value(pair[1])) else {
            return Err(CodecError::InvalidBytea(format!(
                "invalid hex digits '{}' at position {}",
                pair.escape_ascii(),
                HEX_PREFIX.len() + i * 2
            )));
        };
        out.put_u8((high << 4) | low);
    }
    Ok(out.freeze())
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

fn decode_escape(mut text: &[u8]) -> Result<Bytes, CodecError> {
    let mut out = BytesMut::with_capacity(text.len());

    while let Some(&first) = text.first() {
        if first != b'\\' {
            let run = text.iter().position(|&b| b == b'\\').unwrap_or(text.len());
            out.put_slice(&text[..run]);
            text = &text[run..];
            continue;
        }

        if text.get(1) == Some(&b'\\') {
            out.put_u8(b'\\');
            text = &text[2..];
            continue;
        }

        let Some(digits) = text.get(1..4) else {
            return Err(CodecError::InvalidBytea(format!(
                "truncated escape sequence '{}'",
                text.escape_ascii()
            )));
        };
        let value = digits.iter().try_fold(0u16, |acc, &d| match d {
            b'0'..=b'7' => Some(acc * 8 + u16::from(d - b'0')),
            _ => None,
        });
        let byte = value.and_then(|v| u8::try_from(v).ok()).ok_or_else(|| {
            CodecError::InvalidBytea(format!(
                "invalid octal escape '\\{}'",
                digits.escape_ascii()
            ))
        })?;
        out.put_u8(byte);
        text = &text[4..];
    }

    Ok(out.freeze())
}
