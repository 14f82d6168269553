//! COPY text format encoding.
//!
//! COPY rows are tab separated, newline terminated, with `\N` for NULL and
//! backslash escapes for the characters that would otherwise break the row
//! structure. Field separators and row terminators are written by the
//! caller; this module produces the text of one field at a time.

use std::borrow::Cow;

use bytes::{BufMut, BytesMut};

use crate::bytea;
use crate::context::ConnectionContext;
use crate::error::CodecError;
use crate::value::Value;

/// The COPY text NULL marker.
pub const NULL_MARKER: &[u8] = b"\\N";

fn needs_escape(b: u8) -> bool {
    matches!(b, b'\\' | b'\n' | b'\r' | b'\t')
}

fn escape_byte<B: BufMut>(b: u8, buf: &mut B) {
    match b {
        b'\\' => buf.put_slice(b"\\\\"),
        b'\n' => buf.put_slice(b"\\n"),
        b'\r' => buf.put_slice(b"\\r"),
        b'\t' => buf.put_slice(b"\\t"),
        _ => buf.put_u8(b),
    }
}

/// Escape text for a COPY field.
///
/// Text without any of the four special characters is returned borrowed.
#[must_use]
pub fn escape(text: &str) -> Cow<'_, [u8]> {
    let bytes = text.as_bytes();
    match bytes.iter().position(|&b| needs_escape(b)) {
        None => Cow::Borrowed(bytes),
        Some(first) => {
            let mut out = Vec::with_capacity(bytes.len() + 8);
            out.extend_from_slice(&bytes[..first]);
            for &b in &bytes[first..] {
                escape_byte(b, &mut out);
            }
            Cow::Owned(out)
        }
    }
}

/// Append escaped COPY text to `buf`.
pub fn append_escaped(buf: &mut BytesMut, text: &str) {
    let bytes = text.as_bytes();
    let Some(first) = bytes.iter().position(|&b| needs_escape(b)) else {
        buf.put_slice(bytes);
        return;
    };

    buf.reserve(bytes.len() + 8);
    buf.put_slice(&bytes[..first]);
    for &b in &bytes[first..] {
        escape_byte(b, buf);
    }
}

/// Reverse [`escape`] for one field of a COPY row.
///
/// `\\`, `\n`, `\r` and `\t` map back to their characters; a backslash
/// before any other byte yields that byte. A trailing lone backslash is an
/// error.
pub fn unescape(field: &[u8]) -> Result<Cow<'_, [u8]>, CodecError> {
    let Some(first) = field.iter().position(|&b| b == b'\\') else {
        return Ok(Cow::Borrowed(field));
    };

    let mut out = Vec::with_capacity(field.len());
    out.extend_from_slice(&field[..first]);

    let mut rest = field[first..].iter();
    while let Some(&b) = rest.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        let escaped = match rest.next() {
            Some(b'n') => b'\n',
            Some(b'r') => b'\r',
            Some(b't') => b'\t',
            Some(&other) => other,
            None => {
                return Err(CodecError::InvalidEscape(format!(
                    "trailing backslash in '{}'",
                    field.escape_ascii()
                )));
            }
        };
        out.push(escaped);
    }

    Ok(Cow::Owned(out))
}

/// Append the COPY text of `value` to `buf`.
///
/// Numbers use their shortest round-trip decimal form, unlike the fixed
/// precision of [`crate::encode::encode`]. Bytes always use the bytea
/// encoding for the server version.
pub fn append_copy_text(
    ctx: &ConnectionContext,
    buf: &mut BytesMut,
    value: &Value,
) -> Result<(), CodecError> {
    match value {
        Value::Null => buf.put_slice(NULL_MARKER),
        Value::Bool(v) => buf.put_slice(if *v { &b"true"[..] } else { &b"false"[..] }),
        Value::Int8(v) => buf.put_slice(itoa::Buffer::new().format(*v).as_bytes()),
        Value::Float4(v) => buf.put_slice(v.to_string().as_bytes()),
        Value::Float8(v) => buf.put_slice(v.to_string().as_bytes()),
        Value::Text(s) => append_escaped(buf, s),
        Value::Bytes(b) => bytea::encode_into(ctx.server_version, b, buf),
        Value::Timestamp(t) => buf.put_slice(t.to_string().as_bytes()),
    }
    Ok(())
}
