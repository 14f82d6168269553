//! Text-format decoding of column values.
//!
//! This module turns the text the server sends for a column into a
//! [`Value`], dispatching on the column's type OID. Types the codec does not
//! know come back as their raw bytes.

use bytes::Bytes;

use crate::bytea;
use crate::context::ConnectionContext;
use crate::error::CodecError;
use crate::oid::Oid;
use crate::timestamp;
use crate::value::Value;

/// Decode the text of a column of type `oid`.
pub fn decode(ctx: &ConnectionContext, data: &[u8], oid: Oid) -> Result<Value, CodecError> {
    decode_value(ctx, data, oid).inspect_err(|error| {
        tracing::trace!(%oid, len = data.len(), %error, "failed to decode column value");
    })
}

fn decode_value(ctx: &ConnectionContext, data: &[u8], oid: Oid) -> Result<Value, CodecError> {
    match oid {
        Oid::BYTEA => bytea::decode(data).map(Value::Bytes),
        Oid::TIMESTAMPTZ => {
            timestamp::parse_timestamp(ctx.location(), as_text(data)?).map(Value::Timestamp)
        }
        Oid::TIMESTAMP | Oid::DATE => {
            timestamp::parse_timestamp(None, as_text(data)?).map(Value::Timestamp)
        }
        Oid::TIME => timestamp::parse_clock(as_text(data)?, false).map(Value::Timestamp),
        Oid::TIMETZ => timestamp::parse_clock(as_text(data)?, true).map(Value::Timestamp),
        Oid::BOOL => decode_bool(data),
        Oid::INT2 | Oid::INT4 | Oid::INT8 => decode_int(data),
        Oid::FLOAT4 => parse_number::<f32>(data).map(Value::Float4),
        Oid::FLOAT8 => parse_number::<f64>(data).map(Value::Float8),
        _ => Ok(Value::Bytes(Bytes::copy_from_slice(data))),
    }
}

fn as_text(data: &[u8]) -> Result<&str, CodecError> {
    std::str::from_utf8(data).map_err(|_| CodecError::InvalidUtf8)
}

fn decode_bool(data: &[u8]) -> Result<Value, CodecError> {
    // The server sends `t` or `f`; only the first byte is significant.
    match data.first() {
        Some(&b) => Ok(Value::Bool(b == b't')),
        None => Err(CodecError::Empty { type_name: "bool" }),
    }
}

fn decode_int(data: &[u8]) -> Result<Value, CodecError> {
    parse_number::<i64>(data).map(Value::Int8)
}

fn parse_number<T>(data: &[u8]) -> Result<T, CodecError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let text = as_text(data)?;
    text.parse().map_err(|e: T::Err| CodecError::InvalidNumber {
        value: text.to_owned(),
        reason: e.to_string(),
    })
}
