//! Single-value text encoding.
//!
//! This module turns a [`Value`] into the literal text the server accepts
//! for a parameter of a given type in the text wire format.

use std::fmt::Write as _;

use bytes::{BufMut, Bytes, BytesMut};

use crate::bytea;
use crate::context::ConnectionContext;
use crate::error::CodecError;
use crate::oid::Oid;
use crate::value::Value;

/// Decimal places written for `float4` parameters.
pub const FLOAT4_DECIMALS: usize = 9;
/// Decimal places written for `float8` parameters.
pub const FLOAT8_DECIMALS: usize = 17;

/// Trait for encoding values to their text-format parameter literal.
pub trait PgEncode {
    /// Append the literal text of this value, as a parameter of type `oid`,
    /// to the buffer.
    fn encode_text(
        &self,
        ctx: &ConnectionContext,
        oid: Oid,
        buf: &mut BytesMut,
    ) -> Result<(), CodecError>;
}

impl PgEncode for Value {
    fn encode_text(
        &self,
        ctx: &ConnectionContext,
        oid: Oid,
        buf: &mut BytesMut,
    ) -> Result<(), CodecError> {
        match self {
            Value::Int8(v) => buf.put_slice(itoa::Buffer::new().format(*v).as_bytes()),
            Value::Float4(v) => write_fmt(buf, format_args!("{:.*}", FLOAT4_DECIMALS, v)),
            Value::Float8(v) => write_fmt(buf, format_args!("{:.*}", FLOAT8_DECIMALS, v)),
            Value::Bytes(b) => {
                if oid == Oid::BYTEA {
                    bytea::encode_into(ctx.server_version, b, buf);
                } else {
                    buf.put_slice(b);
                }
            }
            Value::Text(s) => {
                // Text bound to a bytea parameter is always sent as hex,
                // whatever the server version.
                if oid == Oid::BYTEA {
                    bytea::encode_hex(s.as_bytes(), buf);
                } else {
                    buf.put_slice(s.as_bytes());
                }
            }
            Value::Bool(v) => buf.put_slice(if *v { &b"true"[..] } else { &b"false"[..] }),
            Value::Timestamp(t) => match oid {
                Oid::TIME => write_fmt(buf, format_args!("{}", t.clock(false))),
                Oid::TIMETZ => write_fmt(buf, format_args!("{}", t.clock(true))),
                _ => write_fmt(buf, format_args!("{t}")),
            },
            Value::Null => {
                return Err(CodecError::UnsupportedValue { kind: self.kind() });
            }
        }
        Ok(())
    }
}

/// Encode a single parameter value of type `oid`.
///
/// NULL has no literal form here; the protocol layer sends it as a NULL
/// parameter length instead, so passing [`Value::Null`] is an error.
pub fn encode(ctx: &ConnectionContext, value: &Value, oid: Oid) -> Result<Bytes, CodecError> {
    let mut buf = BytesMut::new();
    value.encode_text(ctx, oid, &mut buf)?;
    Ok(buf.freeze())
}

fn write_fmt(buf: &mut BytesMut, args: std::fmt::Arguments<'_>) {
    // Writing into a BytesMut grows the buffer and cannot fail.
    let _ = buf.write_fmt(args);
}
