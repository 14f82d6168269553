//! # pg-codec
//!
//! PostgreSQL text-format value codec.
//!
//! This crate converts Rust values into the literal text the server accepts
//! for query parameters and COPY rows, and parses the text the server sends
//! for result columns back into Rust values. It does no I/O: the protocol
//! layer hands it byte slices tagged with a type OID, plus a read-only
//! [`ConnectionContext`] describing the server.
//!
//! ## Type Mappings
//!
//! | PostgreSQL Type | [`Value`] | Rust Type |
//! |-----------------|-----------|-----------|
//! | `bool` | `Bool` | `bool` |
//! | `int2`/`int4`/`int8` | `Int8` | `i16`/`i32`/`i64` |
//! | `float4` | `Float4` | `f32` |
//! | `float8` | `Float8` | `f64` |
//! | `bytea` | `Bytes` | `Vec<u8>`, `bytes::Bytes` |
//! | `timestamp`/`timestamptz`/`date` | `Timestamp` | [`Timestamp`], `chrono::DateTime<FixedOffset>` |
//! | `time`/`timetz` | `Timestamp` (on 0000-01-01) | [`Timestamp`] |
//! | anything else | `Bytes` (raw text) | `String`, `Vec<u8>` |
//!
//! ## Example
//!
//! ```rust
//! use pg_codec::{ConnectionContext, Oid, Value, decode, encode};
//!
//! let ctx = ConnectionContext::new(140000);
//! let text = encode(&ctx, &Value::Bytes(b"\x00\xff".to_vec().into()), Oid::BYTEA)?;
//! assert_eq!(&text[..], b"\\x00ff");
//!
//! let value = decode(&ctx, b"42", Oid::INT4)?;
//! assert_eq!(value, Value::Int8(42));
//! # Ok::<(), pg_codec::CodecError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bytea;
pub mod context;
pub mod copy;
pub mod decode;
pub mod encode;
pub mod error;
pub mod from_sql;
pub mod nullable;
pub mod oid;
pub mod timestamp;
pub mod to_sql;
pub mod value;

pub use context::{ConnectionContext, FixedZone, Location, parse_server_version};
pub use copy::append_copy_text;
pub use decode::decode;
pub use encode::{PgEncode, encode};
pub use error::CodecError;
pub use from_sql::FromSql;
pub use nullable::NullTimestamp;
pub use oid::Oid;
pub use timestamp::{Clock, ParsedTimestamp, Timestamp};
pub use to_sql::ToSql;
pub use value::Value;
