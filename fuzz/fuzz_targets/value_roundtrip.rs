#![no_main]

use arbitrary::Arbitrary;
use bytes::{Bytes, BytesMut};
use libfuzzer_sys::fuzz_target;
use pg_codec::{ConnectionContext, Oid, Value, append_copy_text, decode, encode};

/// Arbitrary values for round-trip fuzzing.
#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float4(f32),
    Float8(f64),
    Text(String),
    Binary(Vec<u8>),
}

fuzz_target!(|input: (FuzzValue, bool)| {
    let (input, legacy) = input;
    let ctx = ConnectionContext::new(if legacy { 80400 } else { 160000 });

    let (value, oid) = match input {
        FuzzValue::Null => (Value::Null, Oid::TEXT),
        FuzzValue::Bool(v) => (Value::Bool(v), Oid::BOOL),
        FuzzValue::Int(v) => (Value::Int8(v), Oid::INT8),
        FuzzValue::Float4(v) => (Value::Float4(v), Oid::FLOAT4),
        FuzzValue::Float8(v) => (Value::Float8(v), Oid::FLOAT8),
        FuzzValue::Text(v) => (Value::Text(v), Oid::TEXT),
        FuzzValue::Binary(v) => (Value::Bytes(Bytes::from(v)), Oid::BYTEA),
    };

    // COPY text never fails
    let mut buf = BytesMut::new();
    append_copy_text(&ctx, &mut buf, &value).expect("copy text is total");

    let Ok(text) = encode(&ctx, &value, oid) else {
        assert!(value.is_null());
        return;
    };
    let decoded = decode(&ctx, &text, oid);
    match (&value, decoded) {
        (Value::Bool(_) | Value::Int8(_) | Value::Bytes(_), Ok(decoded)) => {
            assert_eq!(value, decoded)
        }
        // floats lose precision, text passes through as raw bytes
        _ => {}
    }
});
