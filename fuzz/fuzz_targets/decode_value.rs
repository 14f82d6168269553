#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pg_codec::{ConnectionContext, Oid, decode};

/// Type OIDs the decoder dispatches on, plus one it passes through.
const OIDS: [Oid; 15] = [
    Oid::BOOL,
    Oid::BYTEA,
    Oid::INT8,
    Oid::INT2,
    Oid::INT4,
    Oid::TEXT,
    Oid::FLOAT4,
    Oid::FLOAT8,
    Oid::VARCHAR,
    Oid::DATE,
    Oid::TIME,
    Oid::TIMESTAMP,
    Oid::TIMESTAMPTZ,
    Oid::TIMETZ,
    Oid(3802),
];

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    oid_index: u8,
    server_version: i32,
    data: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let oid = OIDS[usize::from(input.oid_index) % OIDS.len()];
    let ctx = ConnectionContext::new(input.server_version);

    // Errors are fine, panics are not
    let _ = decode(&ctx, &input.data, oid);
});
