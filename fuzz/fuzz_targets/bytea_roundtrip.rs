#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pg_codec::bytea;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    legacy: bool,
    data: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let version = if input.legacy { 80400 } else { 90000 };
    let encoded = bytea::encode(version, &input.data);
    let decoded = bytea::decode(&encoded).expect("encoded bytea must decode");
    assert_eq!(&decoded[..], &input.data[..]);

    // Arbitrary text must be rejected cleanly
    let _ = bytea::decode(&input.data);
});
