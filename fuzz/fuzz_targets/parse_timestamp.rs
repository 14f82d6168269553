#![no_main]

use libfuzzer_sys::fuzz_target;
use pg_codec::{ConnectionContext, Oid, ParsedTimestamp, decode, encode};

fuzz_target!(|input: &str| {
    // Raw field parse must never panic, even on overflowing fields
    let _ = ParsedTimestamp::parse(input);
    let _ = ParsedTimestamp::parse_clock(input, true);

    // Anything that decodes must re-encode to text that decodes to the same value
    let ctx = ConnectionContext::default();
    if let Ok(value) = decode(&ctx, input.as_bytes(), Oid::TIMESTAMPTZ) {
        let text = encode(&ctx, &value, Oid::TIMESTAMPTZ).expect("timestamps always encode");
        let again = decode(&ctx, &text, Oid::TIMESTAMPTZ).expect("encoded timestamp must parse");
        assert_eq!(value, again);
    }
});
