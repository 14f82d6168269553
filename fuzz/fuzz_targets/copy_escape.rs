#![no_main]

use libfuzzer_sys::fuzz_target;
use pg_codec::copy;

fuzz_target!(|input: &str| {
    let escaped = copy::escape(input);
    assert!(!escaped.iter().any(|&b| matches!(b, b'\t' | b'\n' | b'\r')));

    let unescaped = copy::unescape(&escaped).expect("escaped text must unescape");
    assert_eq!(&unescaped[..], input.as_bytes());
});
