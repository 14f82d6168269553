//! Codec edge case tests.
//!
//! Tests edge cases for:
//! - Encode/decode round trips per type OID
//! - bytea in both encodings
//! - Timestamp grammar corner cases
//! - COPY text escaping
//! - Error reporting

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use chrono::{Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike};
use pg_codec::{
    CodecError, ConnectionContext, FixedZone, FromSql, Location, NullTimestamp, Oid,
    ParsedTimestamp, Timestamp, ToSql, Value, append_copy_text, bytea, copy, decode, encode,
};
use proptest::prelude::*;

fn modern() -> ConnectionContext {
    ConnectionContext::new(150004)
}

fn legacy() -> ConnectionContext {
    ConnectionContext::new(80411)
}

fn round_trip(ctx: &ConnectionContext, value: &Value, oid: Oid) -> Value {
    let text = encode(ctx, value, oid).expect("encode");
    decode(ctx, &text, oid).expect("decode")
}

// ============================================================================
// Round Trips
// ============================================================================

mod round_trips {
    use super::*;

    #[test]
    fn test_integers() {
        for v in [0, 1, -1, i64::from(i16::MIN), i64::from(i32::MAX), i64::MIN, i64::MAX] {
            let value = Value::Int8(v);
            for oid in [Oid::INT2, Oid::INT4, Oid::INT8] {
                assert_eq!(round_trip(&modern(), &value, oid), value);
            }
        }
    }

    #[test]
    fn test_float8_keeps_value() {
        for v in [0.0, -0.5, 1.25, 1e10, -123_456.75] {
            let value = Value::Float8(v);
            assert_eq!(round_trip(&modern(), &value, Oid::FLOAT8), value);
        }
    }

    #[test]
    fn test_float4_keeps_value() {
        for v in [0.0f32, 0.1, -3.5, 16_777_216.0, 1.0e-3] {
            let value = Value::Float4(v);
            assert_eq!(round_trip(&modern(), &value, Oid::FLOAT4), value);
        }
    }

    #[test]
    fn test_float8_precision_is_truncated() {
        // 17 fixed decimals cannot carry the smallest subnormals
        let tiny = Value::Float8(f64::MIN_POSITIVE);
        assert_eq!(round_trip(&modern(), &tiny, Oid::FLOAT8), Value::Float8(0.0));
    }

    #[test]
    fn test_booleans() {
        for v in [true, false] {
            assert_eq!(round_trip(&modern(), &Value::Bool(v), Oid::BOOL), Value::Bool(v));
        }
    }

    #[test]
    fn test_bytea_both_versions() {
        let value = Value::Bytes(Bytes::from_static(b"\x00\\\x7f\x80 ok \xff"));
        assert_eq!(round_trip(&modern(), &value, Oid::BYTEA), value);
        assert_eq!(round_trip(&legacy(), &value, Oid::BYTEA), value);
    }

    #[test]
    fn test_text_as_bytea() {
        let decoded = round_trip(&legacy(), &Value::from("h\u{e9}llo"), Oid::BYTEA);
        assert_eq!(decoded, Value::Bytes(Bytes::from("h\u{e9}llo")));
    }

    #[test]
    fn test_timestamps() {
        let offset = FixedOffset::east_opt(-(7 * 3600 + 30 * 60)).unwrap();
        let cases = [
            offset.with_ymd_and_hms(2024, 3, 5, 13, 4, 5).unwrap(),
            offset
                .with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
                .unwrap()
                .with_nanosecond(123_456_789)
                .unwrap(),
            offset.with_ymd_and_hms(-44, 3, 15, 12, 0, 0).unwrap(),
        ];
        for dt in cases {
            let value = Value::from(dt);
            assert_eq!(round_trip(&modern(), &value, Oid::TIMESTAMPTZ), value);
            assert_eq!(round_trip(&modern(), &value, Oid::TIMESTAMP), value);
        }
    }

    #[test]
    fn test_text_is_stable() {
        for input in [
            "2024-03-05 13:04:05.123456-07:30",
            "0044-01-01 00:00:00+00:00 BC",
            "1999-12-31 23:59:59.5+14:00",
        ] {
            let decoded = decode(&modern(), input.as_bytes(), Oid::TIMESTAMPTZ).unwrap();
            let encoded = encode(&modern(), &decoded, Oid::TIMESTAMPTZ).unwrap();
            assert_eq!(&encoded[..], input.as_bytes());
        }
    }

    #[test]
    fn test_clock_and_date_types() {
        for (input, oid, text) in [
            ("13:04:05", Oid::TIME, "13:04:05"),
            ("23:59:59.999999", Oid::TIME, "23:59:59.999999"),
            ("13:04:05-07", Oid::TIMETZ, "13:04:05-07:00"),
            ("00:00:00.5+05:30", Oid::TIMETZ, "00:00:00.5+05:30"),
            ("2024-03-05", Oid::DATE, "2024-03-05 00:00:00+00:00"),
            ("0044-03-15 BC", Oid::DATE, "0044-03-15 00:00:00+00:00 BC"),
        ] {
            let value = decode(&modern(), input.as_bytes(), oid).unwrap();
            let encoded = encode(&modern(), &value, oid).unwrap();
            assert_eq!(&encoded[..], text.as_bytes(), "{input}");
            assert_eq!(round_trip(&modern(), &value, oid), value, "{input}");
        }
    }

    #[test]
    fn test_unknown_oid_passes_through() {
        let value = Value::Bytes(Bytes::from_static(b"{\"a\": 1}"));
        assert_eq!(round_trip(&modern(), &value, Oid(3802)), value);
    }
}

// ============================================================================
// Timestamp Grammar
// ============================================================================

mod timestamp_grammar {
    use super::*;

    #[test]
    fn test_reference_literal() {
        let parsed = ParsedTimestamp::parse("2024-03-05 13:04:05.123456-07:30").unwrap();
        assert_eq!(parsed.year, 2024);
        assert_eq!(parsed.month, 3);
        assert_eq!(parsed.day, 5);
        assert_eq!(parsed.hour, 13);
        assert_eq!(parsed.minute, 4);
        assert_eq!(parsed.second, 5);
        assert_eq!(parsed.nanosecond, 123_456_000);
        assert_eq!(parsed.offset, -27_000);
    }

    #[test]
    fn test_bc_year() {
        assert_eq!(ParsedTimestamp::parse("0044-01-01 BC").unwrap().year, -44);
    }

    #[test]
    fn test_date_needs_space_before_suffix() {
        let err = decode(&modern(), b"2024-03-05+02:00:00", Oid::DATE).unwrap_err();
        assert!(matches!(err, CodecError::Syntax { position: 10, .. }));
        assert!(decode(&modern(), b"2024-03-05BC", Oid::DATE).is_err());
    }

    #[test]
    fn test_out_of_range_month_is_permissive() {
        let value = decode(&modern(), b"2024-13-05", Oid::DATE).unwrap();
        let Value::Timestamp(t) = value else {
            panic!("expected timestamp, got {value:?}");
        };
        let dt = t.datetime();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 1, 5));
    }

    #[test]
    fn test_hour_rolls_into_next_day() {
        let value = decode(&modern(), b"2024-03-05 25:00:00", Oid::TIMESTAMP).unwrap();
        let dt = NaiveDateTime::from_sql(&value).unwrap();
        assert_eq!((dt.day(), dt.hour()), (6, 1));
    }

    #[test]
    fn test_long_years() {
        let dt = decode(&modern(), b"12345-06-07", Oid::DATE).unwrap();
        assert_eq!(
            chrono::NaiveDate::from_sql(&dt).unwrap(),
            chrono::NaiveDate::from_ymd_opt(12345, 6, 7).unwrap()
        );
    }

    #[test]
    fn test_error_carries_position() {
        let err = decode(&modern(), b"2024-03-05 13:04:05x", Oid::TIMESTAMP).unwrap_err();
        match err {
            CodecError::Syntax {
                input, position, ..
            } => {
                assert_eq!(input, "2024-03-05 13:04:05x");
                assert_eq!(position, 19);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_message_names_substring() {
        let err = decode(&modern(), b"2024-ab-05", Oid::DATE).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'ab'"), "{message}");
        assert!(message.contains("position 5"), "{message}");
    }
}

// ============================================================================
// Zone Reconciliation
// ============================================================================

mod zone_reconciliation {
    use super::*;

    /// Central European zone with daylight saving from the last Sunday of
    /// March to the last Sunday of October (2024 dates hard-coded).
    #[derive(Debug)]
    struct Cet2024;

    impl Location for Cet2024 {
        fn name(&self) -> &str {
            "Europe/Paris"
        }

        fn offset_at(&self, utc: &NaiveDateTime) -> i32 {
            let start = chrono::NaiveDate::from_ymd_opt(2024, 3, 31)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap();
            let end = chrono::NaiveDate::from_ymd_opt(2024, 10, 27)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap();
            if *utc >= start && *utc < end { 7200 } else { 3600 }
        }
    }

    fn paris() -> ConnectionContext {
        modern().with_location(Arc::new(Cet2024))
    }

    fn zone_of(ctx: &ConnectionContext, input: &str) -> Option<String> {
        let value = decode(ctx, input.as_bytes(), Oid::TIMESTAMPTZ).unwrap();
        Timestamp::from_sql(&value)
            .unwrap()
            .zone_name()
            .map(str::to_owned)
    }

    #[test]
    fn test_winter_and_summer_offsets_match() {
        let ctx = paris();
        assert_eq!(zone_of(&ctx, "2024-01-10 12:00:00+01").as_deref(), Some("Europe/Paris"));
        assert_eq!(zone_of(&ctx, "2024-07-10 12:00:00+02").as_deref(), Some("Europe/Paris"));
    }

    #[test]
    fn test_disagreeing_offset_stays_numeric() {
        let ctx = paris();
        assert_eq!(zone_of(&ctx, "2024-07-10 12:00:00+01"), None);
        assert_eq!(zone_of(&ctx, "2024-01-10 12:00:00+00"), None);
    }

    #[test]
    fn test_no_location_means_no_zone() {
        assert_eq!(zone_of(&modern(), "2024-01-10 12:00:00+01"), None);
    }

    #[test]
    fn test_fixed_zone() {
        let ctx = modern().with_location(Arc::new(FixedZone::utc()));
        assert_eq!(zone_of(&ctx, "2024-01-10 12:00:00+00").as_deref(), Some("UTC"));
    }
}

// ============================================================================
// COPY Text
// ============================================================================

mod copy_text {
    use super::*;

    fn row(ctx: &ConnectionContext, values: &[Value]) -> BytesMut {
        let mut buf = BytesMut::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                buf.extend_from_slice(b"\t");
            }
            append_copy_text(ctx, &mut buf, value).unwrap();
        }
        buf.extend_from_slice(b"\n");
        buf
    }

    #[test]
    fn test_row() {
        let values = [
            Value::Int8(1),
            Value::from("a\tb\\c"),
            Value::Null,
            Value::Float8(2.5),
            Value::Bool(true),
            Value::Bytes(Bytes::from_static(b"\x01")),
        ];
        assert_eq!(&row(&modern(), &values)[..], b"1\ta\\tb\\\\c\t\\N\t2.5\ttrue\t\\x01\n");
    }

    #[test]
    fn test_null_is_two_bytes() {
        let mut buf = BytesMut::new();
        append_copy_text(&modern(), &mut buf, &Value::Null).unwrap();
        assert_eq!(&buf[..], b"\\N");
    }

    #[test]
    fn test_float_is_shortest_form() {
        let mut buf = BytesMut::new();
        append_copy_text(&modern(), &mut buf, &Value::Float8(0.1)).unwrap();
        assert_eq!(&buf[..], b"0.1");
    }

    #[test]
    fn test_bytes_use_legacy_escape_format() {
        let mut buf = BytesMut::new();
        append_copy_text(&legacy(), &mut buf, &Value::Bytes(Bytes::from_static(b"\n"))).unwrap();
        assert_eq!(&buf[..], b"\\012");
    }

    #[test]
    fn test_timestamp_matches_literal_form() {
        let value = decode(&modern(), b"2024-03-05 13:04:05.5+01", Oid::TIMESTAMPTZ).unwrap();
        let mut buf = BytesMut::new();
        append_copy_text(&modern(), &mut buf, &value).unwrap();
        assert_eq!(&buf[..], &encode(&modern(), &value, Oid::TIMESTAMPTZ).unwrap()[..]);
    }

    #[test]
    fn test_escape_reference() {
        assert_eq!(&copy::escape("a\tb\\c")[..], b"a\\tb\\\\c");
        let clean = "no specials";
        assert_eq!(&copy::escape(clean)[..], clean.as_bytes());
    }
}

// ============================================================================
// Faults
// ============================================================================

mod faults {
    use super::*;

    #[test]
    fn test_integer_garbage() {
        assert!(matches!(
            decode(&modern(), b"12x", Oid::INT8),
            Err(CodecError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_truncated_legacy_bytea() {
        assert!(matches!(
            decode(&modern(), b"abc\\12", Oid::BYTEA),
            Err(CodecError::InvalidBytea(_))
        ));
    }

    #[test]
    fn test_null_has_no_literal() {
        assert_eq!(
            encode(&modern(), &Value::Null, Oid::TEXT).unwrap_err(),
            CodecError::UnsupportedValue { kind: "null" }
        );
    }

    #[test]
    fn test_faults_are_repeatable() {
        let first = decode(&modern(), b"2024-03-05 13:04:05 AD", Oid::TIMESTAMP).unwrap_err();
        let second = decode(&modern(), b"2024-03-05 13:04:05 AD", Oid::TIMESTAMP).unwrap_err();
        assert_eq!(first, second);
    }
}

// ============================================================================
// Scan/Value Boundary
// ============================================================================

mod scan_boundary {
    use super::*;

    #[test]
    fn test_null_timestamp_from_decoded_column() {
        let value = decode(&modern(), b"2024-03-05 13:04:05+00", Oid::TIMESTAMPTZ).unwrap();
        let nt = NullTimestamp::from_sql(&value).unwrap();
        assert!(nt.valid());

        let text = encode(&modern(), &nt.to_sql().unwrap(), nt.pg_type()).unwrap();
        assert_eq!(&text[..], b"2024-03-05 13:04:05+00:00");
    }

    #[test]
    fn test_null_timestamp_swallows_mismatch() {
        let value = decode(&modern(), b"42", Oid::INT4).unwrap();
        let nt = NullTimestamp::from_sql(&value).unwrap();
        assert!(!nt.valid());
        assert_eq!(nt.to_sql().unwrap(), Value::Null);
    }

    #[test]
    fn test_bind_parameters() {
        let blob = vec![0u8, 1];
        let params: [&dyn ToSql; 3] = [&42i32, &"hello", &blob];
        let encoded: Vec<Bytes> = params
            .iter()
            .map(|p| encode(&modern(), &p.to_sql().unwrap(), p.pg_type()).unwrap())
            .collect();
        assert_eq!(&encoded[0][..], b"42");
        assert_eq!(&encoded[1][..], b"hello");
        assert_eq!(&encoded[2][..], b"\\x0001");
    }
}

// ============================================================================
// Concurrency
// ============================================================================

mod concurrency {
    use super::*;

    #[test]
    fn test_shared_context_across_threads() {
        let ctx = Arc::new(modern().with_location(Arc::new(FixedZone::utc())));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ctx = Arc::clone(&ctx);
                std::thread::spawn(move || {
                    let input = format!("2024-03-{:02} 00:00:00+00", i + 1);
                    let value = decode(&ctx, input.as_bytes(), Oid::TIMESTAMPTZ).unwrap();
                    let mut buf = BytesMut::new();
                    append_copy_text(&ctx, &mut buf, &value).unwrap();
                    buf
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let buf = handle.join().unwrap();
            let expected = format!("2024-03-{:02} 00:00:00+00:00", i + 1);
            assert_eq!(&buf[..], expected.as_bytes());
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

mod logging {
    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("pg_codec=trace"))
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_traced_paths_behave_the_same() {
        init_tracing();

        // decode failure, zone reconciliation and legacy bytea all emit events
        assert!(decode(&modern(), b"nope", Oid::INT4).is_err());
        let ctx = modern().with_location(Arc::new(FixedZone::utc()));
        assert!(decode(&ctx, b"2024-03-05 00:00:00+00", Oid::TIMESTAMPTZ).is_ok());
        assert_eq!(&bytea::encode(80400, b"a")[..], b"a");
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_bytea_round_trip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        for version in [80400, 90000, 160000] {
            let encoded = bytea::encode(version, &data);
            prop_assert_eq!(&bytea::decode(&encoded).unwrap()[..], &data[..]);
        }
    }

    #[test]
    fn prop_copy_escape_is_reversible(text in "[a-z\\\\\t\n\r]{0,64}") {
        let escaped = copy::escape(&text);
        prop_assert!(!escaped.iter().any(|&b| b == b'\t' || b == b'\n' || b == b'\r'));
        prop_assert_eq!(&copy::unescape(&escaped).unwrap()[..], text.as_bytes());
    }

    #[test]
    fn prop_int_round_trip(v in any::<i64>()) {
        let value = Value::Int8(v);
        prop_assert_eq!(round_trip(&modern(), &value, Oid::INT8), value);
    }

    #[test]
    fn prop_timestamp_text_is_stable(
        year in 1i32..9999,
        month in 1u32..=12,
        day in 1u32..=28,
        secs in 0u32..86_400,
        micros in 0u32..1_000_000,
        offset_minutes in -(15 * 60)..(15 * 60),
    ) {
        let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
        let dt = offset
            .with_ymd_and_hms(year, month, day, secs / 3600, secs / 60 % 60, secs % 60)
            .unwrap()
            .with_nanosecond(micros * 1000)
            .unwrap();
        let value = Value::from(dt);
        prop_assert_eq!(round_trip(&modern(), &value, Oid::TIMESTAMPTZ), value);
    }
}
