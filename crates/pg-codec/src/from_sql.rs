//! Trait for converting from codec values to Rust types.

use crate::error::CodecError;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// Trait for types that can be converted from decoded column values.
///
/// This trait is implemented for common Rust types to enable
/// type-safe extraction of values from query results.
pub trait FromSql: Sized {
    /// Convert from a codec value to this type.
    fn from_sql(value: &Value) -> Result<Self, CodecError>;

    /// Convert from an optional value.
    ///
    /// Returns `None` if the value is NULL.
    fn from_sql_nullable(value: &Value) -> Result<Option<Self>, CodecError> {
        if value.is_null() {
            Ok(None)
        } else {
            Self::from_sql(value).map(Some)
        }
    }
}

fn mismatch(expected: &'static str, value: &Value) -> CodecError {
    match value {
        Value::Null => CodecError::UnexpectedNull,
        _ => CodecError::TypeMismatch {
            expected,
            actual: value.kind(),
        },
    }
}

impl FromSql for bool {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromSql for i16 {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        let v = i64::from_sql(value)?;
        i16::try_from(v).map_err(|_| CodecError::OutOfRange {
            value: v.to_string(),
            reason: "does not fit in i16",
        })
    }
}

impl FromSql for i32 {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        let v = i64::from_sql(value)?;
        i32::try_from(v).map_err(|_| CodecError::OutOfRange {
            value: v.to_string(),
            reason: "does not fit in i32",
        })
    }
}

impl FromSql for i64 {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        value.as_i64().ok_or_else(|| mismatch("i64", value))
    }
}

impl FromSql for f32 {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Float4(v) => Ok(*v),
            _ => Err(mismatch("f32", value)),
        }
    }
}

impl FromSql for f64 {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        value.as_f64().ok_or_else(|| mismatch("f64", value))
    }
}

impl FromSql for String {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            // text-like columns arrive undecoded
            Value::Bytes(b) => String::from_utf8(b.to_vec()).map_err(|_| CodecError::InvalidUtf8),
            _ => Err(mismatch("String", value)),
        }
    }
}

impl FromSql for Vec<u8> {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch("Vec<u8>", value))
    }
}

impl FromSql for bytes::Bytes {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            _ => Err(mismatch("Bytes", value)),
        }
    }
}

impl FromSql for Timestamp {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        value
            .as_timestamp()
            .cloned()
            .ok_or_else(|| mismatch("Timestamp", value))
    }
}

impl FromSql for chrono::DateTime<chrono::FixedOffset> {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        Timestamp::from_sql(value).map(|t| t.datetime())
    }
}

impl FromSql for chrono::DateTime<chrono::Utc> {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        Timestamp::from_sql(value).map(|t| t.datetime().to_utc())
    }
}

impl FromSql for chrono::NaiveDateTime {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        Timestamp::from_sql(value).map(|t| t.datetime().naive_local())
    }
}

impl FromSql for chrono::NaiveDate {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        Timestamp::from_sql(value).map(|t| t.datetime().date_naive())
    }
}

impl<T: FromSql> FromSql for Option<T> {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        T::from_sql_nullable(value)
    }
}
