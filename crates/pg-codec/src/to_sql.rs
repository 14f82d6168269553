//! Trait for converting Rust types to codec values.

use crate::error::CodecError;
use crate::oid::Oid;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// Trait for types that can be bound as query parameters.
///
/// The execution layer calls [`ToSql::to_sql`] to obtain the [`Value`] and
/// [`ToSql::pg_type`] for the OID to declare, then encodes the value with
/// [`crate::encode::encode`].
pub trait ToSql {
    /// Convert this value to a codec value.
    fn to_sql(&self) -> Result<Value, CodecError>;

    /// The parameter type to declare for this value.
    fn pg_type(&self) -> Oid;
}

impl ToSql for bool {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Bool(*self))
    }

    fn pg_type(&self) -> Oid {
        Oid::BOOL
    }
}

impl ToSql for i16 {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Int8(i64::from(*self)))
    }

    fn pg_type(&self) -> Oid {
        Oid::INT2
    }
}

impl ToSql for i32 {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Int8(i64::from(*self)))
    }

    fn pg_type(&self) -> Oid {
        Oid::INT4
    }
}

impl ToSql for i64 {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Int8(*self))
    }

    fn pg_type(&self) -> Oid {
        Oid::INT8
    }
}

impl ToSql for f32 {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Float4(*self))
    }

    fn pg_type(&self) -> Oid {
        Oid::FLOAT4
    }
}

impl ToSql for f64 {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Float8(*self))
    }

    fn pg_type(&self) -> Oid {
        Oid::FLOAT8
    }
}

impl ToSql for str {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Text(self.to_owned()))
    }

    fn pg_type(&self) -> Oid {
        Oid::TEXT
    }
}

impl ToSql for String {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Text(self.clone()))
    }

    fn pg_type(&self) -> Oid {
        Oid::TEXT
    }
}

impl ToSql for [u8] {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Bytes(bytes::Bytes::copy_from_slice(self)))
    }

    fn pg_type(&self) -> Oid {
        Oid::BYTEA
    }
}

impl ToSql for Vec<u8> {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Bytes(bytes::Bytes::copy_from_slice(self)))
    }

    fn pg_type(&self) -> Oid {
        Oid::BYTEA
    }
}

impl ToSql for bytes::Bytes {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Bytes(self.clone()))
    }

    fn pg_type(&self) -> Oid {
        Oid::BYTEA
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Timestamp(self.clone()))
    }

    fn pg_type(&self) -> Oid {
        Oid::TIMESTAMPTZ
    }
}

impl ToSql for chrono::DateTime<chrono::FixedOffset> {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Timestamp(Timestamp::new(*self)))
    }

    fn pg_type(&self) -> Oid {
        Oid::TIMESTAMPTZ
    }
}

impl ToSql for chrono::DateTime<chrono::Utc> {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Timestamp(Timestamp::from(*self)))
    }

    fn pg_type(&self) -> Oid {
        Oid::TIMESTAMPTZ
    }
}

impl ToSql for chrono::NaiveDateTime {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Timestamp(Timestamp::from(*self)))
    }

    fn pg_type(&self) -> Oid {
        Oid::TIMESTAMP
    }
}

impl ToSql for chrono::NaiveDate {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(Value::Timestamp(Timestamp::from(
            self.and_time(chrono::NaiveTime::MIN),
        )))
    }

    fn pg_type(&self) -> Oid {
        Oid::DATE
    }
}

impl<T: ToSql> ToSql for Option<T> {
    fn to_sql(&self) -> Result<Value, CodecError> {
        match self {
            Some(v) => v.to_sql(),
            None => Ok(Value::Null),
        }
    }

    fn pg_type(&self) -> Oid {
        match self {
            Some(v) => v.pg_type(),
            // unknown: let the server infer the parameter type
            None => Oid(0),
        }
    }
}

impl<T: ToSql + ?Sized> ToSql for &T {
    fn to_sql(&self) -> Result<Value, CodecError> {
        (*self).to_sql()
    }

    fn pg_type(&self) -> Oid {
        (*self).pg_type()
    }
}
