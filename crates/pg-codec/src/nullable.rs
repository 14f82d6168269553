//! Nullable timestamp scan target.

use crate::error::CodecError;
use crate::from_sql::FromSql;
use crate::oid::Oid;
use crate::timestamp::Timestamp;
use crate::to_sql::ToSql;
use crate::value::Value;

/// A [`Timestamp`] that may be NULL.
///
/// Scanning never fails: any value that is not a timestamp, NULL included,
/// leaves it invalid. Binding an invalid `NullTimestamp` sends NULL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NullTimestamp {
    timestamp: Option<Timestamp>,
}

impl NullTimestamp {
    /// A valid timestamp.
    #[must_use]
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: Some(timestamp),
        }
    }

    /// An invalid (NULL) timestamp.
    #[must_use]
    pub fn null() -> Self {
        Self::default()
    }

    /// Whether a non-NULL timestamp is held.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.timestamp.is_some()
    }

    /// The timestamp if valid.
    #[must_use]
    pub fn get(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    /// Take the timestamp out.
    #[must_use]
    pub fn into_inner(self) -> Option<Timestamp> {
        self.timestamp
    }
}

impl FromSql for NullTimestamp {
    fn from_sql(value: &Value) -> Result<Self, CodecError> {
        Ok(match value {
            Value::Timestamp(t) => Self::new(t.clone()),
            _ => Self::null(),
        })
    }

    fn from_sql_nullable(value: &Value) -> Result<Option<Self>, CodecError> {
        Self::from_sql(value).map(Some)
    }
}

impl ToSql for NullTimestamp {
    fn to_sql(&self) -> Result<Value, CodecError> {
        Ok(match self.get() {
            Some(t) => Value::Timestamp(t.clone()),
            None => Value::Null,
        })
    }

    fn pg_type(&self) -> Oid {
        Oid::TIMESTAMPTZ
    }
}

impl From<Option<Timestamp>> for NullTimestamp {
    fn from(timestamp: Option<Timestamp>) -> Self {
        Self { timestamp }
    }
}

impl From<NullTimestamp> for Option<Timestamp> {
    fn from(v: NullTimestamp) -> Self {
        v.timestamp
    }
}
