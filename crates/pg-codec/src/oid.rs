//! PostgreSQL type identifiers.
//!
//! Only the OIDs the codec dispatches on are named here. Any other OID is
//! still a valid [`Oid`]; values of such types decode as raw bytes.

use std::fmt;

/// A PostgreSQL type OID, as carried in row descriptions and parameter
/// descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(pub u32);

impl Oid {
    /// `bool`
    pub const BOOL: Oid = Oid(16);
    /// `bytea`
    pub const BYTEA: Oid = Oid(17);
    /// `int8` / `bigint`
    pub const INT8: Oid = Oid(20);
    /// `int2` / `smallint`
    pub const INT2: Oid = Oid(21);
    /// `int4` / `integer`
    pub const INT4: Oid = Oid(23);
    /// `text`
    pub const TEXT: Oid = Oid(25);
    /// `float4` / `real`
    pub const FLOAT4: Oid = Oid(700);
    /// `float8` / `double precision`
    pub const FLOAT8: Oid = Oid(701);
    /// `varchar`
    pub const VARCHAR: Oid = Oid(1043);
    /// `date`
    pub const DATE: Oid = Oid(1082);
    /// `time` (without time zone)
    pub const TIME: Oid = Oid(1083);
    /// `timestamp` (without time zone)
    pub const TIMESTAMP: Oid = Oid(1114);
    /// `timestamptz`
    pub const TIMESTAMPTZ: Oid = Oid(1184);
    /// `timetz`
    pub const TIMETZ: Oid = Oid(1266);

    /// The raw numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// SQL name of the type, if the codec knows it.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::BOOL => "bool",
            Self::BYTEA => "bytea",
            Self::INT8 => "int8",
            Self::INT2 => "int2",
            Self::INT4 => "int4",
            Self::TEXT => "text",
            Self::FLOAT4 => "float4",
            Self::FLOAT8 => "float8",
            Self::VARCHAR => "varchar",
            Self::DATE => "date",
            Self::TIME => "time",
            Self::TIMESTAMP => "timestamp",
            Self::TIMESTAMPTZ => "timestamptz",
            Self::TIMETZ => "timetz",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u32> for Oid {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<Oid> for u32 {
    fn from(v: Oid) -> Self {
        v.0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "oid {}", self.0),
        }
    }
}
