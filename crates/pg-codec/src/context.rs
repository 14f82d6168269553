//! Per-connection codec context.
//!
//! The connection layer builds a [`ConnectionContext`] once the server's
//! parameter statuses are known and hands a shared reference to every codec
//! call. The codec never mutates it.

use std::fmt;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, Offset};

use crate::error::CodecError;

/// First server version that understands hex-format `bytea` input.
pub const HEX_BYTEA_MIN_VERSION: i32 = 90000;

/// A time zone the codec can re-express decoded timestamps in.
///
/// This is the seam to a time zone database. The codec only needs to know
/// which UTC offset a zone observes at a given instant, so implementations
/// can be backed by a real database or by a fixed table in tests.
pub trait Location: fmt::Debug + Send + Sync {
    /// Zone name, as it would appear in the session `TimeZone` setting.
    fn name(&self) -> &str;

    /// Offset from UTC in seconds observed by this zone at the UTC instant.
    fn offset_at(&self, utc: &NaiveDateTime) -> i32;
}

/// A named zone with a constant UTC offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedZone {
    name: String,
    offset: FixedOffset,
}

impl FixedZone {
    /// Create a named zone with the given constant offset.
    pub fn new(name: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// The UTC zone.
    #[must_use]
    pub fn utc() -> Self {
        Self::new("UTC", chrono::Utc.fix())
    }
}

impl Location for FixedZone {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset_at(&self, _utc: &NaiveDateTime) -> i32 {
        self.offset.local_minus_utc()
    }
}

/// Read-only snapshot of the connection state the codec depends on.
///
/// Cloning is cheap; the location is shared behind an [`Arc`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionContext {
    /// Server version as an integer (`90603` for 9.6.3, `140002` for 14.2).
    pub server_version: i32,
    /// Session time zone used to re-express `timestamptz` values.
    pub current_location: Option<Arc<dyn Location>>,
}

impl ConnectionContext {
    /// Create a context for a server of the given numeric version.
    #[must_use]
    pub fn new(server_version: i32) -> Self {
        Self {
            server_version,
            current_location: None,
        }
    }

    /// Build a context from the server's `server_version` parameter status.
    pub fn from_parameter_status(server_version: &str) -> Result<Self, CodecError> {
        let version = parse_server_version(server_version)?;
        tracing::debug!(server_version, version, "codec context from parameter status");
        Ok(Self::new(version))
    }

    /// Set the session time zone.
    #[must_use]
    pub fn with_location(mut self, location: Arc<dyn Location>) -> Self {
        self.current_location = Some(location);
        self
    }

    /// Set the numeric server version.
    #[must_use]
    pub fn server_version(mut self, version: i32) -> Self {
        self.server_version = version;
        self
    }

    /// Whether the server accepts hex-format `bytea` input.
    #[must_use]
    pub fn supports_hex_bytea(&self) -> bool {
        self.server_version >= HEX_BYTEA_MIN_VERSION
    }

    /// The session time zone, if one is configured.
    #[must_use]
    pub fn location(&self) -> Option<&dyn Location> {
        self.current_location.as_deref()
    }
}

/// Parse a `server_version` string into its numeric form.
///
/// Pre-10 servers use three components (`9.6.3` → `90603`); from 10 on the
/// second component is the minor release (`14.2` → `140002`). Anything after
/// the leading numeric components (`beta1`, ` (Debian ...)`) is ignored.
pub fn parse_server_version(version: &str) -> Result<i32, CodecError> {
    let mut parts = [0u16; 3];
    let mut count = 0;

    for component in version.split('.') {
        let digits_end = component
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(component.len());
        if digits_end == 0 {
            break;
        }
        parts[count] = component[..digits_end].parse().map_err(
            |e: std::num::ParseIntError| CodecError::InvalidNumber {
                value: version.to_owned(),
                reason: e.to_string(),
            },
        )?;
        count += 1;
        if digits_end < component.len() || count == parts.len() {
            break;
        }
    }

    if count == 0 {
        return Err(CodecError::InvalidNumber {
            value: version.to_owned(),
            reason: "no version number".to_owned(),
        });
    }

    let [major, minor, patch] = parts.map(i32::from);
    if major >= 10 {
        Ok(major * 10000 + minor)
    } else {
        Ok(major * 10000 + minor * 100 + patch)
    }
}
