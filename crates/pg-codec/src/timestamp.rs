//! Date/time text parsing and formatting.
//!
//! The server renders `timestamp`, `timestamptz` and `date` values in the ISO
//! date style:
//!
//! ```text
//! YEAR-MM-DD[ HH:MM:SS[.FRAC][{+|-}HH[:MM[:SS]]]][ BC]
//! ```
//!
//! The year is variable width, the fraction holds up to nine significant
//! digits, and every other field is exactly two digits wide. Fraction and
//! offset only follow a time of day. Parsing is a single forward pass over
//! the bytes with a cursor, so every error carries the byte position where
//! the input stopped matching.
//!
//! Month and day are not range checked. Out-of-range values roll over into
//! the neighbouring month or year the same way calendar arithmetic does, so
//! `2024-13-05` is read as `2025-01-05`.

use std::fmt;
use std::sync::Arc;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
    Timelike, Utc,
};

use crate::context::Location;
use crate::error::CodecError;

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const MAX_FRACTION_DIGITS: usize = 9;

/// A decoded point in time.
///
/// Holds the instant with the numeric UTC offset it was written with. When a
/// `timestamptz` was decoded under a session time zone that agrees with that
/// offset, the zone's name is kept as well.
#[derive(Debug, Clone)]
pub struct Timestamp {
    datetime: DateTime<FixedOffset>,
    zone: Option<Arc<str>>,
}

impl Timestamp {
    /// Create a timestamp with a bare numeric offset.
    #[must_use]
    pub fn new(datetime: DateTime<FixedOffset>) -> Self {
        Self {
            datetime,
            zone: None,
        }
    }

    /// Tag the timestamp with a named time zone.
    #[must_use]
    pub fn with_zone(mut self, name: impl Into<Arc<str>>) -> Self {
        self.zone = Some(name.into());
        self
    }

    /// The instant and its offset.
    #[must_use]
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.datetime
    }

    /// Name of the session time zone, if reconciliation matched one.
    #[must_use]
    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Offset from UTC in seconds.
    #[must_use]
    pub fn offset_seconds(&self) -> i32 {
        self.datetime.offset().local_minus_utc()
    }

    /// The local time of day, as `time` text (`with_zone == false`) or
    /// `timetz` text with the numeric offset appended.
    #[must_use]
    pub fn clock(&self, with_zone: bool) -> Clock<'_> {
        Clock {
            timestamp: self,
            with_zone,
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.datetime == other.datetime
            && self.offset_seconds() == other.offset_seconds()
            && self.zone == other.zone
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Self::new(v)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(v: DateTime<Utc>) -> Self {
        Self::new(v.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(v: NaiveDateTime) -> Self {
        Self::new(v.and_utc().fixed_offset())
    }
}

/// Renders the text form the parser reads back, e.g.
/// `2024-03-05 13:04:05.123456-07:30` or `0044-03-15 00:00:00+00:00 BC`.
///
/// Trailing zeros of the fraction are dropped; a zero fraction is omitted.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.datetime.naive_local();
        let year = local.year();
        write!(
            f,
            "{:04}-{:02}-{:02} ",
            year.unsigned_abs(),
            local.month(),
            local.day()
        )?;
        write_clock(f, &local)?;
        write_offset(f, self.offset_seconds())?;
        if year < 0 {
            f.write_str(" BC")?;
        }
        Ok(())
    }
}

/// The time of day of a [`Timestamp`], as `time`/`timetz` text.
///
/// Created by [`Timestamp::clock`].
#[derive(Debug, Clone, Copy)]
pub struct Clock<'a> {
    timestamp: &'a Timestamp,
    with_zone: bool,
}

impl fmt::Display for Clock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_clock(f, &self.timestamp.datetime.naive_local())?;
        if self.with_zone {
            write_offset(f, self.timestamp.offset_seconds())?;
        }
        Ok(())
    }
}

/// `HH:MM:SS[.frac]` with trailing fraction zeros dropped.
fn write_clock(f: &mut fmt::Formatter<'_>, local: &NaiveDateTime) -> fmt::Result {
    let nanos = local.nanosecond();
    // chrono stores a leap second as nanos past the 59th second
    let second = local.second() + nanos / NANOS_PER_SECOND;
    write!(f, "{:02}:{:02}:{:02}", local.hour(), local.minute(), second)?;

    let mut fraction = nanos % NANOS_PER_SECOND;
    if fraction != 0 {
        let mut width = MAX_FRACTION_DIGITS;
        while fraction % 10 == 0 {
            fraction /= 10;
            width -= 1;
        }
        write!(f, ".{fraction:0width$}")?;
    }
    Ok(())
}

/// `±HH:MM[:SS]`
fn write_offset(f: &mut fmt::Formatter<'_>, offset: i32) -> fmt::Result {
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.unsigned_abs();
    write!(f, "{sign}{:02}:{:02}", offset / 3600, offset % 3600 / 60)?;
    if offset % 60 != 0 {
        write!(f, ":{:02}", offset % 60)?;
    }
    Ok(())
}

/// The raw fields of a date/time literal, before calendar normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedTimestamp {
    /// Year, negated for ` BC` dates.
    pub year: i32,
    /// Month as written; not range checked.
    pub month: u32,
    /// Day of month as written; not range checked.
    pub day: u32,
    /// Hour (0 if the literal has no time section).
    pub hour: u32,
    /// Minute.
    pub minute: u32,
    /// Second.
    pub second: u32,
    /// Fractional second scaled to nanoseconds.
    pub nanosecond: u32,
    /// UTC offset in seconds (0 if the literal has no offset).
    pub offset: i32,
}

impl ParsedTimestamp {
    /// Parse a `timestamp`, `timestamptz` or `date` literal.
    pub fn parse(input: &str) -> Result<Self, CodecError> {
        let mut cursor = Cursor::new(input);

        let year_start = cursor.pos;
        let year_digits = cursor.digit_run();
        if year_digits.is_empty() {
            return Err(cursor.error(year_start, "expected year"));
        }
        if year_digits.len() > 9 {
            return Err(CodecError::OutOfRange {
                value: input.to_owned(),
                reason: "year has too many digits",
            });
        }
        let year = year_digits
            .iter()
            .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'));

        cursor.expect(b'-')?;
        let month = cursor.fixed_digits(2)?;
        cursor.expect(b'-')?;
        let day = cursor.fixed_digits(2)?;

        let mut parsed = Self {
            year,
            month,
            day,
            ..Self::default()
        };

        // anything after the day starts with a space: the time or the era
        if let Some(b) = cursor.peek().filter(|&b| b != b' ') {
            return Err(cursor.error(
                cursor.pos,
                format!("expected ' ', got '{}'", b.escape_ascii()),
            ));
        }

        if cursor.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            cursor.expect(b' ')?;
            (parsed.hour, parsed.minute, parsed.second) = cursor.clock()?;
            if let Some(nanos) = cursor.fraction()? {
                parsed.nanosecond = nanos;
            }
            if let Some(offset) = cursor.offset()? {
                parsed.offset = offset;
            }
        }
        if cursor.rest().starts_with(b" BC") {
            cursor.pos += 3;
            parsed.year = -parsed.year;
        }
        cursor.finish()?;

        Ok(parsed)
    }

    /// Parse a `time` (`with_zone == false`) or `timetz` literal.
    ///
    /// `timetz` requires an offset; an hour-only offset such as `-07` means
    /// zero minutes. The date part is fixed at 0000-01-01.
    pub fn parse_clock(input: &str, with_zone: bool) -> Result<Self, CodecError> {
        let mut cursor = Cursor::new(input);
        let (hour, minute, second) = cursor.clock()?;
        let nanosecond = cursor.fraction()?.unwrap_or(0);

        let offset = if with_zone {
            let start = cursor.pos;
            cursor
                .offset()?
                .ok_or_else(|| cursor.error(start, "expected time zone offset"))?
        } else {
            0
        };
        cursor.finish()?;

        Ok(Self {
            year: 0,
            month: 1,
            day: 1,
            hour,
            minute,
            second,
            nanosecond,
            offset,
        })
    }

    /// Normalize the fields into a [`Timestamp`].
    ///
    /// Out-of-range months, days and hours carry into the next larger unit.
    pub fn to_timestamp(&self) -> Result<Timestamp, CodecError> {
        let out_of_range = |reason: &'static str| CodecError::OutOfRange {
            value: format!("{self:?}"),
            reason,
        };

        let months = i64::from(self.month) - 1;
        let year = i64::from(self.year) + months.div_euclid(12);
        let month = months.rem_euclid(12) + 1;

        let first_of_month = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month as u32, 1))
            .ok_or_else(|| out_of_range("date outside supported range"))?;

        let elapsed = TimeDelta::days(i64::from(self.day) - 1)
            + TimeDelta::seconds(
                i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second),
            )
            + TimeDelta::nanoseconds(i64::from(self.nanosecond));
        let local = first_of_month
            .and_time(NaiveTime::MIN)
            .checked_add_signed(elapsed)
            .ok_or_else(|| out_of_range("date outside supported range"))?;

        let offset = FixedOffset::east_opt(self.offset)
            .ok_or_else(|| out_of_range("time zone offset must be less than 24 hours"))?;
        let datetime = offset
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| out_of_range("date outside supported range"))?;

        Ok(Timestamp::new(datetime))
    }
}

/// Parse a `timestamp`/`timestamptz`/`date` literal into a [`Timestamp`].
///
/// With a `location`, the result is tagged with the location's name if the
/// location observes exactly the parsed offset at that instant. Otherwise the
/// bare numeric offset is kept.
pub fn parse_timestamp(location: Option<&dyn Location>, input: &str) -> Result<Timestamp, CodecError> {
    let parsed = ParsedTimestamp::parse(input)?;
    let timestamp = parsed.to_timestamp()?;

    let Some(location) = location else {
        return Ok(timestamp);
    };

    let observed = location.offset_at(&timestamp.datetime().naive_utc());
    if observed == parsed.offset {
        tracing::trace!(zone = location.name(), offset = observed, "timestamp matches session zone");
        Ok(timestamp.with_zone(location.name()))
    } else {
        tracing::trace!(
            zone = location.name(),
            observed,
            parsed = parsed.offset,
            "session zone disagrees with timestamp offset"
        );
        Ok(timestamp)
    }
}

/// Parse a `time` or `timetz` literal into a [`Timestamp`] on 0000-01-01.
pub fn parse_clock(input: &str, with_zone: bool) -> Result<Timestamp, CodecError> {
    ParsedTimestamp::parse_clock(input, with_zone)?.to_timestamp()
}

/// Byte cursor over a date/time literal.
struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, position: usize, message: impl Into<String>) -> CodecError {
        CodecError::syntax(self.input, position, message)
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn expect(&mut self, expected: u8) -> Result<(), CodecError> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(self.error(
                self.pos,
                format!("expected '{}', got '{}'", expected as char, b.escape_ascii()),
            )),
            None => Err(self.error(
                self.pos,
                format!("expected '{}', got end of input", expected as char),
            )),
        }
    }

    /// Consume exactly `width` ASCII digits.
    fn fixed_digits(&mut self, width: usize) -> Result<u32, CodecError> {
        let end = (self.pos + width).min(self.bytes.len());
        let field = &self.bytes[self.pos..end];
        if field.len() < width || !field.iter().all(u8::is_ascii_digit) {
            return Err(self.error(
                self.pos,
                format!("expected {width}-digit number, got '{}'", field.escape_ascii()),
            ));
        }
        self.pos = end;
        Ok(field.iter().fold(0, |acc, d| acc * 10 + u32::from(d - b'0')))
    }

    /// Consume a possibly empty run of ASCII digits.
    fn digit_run(&mut self) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    /// `HH:MM:SS`
    fn clock(&mut self) -> Result<(u32, u32, u32), CodecError> {
        let hour = self.fixed_digits(2)?;
        self.expect(b':')?;
        let minute = self.fixed_digits(2)?;
        self.expect(b':')?;
        let second = self.fixed_digits(2)?;
        Ok((hour, minute, second))
    }

    /// Optional `.FRAC`, scaled to nanoseconds.
    fn fraction(&mut self) -> Result<Option<u32>, CodecError> {
        if self.peek() != Some(b'.') {
            return Ok(None);
        }
        self.pos += 1;
        let start = self.pos;
        let digits = self.digit_run();
        if digits.is_empty() {
            return Err(self.error(start, "expected fractional seconds"));
        }

        // digits past the ninth are below nanosecond resolution
        let significant = &digits[..digits.len().min(MAX_FRACTION_DIGITS)];
        let value = significant
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
        let scale = 10u32.pow((MAX_FRACTION_DIGITS - significant.len()) as u32);
        Ok(Some(value * scale))
    }

    /// Optional `{+|-}HH[:MM[:SS]]`, as signed seconds.
    fn offset(&mut self) -> Result<Option<i32>, CodecError> {
        let sign = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(None),
        };
        self.pos += 1;

        let hours = self.fixed_digits(2)?;
        let mut minutes = 0;
        let mut seconds = 0;
        if self.peek() == Some(b':') {
            self.pos += 1;
            minutes = self.fixed_digits(2)?;
            if self.peek() == Some(b':') {
                self.pos += 1;
                seconds = self.fixed_digits(2)?;
            }
        }

        // at most 99 * 3600 + 99 * 60 + 99, well within i32
        let magnitude = (hours * 3600 + minutes * 60 + seconds) as i32;
        Ok(Some(sign * magnitude))
    }

    fn finish(&self) -> Result<(), CodecError> {
        if self.pos < self.bytes.len() {
            return Err(self.error(
                self.pos,
                format!("expected end of input, got '{}'", self.rest().escape_ascii()),
            ));
        }
        Ok(())
    }
}
