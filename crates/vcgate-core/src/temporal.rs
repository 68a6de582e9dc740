//! # Temporal Types: UTC Timestamps and Clocks
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to whole seconds, and
//! the `Clock` trait that supplies the "current time" reference credentials
//! are checked against.
//!
//! ## Accepted Lexical Shape
//!
//! Credential validity windows arrive as `YYYY-MM-DDTHH:MM:SS.sssZ`, the
//! form emitted by JavaScript's `Date.prototype.toISOString()`. The parser
//! accepts exactly that shape, with the fraction optional and 1 to 9 digits
//! long. Offsets other than `Z`, lowercase separators, missing fields, and
//! out-of-range calendar values are rejected; there is no lenient fallback.
//!
//! ## Comparison Granularity
//!
//! Fractional seconds are informational. They are validated and then
//! discarded (truncated toward the start of the second), so every
//! comparison against the clock happens at whole-second granularity.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a credential timestamp of the form `YYYY-MM-DDTHH:MM:SS[.f]Z`.
    ///
    /// # Errors
    ///
    /// Returns `TimestampError::Malformed` on any deviation from the shape
    /// or on out-of-range month, day, hour, minute, or second values.
    pub fn parse_vc(s: &str) -> Result<Self, TimestampError> {
        let b = s.as_bytes();
        if b.len() < 20 {
            return Err(TimestampError::malformed(s, "too short"));
        }
        if b[4] != b'-' || b[7] != b'-' {
            return Err(TimestampError::malformed(s, "expected '-' date separators"));
        }
        if b[10] != b'T' {
            return Err(TimestampError::malformed(s, "expected 'T' between date and time"));
        }
        if b[13] != b':' || b[16] != b':' {
            return Err(TimestampError::malformed(s, "expected ':' time separators"));
        }

        let year = digits(s, 0, 4)?;
        let month = digits(s, 5, 2)?;
        let day = digits(s, 8, 2)?;
        let hour = digits(s, 11, 2)?;
        let minute = digits(s, 14, 2)?;
        let second = digits(s, 17, 2)?;

        let rest = &b[19..];
        let zone = match rest.split_first() {
            Some((&b'.', frac)) => {
                let n = frac.iter().take_while(|c| c.is_ascii_digit()).count();
                if n == 0 || n > 9 {
                    return Err(TimestampError::malformed(s, "fraction must have 1 to 9 digits"));
                }
                &frac[n..]
            }
            _ => rest,
        };
        if zone != b"Z" {
            return Err(TimestampError::malformed(s, "expected 'Z' (UTC) suffix"));
        }

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| TimestampError::malformed(s, "date out of range"))?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| TimestampError::malformed(s, "time out of range"))?;
        Ok(Self(NaiveDateTime::new(date, time).and_utc()))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| TimestampError::malformed(&secs.to_string(), "epoch seconds out of range"))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render in the issuer ecosystem's form, e.g. `2026-01-15T12:00:00.000Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_vc(s)
    }
}

fn digits(s: &str, start: usize, len: usize) -> Result<u32, TimestampError> {
    let field = &s.as_bytes()[start..start + len];
    if !field.iter().all(u8::is_ascii_digit) {
        return Err(TimestampError::malformed(s, "expected digits"));
    }
    Ok(field.iter().fold(0, |acc, d| acc * 10 + u32::from(d - b'0')))
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Source of the current time for validity-window checks.
///
/// Implementations must not move backwards between calls made against the
/// same verifier.
pub trait Clock {
    /// The current time, truncated to whole seconds.
    fn now(&self) -> Timestamp;
}

/// The host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
