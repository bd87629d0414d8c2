//! String transforms used as the fallback coercion path of the accessors.
//!
//! Each transform is a pure `fn(&str) -> Option<T>`: malformed input yields
//! `None`, never an error.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A string-parsing fallback from the raw stored string to the target type.
pub type Transform<T> = fn(&str) -> Option<T>;

/// Transport date layout: UTC with millisecond precision.
pub const TRANSPORT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parse a UUID in its canonical hyphenated form.
///
/// Simple, braced and URN forms are rejected.
pub fn parse_uuid(s: &str) -> Option<Uuid> {
    if s.len() != 36 {
        return None;
    }
    Uuid::parse_str(s).ok()
}

/// Parse a transport-format date.
///
/// Falls back to RFC 3339 (any fractional precision, any offset), normalized
/// to UTC.
pub fn parse_transport_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, TRANSPORT_DATE_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Serialize a date in the transport format.
pub fn format_transport_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an event identifier token.
pub fn parse_event_id(s: &str) -> Option<EventId> {
    s.parse().ok()
}

fn event_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9a-fA-F]{1,16})\.([0-9a-fA-F]{1,16})$")
            .unwrap_or_else(|e| panic!("event id pattern is invalid: {}", e))
    })
}

/// Identifier of a protocol event: a `major.minor` pair of 64-bit values
/// written in hexadecimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId {
    pub major: u64,
    pub minor: u64,
}

impl EventId {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}.{:016x}", self.major, self.minor)
    }
}

/// Error parsing an [`EventId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventIdError {
    pub input: String,
}

impl fmt::Display for ParseEventIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid event identifier: {:?}", self.input)
    }
}

impl std::error::Error for ParseEventIdError {}

impl FromStr for EventId {
    type Err = ParseEventIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseEventIdError {
            input: s.to_string(),
        };
        let caps = event_id_pattern().captures(s).ok_or_else(invalid)?;
        let major = u64::from_str_radix(&caps[1], 16).map_err(|_| invalid())?;
        let minor = u64::from_str_radix(&caps[2], 16).map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for EventId {
    type Error = ParseEventIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventId> for String {
    fn from(value: EventId) -> Self {
        value.to_string()
    }
}
