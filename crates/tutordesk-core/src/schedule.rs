//! Recurring weekly schedule model.
//!
//! A student's weekly commitments are a set of [`WeeklySlot`]s, each pairing
//! a day of week with a wall-clock time. Days are numbered 0 = Sunday
//! through 6 = Saturday throughout the data model, independent of any
//! display ordering.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One recurring weekly commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySlot {
    pub day: u8, // 0=Sun ... 6=Sat
    pub time: String, // HH:MM
}

impl WeeklySlot {
    pub fn new(day: u8, time: impl Into<String>) -> Self {
        Self {
            day,
            time: time.into(),
        }
    }
}

/// Parse a canonical `HH:MM` time-of-day string.
///
/// Accepts exactly two colon-separated two-digit fields with hours in
/// 0..=23 and minutes in 0..=59. Unpadded hours (`"9:05"`) and sign
/// prefixes are rejected; stored times are always canonical.
pub fn parse_hhmm(time: &str) -> Option<(u32, u32)> {
    let (h, m) = time.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Day-of-week of a calendar date under the 0 = Sunday convention.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Serde shim for timestamps written by older releases, which stored
/// creation times as Unix milliseconds rather than RFC 3339 text.
pub(crate) mod datetime_compat {
    use chrono::{DateTime, Local, TimeZone};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Local
                .timestamp_millis_opt(ms)
                .earliest()
                .ok_or_else(|| Error::custom(format!("timestamp {ms} out of range"))),
            Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Local))
                .map_err(Error::custom),
        }
    }
}
