use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// Minutes in one day
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Error for malformed wall-clock strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time '{0}', expected HH:MM")]
pub struct TimeParseError(pub String);

/// Parse a strict "HH:MM" wall-clock time (00:00 to 23:59)
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeParseError> {
    let trimmed = s.trim();
    let (h, m) = trimmed
        .split_once(':')
        .ok_or_else(|| TimeParseError(s.to_string()))?;

    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(TimeParseError(s.to_string()));
    }

    let hour: u32 = h.parse().map_err(|_| TimeParseError(s.to_string()))?;
    let minute: u32 = m.parse().map_err(|_| TimeParseError(s.to_string()))?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeParseError(s.to_string()))
}

/// Format a time as zero-padded "HH:MM"
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Minutes since midnight
pub fn minutes_of_day(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Build a wall-clock time from minutes since midnight, wrapping around the day
pub fn time_from_minutes(minutes: i32) -> NaiveTime {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY) as u32;
    NaiveTime::from_hms_opt(wrapped / 60, wrapped % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Length of a start..end window in minutes; an end before the start means the next day
pub fn span_minutes(start: NaiveTime, end: NaiveTime) -> i32 {
    let diff = minutes_of_day(end) - minutes_of_day(start);
    if diff < 0 {
        diff + MINUTES_PER_DAY
    } else {
        diff
    }
}

/// Format a span as "2hr 15m", "2hr" or "45m"
pub fn format_span(minutes: i32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours > 0 && mins > 0 {
        format!("{}hr {}m", hours, mins)
    } else if hours > 0 {
        format!("{}hr", hours)
    } else {
        format!("{}m", mins)
    }
}

/// Serde adapter storing `NaiveTime` as "HH:MM"
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}
