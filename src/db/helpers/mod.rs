use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer};

const DAY_FORMAT: &str = "%Y-%m-%d";
const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse_day(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT)
        .with_context(|| format!("failed to parse {field} '{value}' (expected YYYY-MM-DD)"))
}

/// Parses a local wall-clock instant such as `2026-03-10T09:00`.
/// Seconds are optional; a space is accepted in place of the `T`.
pub fn parse_wall_clock(value: &str, field: &str) -> Result<NaiveDateTime> {
    let normalized = value.trim().replacen(' ', "T", 1);
    NaiveDateTime::parse_from_str(&normalized, SECOND_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, MINUTE_FORMAT))
        .with_context(|| {
            format!("failed to parse {field} '{value}' (expected YYYY-MM-DDTHH:MM)")
        })
}

pub fn format_wall_clock(value: &NaiveDateTime) -> String {
    if value.second() == 0 && value.nanosecond() == 0 {
        value.format(MINUTE_FORMAT).to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Serde adapter for campaign instants stored as minute-precision text.
pub mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_wall_clock(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_wall_clock(&raw, "instant").map_err(|err| D::Error::custom(format!("{err:#}")))
    }
}

/// `isDeleted` is only ever true when stored as literal `true`; absent or
/// `null` reads as visible.
pub fn deleted_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_accepts_minutes_and_seconds() {
        let minutes = parse_wall_clock("2026-03-10T09:00", "start").unwrap();
        let seconds = parse_wall_clock("2026-03-10T09:00:00", "start").unwrap();
        let spaced = parse_wall_clock("2026-03-10 09:00", "start").unwrap();
        assert_eq!(minutes, seconds);
        assert_eq!(minutes, spaced);
        assert_eq!(format_wall_clock(&minutes), "2026-03-10T09:00");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_wall_clock("10/03/2026 09:00", "start").is_err());
        assert!(parse_day("2026-13-01", "date").is_err());
        assert_eq!(
            parse_day(" 2026-03-10 ", "date").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
    }
}
