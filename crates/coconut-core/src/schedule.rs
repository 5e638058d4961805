//! # Cutoff Times
//!
//! Parsing and display of the daily cutoff used by zone rules.
//!
//! Cutoffs are entered and stored as 24-hour `HH:MM` strings, exactly as the
//! admin form's time input produces them, and held as [`NaiveTime`] in memory.

use chrono::{NaiveTime, Timelike};

use crate::error::ValidationError;

/// Storage and wire format for cutoff times.
pub const CUTOFF_FORMAT: &str = "%H:%M";

/// Parses a `HH:MM` cutoff time.
///
/// ## Example
/// ```rust
/// use coconut_core::schedule::parse_cutoff;
///
/// assert_eq!(parse_cutoff("14:00").unwrap().to_string(), "14:00:00");
/// assert!(parse_cutoff("2pm").is_err());
/// assert!(parse_cutoff("").is_err());
/// ```
pub fn parse_cutoff(input: &str) -> Result<NaiveTime, ValidationError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "cutoff_time".to_string(),
        });
    }

    NaiveTime::parse_from_str(input, CUTOFF_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field: "cutoff_time".to_string(),
        reason: "must be a 24-hour time like 14:00".to_string(),
    })
}

/// Formats a cutoff back to `HH:MM`.
pub fn format_cutoff(time: NaiveTime) -> String {
    time.format(CUTOFF_FORMAT).to_string()
}

/// Formats a cutoff for display as a 12-hour clock time.
///
/// ```rust
/// use chrono::NaiveTime;
/// use coconut_core::schedule::format_cutoff_12h;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// assert_eq!(format_cutoff_12h(t(14, 0)), "2:00 PM");
/// assert_eq!(format_cutoff_12h(t(0, 30)), "12:30 AM");
/// assert_eq!(format_cutoff_12h(t(12, 5)), "12:05 PM");
/// ```
pub fn format_cutoff_12h(time: NaiveTime) -> String {
    let hour = time.hour();
    let ampm = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, time.minute(), ampm)
}

/// Serde adapter that reads and writes cutoffs as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_cutoff(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_cutoff(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cutoff() {
        let t = parse_cutoff("09:15").unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 15));

        assert!(parse_cutoff(" 23:59 ").is_ok());
        assert!(parse_cutoff("24:00").is_err());
        assert!(parse_cutoff("14:60").is_err());
        assert!(parse_cutoff("14").is_err());
    }

    #[test]
    fn test_parse_cutoff_empty_is_required() {
        assert_eq!(
            parse_cutoff("   "),
            Err(ValidationError::Required {
                field: "cutoff_time".to_string()
            })
        );
    }

    #[test]
    fn test_format_cutoff_roundtrip() {
        let t = parse_cutoff("07:05").unwrap();
        assert_eq!(format_cutoff(t), "07:05");
    }

    #[test]
    fn test_format_cutoff_12h_morning() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(format_cutoff_12h(t), "9:00 AM");
    }
}
