use thiserror::Error;

use crate::time::DayKey;

#[derive(Error, Debug)]
pub enum JovianError {
    #[error("Interval must be at least 1 minute, got {0} minute(s)")]
    InvalidInterval(i64),

    #[error("Duration ({duration_s} s) must be at least as long as the interval ({interval_s} s)")]
    DurationShorterThanInterval { duration_s: f64, interval_s: f64 },

    #[error("Invalid duration '{0}': expected hours or a span such as 720h, 90m or 1h30m")]
    InvalidDuration(String),

    #[error("Duration of {days} days exceeds the {max} day limit")]
    DurationTooLong { days: f64, max: f64 },

    #[error("Both latitude and longitude, or neither, must be supplied")]
    IncompleteCoordinates,

    #[error("Invalid observer coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Only one of --local-time and --utc-offset may be given")]
    ConflictingTimeZones,

    #[error("Invalid start time '{0}': expected RFC 3339 (e.g. 2024-03-01T00:00:00Z)")]
    InvalidStartTime(String),

    #[error("Invalid day key '{0}': expected YYYY-MM-DD")]
    InvalidDayKey(String),

    #[error("Invalid UTC offset '{0}': expected ±HH:MM")]
    InvalidUtcOffset(String),

    #[error("The name '{0}' is not a valid radio source")]
    InvalidRadioSource(String),

    #[error("Jupiter is circumpolar or never rises for this location on {day}")]
    Circumpolar { day: DayKey },

    #[error("No Jupiter position cached for {day}")]
    MissingDayPosition { day: DayKey },

    #[error("Jupiter is not visible on {day} at {seconds} s after midnight UTC")]
    NotVisible { day: DayKey, seconds: f64 },

    #[error("No transit case matched on {day} at {seconds} s after midnight UTC")]
    UnreachableTransitCase { day: DayKey, seconds: f64 },

    #[error("Time computation error: {0}")]
    Time(#[from] hifitime::HifitimeError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unable to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl PartialEq for JovianError {
    fn eq(&self, other: &Self) -> bool {
        use JovianError::*;
        match (self, other) {
            (InvalidInterval(a), InvalidInterval(b)) => a == b,
            (
                DurationShorterThanInterval {
                    duration_s: a,
                    interval_s: b,
                },
                DurationShorterThanInterval {
                    duration_s: c,
                    interval_s: d,
                },
            ) => a == c && b == d,
            (InvalidDuration(a), InvalidDuration(b)) => a == b,
            (
                DurationTooLong { days: a, max: b },
                DurationTooLong { days: c, max: d },
            ) => a == c && b == d,
            (InvalidCoordinate(a), InvalidCoordinate(b)) => a == b,
            (InvalidDayKey(a), InvalidDayKey(b)) => a == b,
            (InvalidStartTime(a), InvalidStartTime(b)) => a == b,
            (InvalidUtcOffset(a), InvalidUtcOffset(b)) => a == b,
            (InvalidRadioSource(a), InvalidRadioSource(b)) => a == b,
            (Circumpolar { day: a }, Circumpolar { day: b }) => a == b,
            (MissingDayPosition { day: a }, MissingDayPosition { day: b }) => a == b,
            (
                NotVisible { day: a, seconds: s },
                NotVisible { day: b, seconds: t },
            ) => a == b && s == t,
            (
                UnreachableTransitCase { day: a, seconds: s },
                UnreachableTransitCase { day: b, seconds: t },
            ) => a == b && s == t,

            // not comparable: same variant is enough
            (Time(_), Time(_)) => true,
            (Json(_), Json(_)) => true,
            (Io(_), Io(_)) => true,

            (IncompleteCoordinates, IncompleteCoordinates) => true,
            (ConflictingTimeZones, ConflictingTimeZones) => true,

            _ => false,
        }
    }
}
