//! # Time handling
//!
//! Conversions between civil instants ([`hifitime::Epoch`], UTC), Julian dates, UTC calendar
//! days and the `chrono` types used for display.
//!
//! The forecast engine reasons in two time frames:
//!
//! - **Julian dates** (`f64` days, UTC scale) are the argument of every geometric function.
//! - **Seconds of day** relative to a UTC midnight ([`DayKey::start`]) are used by the visibility
//!   cache, where rise/transit/set values live.
//!
//! A [`DayKey`] is the normalized key of one UTC calendar day. It is ordered chronologically and
//! renders as `YYYY-MM-DD`, which is also its serialized form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use hifitime::{Duration, Epoch, Unit};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::constants::{
    JulianDate, DPI, JDTOMJD, MAX_FORECAST_DAYS, MJD, SECONDS_PER_DAY, SECONDS_PER_HOUR, T2000,
};
use crate::jovian_errors::JovianError;

/// Julian Date (UTC scale) of a civil instant.
pub fn epoch_to_jd(epoch: &Epoch) -> JulianDate {
    epoch.to_jde_utc_days()
}

/// Transformation from julian date (JD) in modified julian date (MJD)
pub fn jd_to_mjd(jd: JulianDate) -> MJD {
    jd - JDTOMJD
}

/// Seconds elapsed from `start` to `epoch` (negative when `epoch` precedes `start`).
pub fn seconds_between(start: &Epoch, epoch: &Epoch) -> f64 {
    (*epoch - *start).to_seconds()
}

/// Parse a forecast length.
///
/// A bare number counts hours (`720`, `1.5`). Anything else must be a sequence of
/// `<number><unit>` spans with the units `h`, `m`, `s` and `ms`, e.g. `720h`, `90m` or `1h30m`.
///
/// Errors
/// ------
/// * [`JovianError::InvalidDuration`] for malformed text, or a length that is not finite and
///   strictly positive.
/// * [`JovianError::DurationTooLong`] beyond [`MAX_FORECAST_DAYS`].
pub fn parse_duration(text: &str) -> Result<Duration, JovianError> {
    let text = text.trim();
    let invalid = || JovianError::InvalidDuration(text.to_string());

    let seconds = match text.parse::<f64>() {
        Ok(hours) => hours * SECONDS_PER_HOUR,
        Err(_) => {
            let whole = Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:h|ms|m|s))+$")
                .map_err(|_| invalid())?;
            if !whole.is_match(text) {
                return Err(invalid());
            }
            let span = Regex::new(r"(?P<value>\d+(?:\.\d*)?|\.\d+)(?P<unit>h|ms|m|s)")
                .map_err(|_| invalid())?;
            span.captures_iter(text)
                .map(|caps| {
                    let value: f64 = caps["value"].parse().map_err(|_| invalid())?;
                    let scale = match &caps["unit"] {
                        "h" => SECONDS_PER_HOUR,
                        "m" => 60.0,
                        "s" => 1.0,
                        _ => 1e-3,
                    };
                    Ok(value * scale)
                })
                .sum::<Result<f64, JovianError>>()?
        }
    };

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(invalid());
    }
    let days = seconds / SECONDS_PER_DAY;
    if days > MAX_FORECAST_DAYS {
        return Err(JovianError::DurationTooLong {
            days,
            max: MAX_FORECAST_DAYS,
        });
    }
    Ok(Unit::Second * seconds)
}

/// Identifier of one UTC calendar day.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl DayKey {
    /// The UTC calendar day containing `epoch`.
    pub fn from_epoch(epoch: &Epoch) -> Self {
        let (year, month, day, _, _, _, _) = epoch.to_gregorian_utc();
        DayKey { year, month, day }
    }

    /// UTC midnight opening this day.
    pub fn start(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(self.year, self.month, self.day)
    }

    /// Julian Date of this day's UTC midnight.
    pub fn jd(&self) -> JulianDate {
        epoch_to_jd(&self.start())
    }

    /// The following UTC day.
    ///
    /// Steps 36 hours from midnight and truncates again so a leap second never lands us back on
    /// the same day.
    pub fn next(&self) -> Self {
        DayKey::from_epoch(&(self.start() + Unit::Hour * 36))
    }

    /// The preceding UTC day.
    pub fn previous(&self) -> Self {
        DayKey::from_epoch(&(self.start() - Unit::Hour * 12))
    }

    /// Seconds elapsed since this day's UTC midnight.
    pub fn seconds_of_day(&self, epoch: &Epoch) -> f64 {
        seconds_between(&self.start(), epoch)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for DayKey {
    type Err = JovianError;

    /// Parse a `YYYY-MM-DD` key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| JovianError::InvalidDayKey(s.to_string()))?;
        Ok(DayKey {
            year: date.year(),
            month: date.month() as u8,
            day: date.day() as u8,
        })
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Convert a `chrono` UTC timestamp into an [`Epoch`].
///
/// Arguments
/// ---------
/// * `dt`: the UTC timestamp (usually parsed from an RFC 3339 string)
///
/// Return
/// ------
/// * the same instant as a hifitime [`Epoch`], or a [`JovianError::Time`] if the broken-down
///   date cannot be represented
pub fn datetime_to_epoch(dt: &DateTime<Utc>) -> Result<Epoch, JovianError> {
    Ok(Epoch::maybe_from_gregorian_utc(
        dt.year(),
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
        dt.nanosecond(),
    )?)
}

/// Convert an [`Epoch`] into a `chrono` UTC timestamp for display.
///
/// Uses the Gregorian breakdown so whole minutes stay whole (no float round-trip).
pub fn epoch_to_datetime(epoch: &Epoch) -> Option<DateTime<Utc>> {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    NaiveDate::from_ymd_opt(year, month.into(), day.into())
        .and_then(|d| d.and_hms_nano_opt(hour.into(), minute.into(), second.into(), nanos))
        .map(|naive| naive.and_utc())
}

/// Serialize an [`Epoch`] as an RFC 3339 UTC string.
pub(crate) fn serialize_epoch<S: Serializer>(epoch: &Epoch, serializer: S) -> Result<S::Ok, S::Error> {
    match epoch_to_datetime(epoch) {
        Some(dt) => serializer.collect_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        None => serializer.collect_str(epoch),
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale; UTC is used as a proxy here)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds → radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // Earth rotation over the elapsed fraction of the day
    let h = (tjm - itjm) * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_epoch_to_jd() {
        let epoch = Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0);
        assert_relative_eq!(epoch_to_jd(&epoch), 2451545.0, epsilon = 1e-9);

        let epoch = Epoch::from_gregorian_utc_at_midnight(2021, 1, 1);
        assert_relative_eq!(epoch_to_jd(&epoch), 2459215.5, epsilon = 1e-9);
        assert_relative_eq!(jd_to_mjd(epoch_to_jd(&epoch)), 59215.0, epsilon = 1e-9);
    }

    #[test]
    fn test_day_key_navigation() {
        let epoch = Epoch::from_gregorian_utc(2024, 2, 28, 23, 59, 59, 0);
        let key = DayKey::from_epoch(&epoch);
        assert_eq!(key.to_string(), "2024-02-28");
        assert_eq!(key.next().to_string(), "2024-02-29");
        assert_eq!(key.next().next().to_string(), "2024-03-01");
        assert_eq!(key.previous().to_string(), "2024-02-27");
        assert_eq!(key.next().previous(), key);

        let new_year = DayKey::from_epoch(&Epoch::from_gregorian_utc_at_midnight(2025, 1, 1));
        assert_eq!(new_year.previous().to_string(), "2024-12-31");
        assert!(new_year.previous() < new_year);
    }

    #[test]
    fn test_day_key_across_leap_second() {
        // 2016-12-31 ends with a leap second
        let key = DayKey::from_epoch(&Epoch::from_gregorian_utc(2016, 12, 31, 12, 0, 0, 0));
        assert_eq!(key.next().to_string(), "2017-01-01");
        assert_eq!(key.next().previous(), key);
    }

    #[test]
    fn test_seconds_of_day() {
        let epoch = Epoch::from_gregorian_utc(2024, 5, 10, 6, 30, 15, 0);
        let key = DayKey::from_epoch(&epoch);
        assert_relative_eq!(key.seconds_of_day(&epoch), 23415.0, epsilon = 1e-6);
    }

    #[test]
    fn test_day_key_parse() {
        let key: DayKey = "2023-07-04".parse().unwrap();
        assert_eq!(
            key,
            DayKey {
                year: 2023,
                month: 7,
                day: 4
            }
        );
        assert_eq!(
            "2023-13-04".parse::<DayKey>(),
            Err(JovianError::InvalidDayKey("2023-13-04".into()))
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("720").unwrap(), Unit::Hour * 720);
        assert_eq!(parse_duration("1.5").unwrap(), Unit::Minute * 90);
        assert_eq!(parse_duration("720h").unwrap(), Unit::Hour * 720);
        assert_eq!(parse_duration("90m").unwrap(), Unit::Minute * 90);
        assert_eq!(parse_duration("1h30m").unwrap(), Unit::Minute * 90);
        assert_eq!(parse_duration(" 2h45s ").unwrap(), Unit::Second * 7245);
        assert_eq!(parse_duration("1500ms").unwrap(), Unit::Millisecond * 1500);
    }

    #[test]
    fn test_parse_duration_rejects() {
        for text in ["NaN", "inf", "-inf", "0", "-5", "0h", "", "h", "5x", "1h 30m", "1d"] {
            assert_eq!(
                parse_duration(text),
                Err(JovianError::InvalidDuration(text.trim().to_string())),
                "accepted {text:?}"
            );
        }
        assert!(matches!(
            parse_duration("1e20"),
            Err(JovianError::DurationTooLong { .. })
        ));
        assert!(parse_duration("87841h").is_err());
        assert!(parse_duration("87840h").is_ok());
    }

    #[test]
    fn test_chrono_round_trip() {
        let dt = DateTime::parse_from_rfc3339("2024-03-01T05:30:00+02:00")
            .unwrap()
            .with_timezone(&Utc);
        let epoch = datetime_to_epoch(&dt).unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2024, 3, 1, 3, 30, 0, 0));
        assert_eq!(epoch_to_datetime(&epoch).unwrap(), dt);
    }

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_relative_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-12);

        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }
}
