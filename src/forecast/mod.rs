//! # Forecast driver
//!
//! Samples a time range at a fixed interval and keeps the instants where one of Jupiter's
//! Io-related decameter sources is expected to be active.
//!
//! ## Overview
//!
//! For every sample instant `t` in `[start, end)`:
//!
//! 1. `t` → Julian date,
//! 2. with an observer, the [`DayPositionCache`] drops samples where Jupiter is below the
//!    horizon,
//! 3. Earth and Jupiter heliocentric positions → Earth–Jupiter distance, System III CML and
//!    Io phase ([`crate::geometry`]),
//! 4. [`RadioSource::classify`]; unclassified samples (and non-Io-A unless requested) are
//!    dropped,
//! 5. a [`ForecastRecord`] is emitted, with a [`LocalSky`] block when an observer is known.
//!
//! The run is single-threaded and deterministic: the cache is built before sampling and only
//! read afterwards, records are appended in time order.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use hifitime::{Epoch, Unit};
//! use jovian_noise::ephemeris::mean_elements::MeanElementEphemeris;
//! use jovian_noise::forecast::{ForecastConfig, ForecastRun};
//! use jovian_noise::observers::ObserverCoord;
//!
//! let start = Epoch::from_gregorian_utc_at_midnight(2024, 12, 1);
//! let config = ForecastConfig::new(start, Unit::Day * 7, Unit::Minute * 30)
//!     .with_observer(ObserverCoord::new(45.5, -122.6)?);
//!
//! let run = ForecastRun::compute(config, &MeanElementEphemeris::new())?;
//! println!("{}", run.show());
//! # Ok::<(), jovian_noise::jovian_errors::JovianError>(())
//! ```

pub mod display;

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use hifitime::{Duration, Epoch, Unit};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{info, trace};

use crate::constants::{
    AstronomicalUnit, Degree, Hours, JulianDate, MAX_FORECAST_DAYS, RADEG, RECOMMEND_CUTOFF_HOURS,
};
use crate::ephemeris::{Body, Ephemeris};
use crate::geometry::{distance, io_phase, system_iii_meridian};
use crate::jovian_errors::JovianError;
use crate::observers::ObserverCoord;
use crate::radio_source::RadioSource;
use crate::ref_system::equatorial_to_horizontal;
use crate::time::{epoch_to_datetime, epoch_to_jd, serialize_epoch};
use crate::visibility::DayPositionCache;

/// Default forecast length, in hours (30 days)
pub const DEFAULT_DURATION_HOURS: f64 = 720.0;

/// Default sampling step, in minutes
pub const DEFAULT_INTERVAL_MINUTES: i64 = 30;

/// Time zone used for the optional "local time" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    /// UTC only, no local column
    Utc,
    /// The system's local time zone
    Local,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Resolve the zone from the two mutually exclusive command-line options.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::ConflictingTimeZones`] if both are given.
    /// * [`JovianError::InvalidUtcOffset`] if the offset does not parse.
    pub fn from_options(local: bool, utc_offset: Option<&str>) -> Result<Self, JovianError> {
        match (local, utc_offset) {
            (true, Some(_)) => Err(JovianError::ConflictingTimeZones),
            (true, None) => Ok(DisplayZone::Local),
            (false, Some(offset)) => Ok(DisplayZone::Fixed(Self::parse_offset(offset)?)),
            (false, None) => Ok(DisplayZone::Utc),
        }
    }

    /// Parse `±HH:MM`, `±HHMM` or `±HH`.
    pub fn parse_offset(s: &str) -> Result<FixedOffset, JovianError> {
        let invalid = || JovianError::InvalidUtcOffset(s.to_string());

        let (sign, digits) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(invalid()),
        };
        let digits: String = digits.chars().filter(|c| *c != ':').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (hours, minutes) = match digits.len() {
            2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
            4 => (
                digits[..2].parse::<i32>().map_err(|_| invalid())?,
                digits[2..].parse::<i32>().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };
        if hours > 14 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
    }

    /// `true` when no local column is shown.
    pub fn is_utc(&self) -> bool {
        matches!(self, DisplayZone::Utc)
    }

    /// UTC offset of this zone at `instant`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            DisplayZone::Utc => Utc.fix(),
            DisplayZone::Local => Local.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            DisplayZone::Fixed(offset) => *offset,
        }
    }

    /// `instant` seen in this zone.
    pub fn localize(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Utc => write!(f, "UTC"),
            DisplayZone::Local => write!(f, "local"),
            DisplayZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl Serialize for DisplayZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parameters of one forecast run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub start: Epoch,
    pub duration: Duration,
    pub interval: Duration,
    pub observer: Option<ObserverCoord>,
    pub include_non_io_a: bool,
    pub display_zone: DisplayZone,
}

impl ForecastConfig {
    /// A run over `duration` from `start`, sampled every `interval`, without observer, without
    /// non-Io-A events and with UTC display.
    pub fn new(start: Epoch, duration: Duration, interval: Duration) -> Self {
        ForecastConfig {
            start,
            duration,
            interval,
            observer: None,
            include_non_io_a: false,
            display_zone: DisplayZone::Utc,
        }
    }

    pub fn with_observer(mut self, observer: ObserverCoord) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_non_io_a(mut self, include: bool) -> Self {
        self.include_non_io_a = include;
        self
    }

    pub fn with_display_zone(mut self, zone: DisplayZone) -> Self {
        self.display_zone = zone;
        self
    }

    /// Last instant covered by the run (exclusive bound of the sampling loop).
    ///
    /// One second short of `start + duration`, so a 24 h run from midnight stays on one day.
    pub fn end(&self) -> Epoch {
        self.start + self.duration - Unit::Second * 1
    }

    /// Check the interval and duration.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::InvalidInterval`] when the interval is under one minute.
    /// * [`JovianError::DurationShorterThanInterval`] when the run cannot hold one interval.
    /// * [`JovianError::DurationTooLong`] beyond [`MAX_FORECAST_DAYS`].
    pub fn validate(&self) -> Result<(), JovianError> {
        if self.interval < Unit::Minute * 1 {
            return Err(JovianError::InvalidInterval(
                self.interval.to_unit(Unit::Minute).floor() as i64,
            ));
        }
        if self.duration < self.interval {
            return Err(JovianError::DurationShorterThanInterval {
                duration_s: self.duration.to_seconds(),
                interval_s: self.interval.to_seconds(),
            });
        }
        let days = self.duration.to_unit(Unit::Day);
        if days > MAX_FORECAST_DAYS {
            return Err(JovianError::DurationTooLong {
                days,
                max: MAX_FORECAST_DAYS,
            });
        }
        Ok(())
    }
}

/// Observer-dependent part of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalSky {
    /// Signed hours from the reference transit, positive after transit
    pub transit_hour_angle: Hours,
    /// Altitude above the horizon (degrees)
    pub altitude: Degree,
    /// Azimuth from north through east (degrees)
    pub azimuth: Degree,
}

/// One sample where a radio source is expected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRecord {
    #[serde(serialize_with = "serialize_epoch")]
    pub instant: Epoch,
    /// Io phase (degrees, `[0, 360)`)
    pub io_phase: Degree,
    /// System III central meridian longitude (degrees, `[0, 360)`)
    pub meridian: Degree,
    /// Earth–Jupiter distance (AU)
    pub distance: AstronomicalUnit,
    pub radio_source: RadioSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalSky>,
}

impl ForecastRecord {
    /// `true` when Jupiter is within three hours of transit for the observer.
    pub fn recommended(&self) -> bool {
        self.local
            .is_some_and(|sky| sky.transit_hour_angle.abs() < RECOMMEND_CUTOFF_HOURS)
    }
}

/// A complete forecast: the request, the visibility cache and the records.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub config: ForecastConfig,
    pub day_positions: Option<DayPositionCache>,
    pub records: Vec<ForecastRecord>,
}

impl ForecastRun {
    /// Validate `config`, build the visibility cache if an observer is set, and sample.
    ///
    /// Arguments
    /// -----------------
    /// * `config`: run parameters.
    /// * `ephemeris`: planetary positions provider.
    ///
    /// Return
    /// ----------
    /// * The run with its records in chronological order.
    ///
    /// Errors
    /// ----------
    /// * configuration errors from [`ForecastConfig::validate`],
    /// * [`JovianError::Circumpolar`] when Jupiter does not rise/set on a cached day,
    /// * [`JovianError::MissingDayPosition`] / [`JovianError::UnreachableTransitCase`] on an
    ///   inconsistent cache.
    pub fn compute<E: Ephemeris>(config: ForecastConfig, ephemeris: &E) -> Result<Self, JovianError> {
        config.validate()?;
        let end = config.end();

        info!(
            start = %config.start,
            end = %end,
            interval_s = config.interval.to_seconds(),
            observer = ?config.observer,
            non_io_a = config.include_non_io_a,
            "starting forecast"
        );

        let day_positions = config
            .observer
            .map(|observer| DayPositionCache::build(ephemeris, observer, &config.start, &end))
            .transpose()?;

        let mut records = Vec::new();
        let mut instant = config.start;
        while instant < end {
            if let Some(record) =
                Self::sample(&config, ephemeris, day_positions.as_ref(), &instant)?
            {
                records.push(record);
            }
            instant += config.interval;
        }

        info!(records = records.len(), "forecast complete");

        Ok(ForecastRun {
            config,
            day_positions,
            records,
        })
    }

    /// Evaluate one sample; `None` when it is skipped.
    fn sample<E: Ephemeris>(
        config: &ForecastConfig,
        ephemeris: &E,
        day_positions: Option<&DayPositionCache>,
        instant: &Epoch,
    ) -> Result<Option<ForecastRecord>, JovianError> {
        let jd = epoch_to_jd(instant);

        if let Some(cache) = day_positions {
            if cache.skip(instant)? {
                trace!(instant = %instant, "Jupiter below the horizon");
                return Ok(None);
            }
        }

        let earth = ephemeris.planet_longitude_distance(Body::Earth, jd);
        let jupiter = ephemeris.planet_longitude_distance(Body::Jupiter, jd);

        let meridian = system_iii_meridian(jd);
        let dist = distance(
            earth.longitude / RADEG,
            earth.distance,
            jupiter.longitude / RADEG,
            jupiter.distance,
        );
        let io = io_phase(jd, dist);
        let radio_source = RadioSource::classify(meridian, io);

        if !radio_source.is_reported(config.include_non_io_a) {
            trace!(instant = %instant, meridian, io_phase = io, "no reported source");
            return Ok(None);
        }

        let local = day_positions
            .map(|cache| local_sky(cache, ephemeris, instant, jd))
            .transpose()?;

        Ok(Some(ForecastRecord {
            instant: *instant,
            io_phase: io,
            meridian,
            distance: dist,
            radio_source,
            local,
        }))
    }

    /// Display adaptor rendering the banner and table.
    pub fn show(&self) -> display::ForecastDisplay<'_> {
        display::ForecastDisplay::new(self)
    }

    /// Pretty-printed JSON of the whole run.
    pub fn to_json(&self) -> Result<String, JovianError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Transit hour angle and horizontal coordinates of Jupiter at `instant`.
///
/// Uses the day's cached RA/Dec and the apparent local sidereal time of the sample.
fn local_sky<E: Ephemeris>(
    cache: &DayPositionCache,
    ephemeris: &E,
    instant: &Epoch,
    jd: JulianDate,
) -> Result<LocalSky, JovianError> {
    let (_, position, _) = cache.position_at(instant)?;
    let transit_hour_angle = cache.hour_angle_from_transit(instant)?;

    let observer = cache.observer();
    let lst = observer.local_sidereal_time(ephemeris.apparent_sidereal_time(jd));
    let (altitude, azimuth) = equatorial_to_horizontal(
        lst - position.right_ascension,
        position.declination,
        observer.latitude_rad(),
    );

    Ok(LocalSky {
        transit_hour_angle,
        altitude: altitude / RADEG,
        azimuth: azimuth / RADEG,
    })
}

impl Serialize for ForecastRun {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let config = &self.config;
        let end = config.end();

        let mut state = serializer.serialize_struct("ForecastRun", 9)?;
        state.serialize_field("start_time", &RfcEpoch(&config.start))?;
        state.serialize_field("end_time", &RfcEpoch(&end))?;
        state.serialize_field("duration", &config.duration.to_seconds())?;
        state.serialize_field("interval", &config.interval.to_unit(Unit::Minute))?;
        state.serialize_field("coords", &config.observer)?;
        state.serialize_field("local_forecast", &config.observer.is_some())?;
        state.serialize_field("display_zone", &config.display_zone)?;
        if let Some(cache) = &self.day_positions {
            state.serialize_field("jupiter_positions", cache)?;
        } else {
            state.skip_field("jupiter_positions")?;
        }
        state.serialize_field("intervals", &self.records)?;
        state.end()
    }
}

/// Borrowed epoch serialized as RFC 3339.
struct RfcEpoch<'a>(&'a Epoch);

impl Serialize for RfcEpoch<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_epoch(self.0, serializer)
    }
}

/// Local date/time of `instant` in `zone`, or `None` if it cannot be represented.
pub fn localized(zone: &DisplayZone, instant: &Epoch) -> Option<DateTime<FixedOffset>> {
    epoch_to_datetime(instant).map(|dt| zone.localize(&dt))
}
