//! # Ephemeris adapter
//!
//! The forecast engine never computes planetary positions itself: it asks an [`Ephemeris`]
//! for
//!
//! - heliocentric ecliptic longitude / latitude / distance of Earth and Jupiter,
//! - Jupiter's apparent geocentric right ascension and declination,
//! - the Greenwich apparent sidereal time,
//! - approximate rising, transit and setting times of a body for an observer.
//!
//! ## Provided implementation
//!
//! [`MeanElementEphemeris`](crate::ephemeris::mean_elements::MeanElementEphemeris) propagates
//! the JPL mean Keplerian elements of the Earth–Moon barycentre and of Jupiter. Accuracy is a
//! few arcminutes over 1800–2050, well inside what the storm windows need.
//!
//! Rise/transit/set use the approximate Meeus expressions in [`rise_set`]; any implementor
//! gets them for free through the trait's default methods.
//!
//! ## See also
//! * [`DayPositionCache`](crate::visibility::DayPositionCache) – calls the adapter once per day
//! * [`ForecastRun`](crate::forecast::ForecastRun) – calls the adapter once per sample

pub mod mean_elements;
pub mod rise_set;

use std::fmt;

use crate::constants::{AstronomicalUnit, JulianDate, Radian, SecondsOfDay};
use crate::earth_orientation;
use crate::observers::ObserverCoord;

/// Bodies the adapter can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Earth,
    Jupiter,
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Body::Earth => "Earth",
            Body::Jupiter => "Jupiter",
        };
        write!(f, "{s}")
    }
}

/// Heliocentric ecliptic (J2000) spherical position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeliocentricPosition {
    /// Ecliptic longitude in radians, `[0, 2π)`
    pub longitude: Radian,
    /// Ecliptic latitude in radians
    pub latitude: Radian,
    /// Distance to the Sun in AU
    pub distance: AstronomicalUnit,
}

/// Approximate event times for one UTC day, in seconds after 0h UT, each in `[0, 86400)`.
///
/// A `set` earlier than `rising` means the visibility window crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiseTransitSet {
    pub rising: SecondsOfDay,
    pub transit: SecondsOfDay,
    pub set: SecondsOfDay,
}

/// Source of planetary positions and sky geometry.
pub trait Ephemeris {
    /// Heliocentric ecliptic longitude, latitude and distance of `body` at `jd`.
    fn planet_longitude_distance(&self, body: Body, jd: JulianDate) -> HeliocentricPosition;

    /// Apparent geocentric right ascension and declination of Jupiter at `jd`, in radians,
    /// referred to the true equator and equinox of date.
    fn apparent_ra_dec(&self, jd: JulianDate) -> (Radian, Radian);

    /// Greenwich apparent sidereal time at `jd`, in radians.
    fn apparent_sidereal_time(&self, jd: JulianDate) -> Radian {
        earth_orientation::apparent_sidereal_time(jd)
    }

    /// Approximate rising, transit and setting times for `observer`.
    ///
    /// Arguments
    /// ---------
    /// * `observer`: observing site.
    /// * `h0`: standard altitude of the body at rising/setting, in radians.
    /// * `theta0`: apparent sidereal time at Greenwich at 0h UT of the day, in radians.
    /// * `ra`, `dec`: apparent right ascension and declination for the day, in radians.
    ///
    /// Return
    /// ------
    /// * `None` when the body is circumpolar or never rises for this site.
    fn approx_rise_transit_set(
        &self,
        observer: &ObserverCoord,
        h0: Radian,
        theta0: Radian,
        ra: Radian,
        dec: Radian,
    ) -> Option<RiseTransitSet> {
        rise_set::approx_times(observer, h0, theta0, ra, dec)
    }
}
