//! # Observer site
//!
//! A ground observer is described by its geodetic latitude and longitude, in degrees.
//! Longitude is **east-positive** (the usual geographic convention), latitude in `[-90, 90]`.
//! Both are stored as `NotNan<f64>` so that a validated site can never carry a NaN into the
//! visibility computations.
//!
//! Supplying a site is optional for a forecast: [`ObserverCoord::from_optional`] enforces the
//! "both or neither" rule of the command line and returns `None` when no coordinate was given.

use std::fmt;

use ordered_float::NotNan;
use serde::Serialize;

use crate::constants::{Degree, Radian, DPI, RADEG};
use crate::jovian_errors::JovianError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObserverCoord {
    /// Geodetic latitude in degrees, north positive
    pub latitude: NotNan<f64>,
    /// Geodetic longitude in degrees, east positive
    pub longitude: NotNan<f64>,
}

impl ObserverCoord {
    /// Build a validated observer coordinate.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: geodetic latitude in degrees, `[-90, 90]`.
    /// * `longitude`: geodetic longitude in degrees, east positive, `[-180, 360]`.
    ///
    /// Return
    /// ----------
    /// * The site, with the longitude reduced into `(-180, 180]`.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::InvalidCoordinate`] if a value is NaN or out of range.
    pub fn new(latitude: Degree, longitude: Degree) -> Result<Self, JovianError> {
        let latitude = NotNan::new(latitude)
            .map_err(|_| JovianError::InvalidCoordinate("latitude is NaN".into()))?;
        let longitude = NotNan::new(longitude)
            .map_err(|_| JovianError::InvalidCoordinate("longitude is NaN".into()))?;

        if !(-90.0..=90.0).contains(&latitude.into_inner()) {
            return Err(JovianError::InvalidCoordinate(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=360.0).contains(&longitude.into_inner()) {
            return Err(JovianError::InvalidCoordinate(format!(
                "longitude {longitude} outside [-180, 360]"
            )));
        }

        let mut lon = longitude.into_inner();
        if lon > 180.0 {
            lon -= 360.0;
        }

        Ok(ObserverCoord {
            latitude,
            longitude: NotNan::new(lon)
                .map_err(|_| JovianError::InvalidCoordinate("longitude is NaN".into()))?,
        })
    }

    /// Build an optional site from optional latitude / longitude.
    ///
    /// Both or neither must be given.
    ///
    /// Errors
    /// ----------
    /// * [`JovianError::IncompleteCoordinates`] when only one of the two is supplied.
    /// * Any error of [`ObserverCoord::new`].
    pub fn from_optional(
        latitude: Option<Degree>,
        longitude: Option<Degree>,
    ) -> Result<Option<Self>, JovianError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok(Some(ObserverCoord::new(lat, lon)?)),
            (None, None) => Ok(None),
            _ => Err(JovianError::IncompleteCoordinates),
        }
    }

    /// Latitude in radians.
    pub fn latitude_rad(&self) -> Radian {
        self.latitude.into_inner() * RADEG
    }

    /// East-positive longitude in radians.
    pub fn longitude_rad(&self) -> Radian {
        self.longitude.into_inner() * RADEG
    }

    /// Local sidereal time at this site from the Greenwich sidereal time `gast`, in `[0, 2π)`.
    pub fn local_sidereal_time(&self, gast: Radian) -> Radian {
        (gast + self.longitude_rad()).rem_euclid(DPI)
    }
}

impl fmt::Display for ObserverCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}º, {}º", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod observers_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_new_observer() {
        let site = ObserverCoord::new(45.5, -122.6).unwrap();
        assert_eq!(site.latitude.into_inner(), 45.5);
        assert_eq!(site.longitude.into_inner(), -122.6);
        assert_eq!(site.to_string(), "45.5º, -122.6º");

        // 0–360 convention is folded back
        let site = ObserverCoord::new(10.0, 270.0).unwrap();
        assert_eq!(site.longitude.into_inner(), -90.0);
    }

    #[test]
    fn test_invalid_observer() {
        assert!(matches!(
            ObserverCoord::new(91.0, 0.0),
            Err(JovianError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            ObserverCoord::new(0.0, 400.0),
            Err(JovianError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            ObserverCoord::new(f64::NAN, 0.0),
            Err(JovianError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_from_optional() {
        assert_eq!(ObserverCoord::from_optional(None, None), Ok(None));
        assert_eq!(
            ObserverCoord::from_optional(Some(10.0), None),
            Err(JovianError::IncompleteCoordinates)
        );
        assert_eq!(
            ObserverCoord::from_optional(None, Some(10.0)),
            Err(JovianError::IncompleteCoordinates)
        );
        assert!(ObserverCoord::from_optional(Some(0.0), Some(0.0))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_local_sidereal_time() {
        let gast = 3.5;
        let greenwich = ObserverCoord::new(0.0, 0.0).unwrap();
        let east = ObserverCoord::new(0.0, 90.0).unwrap();
        let west = ObserverCoord::new(0.0, -122.6).unwrap();

        assert_abs_diff_eq!(greenwich.local_sidereal_time(gast), gast, epsilon = 1e-15);
        assert_abs_diff_eq!(
            east.local_sidereal_time(gast),
            gast + 90.0 * RADEG,
            epsilon = 1e-12
        );
        let lst = west.local_sidereal_time(0.1);
        assert!((0.0..DPI).contains(&lst));
        assert_abs_diff_eq!(lst, 0.1 - 122.6 * RADEG + DPI, epsilon = 1e-12);
    }
}
