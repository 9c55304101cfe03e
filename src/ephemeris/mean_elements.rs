//! # Mean Keplerian element ephemeris
//!
//! Heliocentric positions of the Earth–Moon barycentre and Jupiter from the JPL
//! *Approximate Positions of the Planets* mean elements (Standish & Williams, Table 1,
//! valid 1800 AD – 2050 AD).
//!
//! ## Propagation
//!
//! For a time `T` in Julian centuries from J2000:
//!
//! 1. every element is `x₀ + ẋ·T`,
//! 2. argument of perihelion `ω = ϖ − Ω`, mean anomaly `M = L − ϖ`,
//! 3. Kepler's equation gives the eccentric anomaly `E` ([`solve_kepler`]),
//! 4. perifocal coordinates `x′ = a(cos E − e)`, `y′ = a√(1−e²)·sin E`,
//! 5. rotation by `ω`, `I`, `Ω` to the J2000 ecliptic.
//!
//! ## Apparent place
//!
//! [`MeanElementEphemeris::apparent_ra_dec`] builds the geocentric vector of Jupiter with one
//! light-time iteration, brings its ecliptic longitude from J2000 to the equinox of date
//! (general precession in longitude) and adds nutation, then rotates to the equator of date
//! with the true obliquity. Annual aberration (≤ 20″) is neglected.

use nalgebra::Vector3;

use crate::constants::{
    JulianDate, Radian, DAYS_PER_CENTURY, J2000_JD, LIGHT_TIME_DAYS_PER_AU, RADEG, RADSEC,
};
use crate::earth_orientation::{nutation, true_obliquity};
use crate::ephemeris::{Body, Ephemeris, HeliocentricPosition};
use crate::kepler::solve_kepler;
use crate::ref_system::{cartesian_to_radec, ecliptic_to_equatorial, radec_to_cartesian};
use crate::time::jd_to_mjd;

/// General precession in ecliptic longitude, arcseconds per Julian century.
const PRECESSION_RATE: f64 = 5029.0966;

/// Classical mean orbital elements, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    /// Semi-major axis (AU)
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Inclination to the J2000 ecliptic
    pub inclination: f64,
    pub mean_longitude: f64,
    /// Longitude of perihelion ϖ
    pub longitude_perihelion: f64,
    /// Longitude of the ascending node Ω
    pub longitude_node: f64,
}

/// Elements at J2000 together with their rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSet {
    pub epoch: MeanElements,
    pub rate: MeanElements,
}

pub const EARTH_MOON_BARYCENTER: ElementSet = ElementSet {
    epoch: MeanElements {
        semi_major_axis: 1.00000261,
        eccentricity: 0.01671123,
        inclination: -0.00001531,
        mean_longitude: 100.46457166,
        longitude_perihelion: 102.93768193,
        longitude_node: 0.0,
    },
    rate: MeanElements {
        semi_major_axis: 0.00000562,
        eccentricity: -0.00004392,
        inclination: -0.01294668,
        mean_longitude: 35999.37244981,
        longitude_perihelion: 0.32327364,
        longitude_node: 0.0,
    },
};

pub const JUPITER: ElementSet = ElementSet {
    epoch: MeanElements {
        semi_major_axis: 5.20288700,
        eccentricity: 0.04838624,
        inclination: 1.30439695,
        mean_longitude: 34.39644051,
        longitude_perihelion: 14.72847983,
        longitude_node: 100.47390909,
    },
    rate: MeanElements {
        semi_major_axis: -0.00011607,
        eccentricity: -0.00013253,
        inclination: -0.00183714,
        mean_longitude: 3034.74612775,
        longitude_perihelion: 0.21252668,
        longitude_node: 0.20469106,
    },
};

impl ElementSet {
    /// Elements propagated to `t` Julian centuries after J2000.
    pub fn at(&self, t: f64) -> MeanElements {
        let (e0, de) = (&self.epoch, &self.rate);
        MeanElements {
            semi_major_axis: e0.semi_major_axis + de.semi_major_axis * t,
            eccentricity: e0.eccentricity + de.eccentricity * t,
            inclination: e0.inclination + de.inclination * t,
            mean_longitude: e0.mean_longitude + de.mean_longitude * t,
            longitude_perihelion: e0.longitude_perihelion + de.longitude_perihelion * t,
            longitude_node: e0.longitude_node + de.longitude_node * t,
        }
    }
}

impl MeanElements {
    /// Heliocentric Cartesian position in the J2000 ecliptic frame (AU).
    pub fn heliocentric_position(&self) -> Vector3<f64> {
        let a = self.semi_major_axis;
        let e = self.eccentricity;
        let incl = self.inclination * RADEG;
        let node = self.longitude_node * RADEG;
        let peri = (self.longitude_perihelion - self.longitude_node) * RADEG;
        let mean_anomaly = (self.mean_longitude - self.longitude_perihelion) * RADEG;

        let ecc_anomaly = solve_kepler(mean_anomaly, e);

        // perifocal plane
        let xp = a * (ecc_anomaly.cos() - e);
        let yp = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

        let (sw, cw) = peri.sin_cos();
        let (so, co) = node.sin_cos();
        let (si, ci) = incl.sin_cos();

        Vector3::new(
            (cw * co - sw * so * ci) * xp + (-sw * co - cw * so * ci) * yp,
            (cw * so + sw * co * ci) * xp + (-sw * so + cw * co * ci) * yp,
            (sw * si) * xp + (cw * si) * yp,
        )
    }
}

fn centuries_since_j2000(jd: JulianDate) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// [`Ephemeris`] backed by the JPL mean elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanElementEphemeris;

impl MeanElementEphemeris {
    pub fn new() -> Self {
        MeanElementEphemeris
    }

    fn elements(body: Body) -> &'static ElementSet {
        match body {
            Body::Earth => &EARTH_MOON_BARYCENTER,
            Body::Jupiter => &JUPITER,
        }
    }

    /// Heliocentric Cartesian position of `body`, J2000 ecliptic, AU.
    pub fn heliocentric_ecliptic(&self, body: Body, jd: JulianDate) -> Vector3<f64> {
        Self::elements(body)
            .at(centuries_since_j2000(jd))
            .heliocentric_position()
    }

    /// Geocentric position of Jupiter corrected for light time, J2000 ecliptic, AU.
    pub fn geocentric_jupiter(&self, jd: JulianDate) -> Vector3<f64> {
        let earth = self.heliocentric_ecliptic(Body::Earth, jd);
        let geometric = self.heliocentric_ecliptic(Body::Jupiter, jd) - earth;

        let tau = geometric.norm() * LIGHT_TIME_DAYS_PER_AU;
        self.heliocentric_ecliptic(Body::Jupiter, jd - tau) - earth
    }
}

impl Ephemeris for MeanElementEphemeris {
    fn planet_longitude_distance(&self, body: Body, jd: JulianDate) -> HeliocentricPosition {
        let (longitude, latitude, distance) =
            cartesian_to_radec(self.heliocentric_ecliptic(body, jd));
        HeliocentricPosition {
            longitude,
            latitude,
            distance,
        }
    }

    fn apparent_ra_dec(&self, jd: JulianDate) -> (Radian, Radian) {
        let tjm = jd_to_mjd(jd);
        let (lambda, beta, _) = cartesian_to_radec(self.geocentric_jupiter(jd));

        let (dpsi, _deps) = nutation(tjm);
        let lambda_of_date =
            lambda + (PRECESSION_RATE * centuries_since_j2000(jd) + dpsi) * RADSEC;

        let ecliptic = radec_to_cartesian(lambda_of_date, beta, 1.0);
        let equatorial = ecliptic_to_equatorial(&ecliptic, true_obliquity(tjm));

        let (ra, dec, _) = cartesian_to_radec(equatorial);
        (ra, dec)
    }
}

#[cfg(test)]
mod mean_elements_test {
    use super::*;
    use crate::kepler::angle_diff;
    use approx::assert_abs_diff_eq;
    use hifitime::Epoch;

    use crate::time::epoch_to_jd;

    fn jd_midnight(year: i32, month: u8, day: u8) -> JulianDate {
        epoch_to_jd(&Epoch::from_gregorian_utc_at_midnight(year, month, day))
    }

    #[test]
    fn test_elements_at_epoch() {
        assert_eq!(JUPITER.at(0.0), JUPITER.epoch);
        let later = EARTH_MOON_BARYCENTER.at(1.0);
        assert_abs_diff_eq!(later.mean_longitude, 36099.83702147, epsilon = 1e-8);
    }

    #[test]
    fn test_jupiter_at_j2000() {
        let eph = MeanElementEphemeris::new();
        let pos = eph.planet_longitude_distance(Body::Jupiter, J2000_JD);

        assert_abs_diff_eq!(pos.longitude, 36.38 * RADEG, epsilon = 0.05 * RADEG);
        assert_abs_diff_eq!(pos.latitude, -1.17 * RADEG, epsilon = 0.05 * RADEG);
        assert_abs_diff_eq!(pos.distance, 4.967, epsilon = 0.005);
    }

    #[test]
    fn test_earth_at_equinox() {
        // 2024 March equinox, 03:06 UTC: the Sun crosses 0° of date
        let eph = MeanElementEphemeris::new();
        let jd = epoch_to_jd(&Epoch::from_gregorian_utc(2024, 3, 20, 3, 6, 0, 0));
        let pos = eph.planet_longitude_distance(Body::Earth, jd);

        let of_date = pos.longitude + PRECESSION_RATE * centuries_since_j2000(jd) * RADSEC;
        assert_abs_diff_eq!(angle_diff(of_date, 180.0 * RADEG), 0.0, epsilon = 0.05 * RADEG);
        assert!((0.983..1.017).contains(&pos.distance));
    }

    #[test]
    fn test_oppositions() {
        let eph = MeanElementEphemeris::new();

        for (jd, expected_dist) in [
            (jd_midnight(2023, 11, 3), 3.98),
            (jd_midnight(2024, 12, 7), 4.09),
        ] {
            let earth = eph.planet_longitude_distance(Body::Earth, jd);
            let jupiter = eph.planet_longitude_distance(Body::Jupiter, jd);
            assert!(angle_diff(earth.longitude, jupiter.longitude).abs() < 1.0 * RADEG);

            let geo = eph.geocentric_jupiter(jd);
            assert_abs_diff_eq!(geo.norm(), expected_dist, epsilon = 0.02);
        }
    }

    #[test]
    fn test_apparent_ra_dec() {
        let eph = MeanElementEphemeris::new();

        let (ra, dec) = eph.apparent_ra_dec(jd_midnight(2023, 11, 3));
        assert_abs_diff_eq!(ra, 2.566 * 15.0 * RADEG, epsilon = 0.2 * RADEG);
        assert_abs_diff_eq!(dec, 13.61 * RADEG, epsilon = 0.2 * RADEG);

        let (ra, dec) = eph.apparent_ra_dec(jd_midnight(2024, 12, 7));
        assert_abs_diff_eq!(ra, 5.015 * 15.0 * RADEG, epsilon = 0.2 * RADEG);
        assert_abs_diff_eq!(dec, 22.06 * RADEG, epsilon = 0.2 * RADEG);
    }
}
