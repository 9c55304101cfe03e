//! # Earth orientation
//!
//! Obliquity of the ecliptic, nutation and sidereal time, as needed to turn a geometric
//! ecliptic position into an apparent equatorial one and to place it on the local sky.
//!
//! ## Overview
//!
//! - [`obleq`]: mean obliquity (IAU 1976 polynomial)
//! - [`nutation`]: nutation in longitude and obliquity, four-term series (≈0.5″ / 0.1″ accuracy)
//! - [`true_obliquity`]: mean obliquity corrected by nutation
//! - [`equequ`]: equation of the equinoxes
//! - [`apparent_sidereal_time`]: Greenwich apparent sidereal time from a Julian Date
//!
//! All time arguments are Modified Julian Dates, except [`apparent_sidereal_time`] which takes a
//! Julian Date for convenience. UTC stands in for TT/UT1 throughout: the ~70 s offset is far
//! below what a storm forecast resolves.

use crate::{
    constants::{ArcSec, JulianDate, Radian, DAYS_PER_CENTURY, DPI, RADEG, RADSEC, T2000},
    time::{gmst, jd_to_mjd},
};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date.
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(t) = ε₀ + ε₁·T + ε₂·T² + ε₃·T³,   T = (tjm - T2000) / 36525
/// ```
/// evaluated with Horner's method, coefficients in arcseconds.
pub fn obleq(tjm: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity from the four dominant terms of the IAU 1980 series.
///
/// The arguments are the longitude of the Moon's ascending node (Ω) and the mean longitudes of
/// the Sun (L) and the Moon (L′).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date.
///
/// Returns
/// --------
/// * `(Δψ, Δε)` in **arcseconds**.
///
/// # See also
/// * [`equequ`] – uses Δψ
/// * [`true_obliquity`] – uses Δε
pub fn nutation(tjm: f64) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    let node = (125.04452 - 1934.136261 * t) * RADEG;
    let sun = (280.4665 + 36000.7698 * t) * RADEG;
    let moon = (218.3165 + 481267.8813 * t) * RADEG;

    let dpsi = -17.20 * node.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * node).sin();
    let deps = 9.20 * node.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
        - 0.09 * (2.0 * node).cos();

    (dpsi, deps)
}

/// True obliquity of the ecliptic ε = ε₀ + Δε, in radians.
pub fn true_obliquity(tjm: f64) -> Radian {
    let (_dpsi, deps) = nutation(tjm);
    obleq(tjm) + deps * RADSEC
}

/// Compute the equation of the equinoxes, Δψ·cos ε, in radians.
///
/// This is the difference between apparent and mean sidereal time.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date.
///
/// Returns
/// --------
/// * The equation of the equinoxes in radians.
pub fn equequ(tjm: f64) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutation(tjm);

    RADSEC * dpsi * oblm.cos()
}

/// Greenwich apparent sidereal time in radians, in `[0, 2π)`.
///
/// Arguments
/// ---------
/// * `jd`: Julian Date (UTC).
///
/// # See also
/// * [`gmst`] – mean sidereal time
/// * [`equequ`] – mean → apparent correction
pub fn apparent_sidereal_time(jd: JulianDate) -> Radian {
    let tjm = jd_to_mjd(jd);
    (gmst(tjm) + equequ(tjm)).rem_euclid(DPI)
}
