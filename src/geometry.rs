//! # Orbital geometry of the Jupiter–Io system
//!
//! Empirical, civil-time approximations turning a Julian date into the two angles that
//! control Io-related decameter emission:
//!
//! - Jupiter's **System III central meridian longitude** (CML) seen from Earth,
//!   [`system_iii_meridian`],
//! - **Io's orbital phase**, counted from superior conjunction, [`io_phase`].
//!
//! plus the Earth–Jupiter [`distance`] needed by the light-time term of the Io phase.
//!
//! All functions are pure and never fail. Angles come back in degrees, normalized into
//! `[0, 360)`; every trigonometric intermediate is evaluated in radians and reduced with a
//! Euclidean remainder, so dates before the reference epochs are handled as well.

use std::f64::consts::PI;

use crate::constants::{AstronomicalUnit, Degree, JulianDate, DPI, IO_LIGHT_TIME_DIVISOR, RADEG};

/// Reduce an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: Degree) -> Degree {
    let reduced = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to 360.0
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// Reduce an angle in radians into `[0, 2π)`.
fn reg(angle: f64) -> f64 {
    angle.rem_euclid(DPI)
}

/// Periodic correction of the System III longitude (degrees).
///
/// Accounts for Jupiter's equation of the center and the Earth–Jupiter synodic geometry
/// (periods of ≈4332.9 and ≈398.88 days).
///
/// ```text
/// J  = (jd − 2455636.938) · 360 / 4332.89709
/// C  = 5.55 · sin J
/// A  = (jd − 2451870.628) · 360 / 398.884 − C
/// δ  = 11 · sin A + 5 · cos A − 1.25 · cos J − C
/// ```
pub fn meridian_correction(jd: JulianDate) -> Degree {
    let jup_mean = (jd - 2455636.938) * 360.0 / 4332.89709;
    let eqn_center = 5.55 * (jup_mean * RADEG).sin();
    let angle = ((jd - 2451870.628) * 360.0 / 398.884 - eqn_center) * RADEG;

    11.0 * angle.sin() + 5.0 * angle.cos() - 1.25 * (jup_mean * RADEG).cos() - eqn_center
}

/// Jupiter's System III central meridian longitude seen from Earth, in `[0, 360)` degrees.
///
/// # See also
/// * [`meridian_correction`] – the periodic term added to the linear drift
pub fn system_iii_meridian(jd: JulianDate) -> Degree {
    normalize_degrees(138.41 + 870.4535567 * jd + meridian_correction(jd))
}

/// Io's orbital phase angle in `[0, 360)` degrees.
///
/// The phase is measured along Io's orbit from superior conjunction as seen from Earth
/// (hence the final half-turn). The model chains Earth's and Jupiter's mean anomalies, the
/// equations of the center of both orbits, the Sun–Earth–Jupiter angle and a light-time
/// correction of `dist / 173` days.
///
/// Every angle term is written in degrees and converted to radians as a whole. That includes
/// the Saturn perturbation argument `V = 134.63° + 0.00111587°·d`; reading `134.63` as radians
/// with only the rate term converted moves the anomalies by up to about 0.66°.
///
/// Arguments
/// ---------
/// * `jd`: Julian date (UTC).
/// * `dist`: Earth–Jupiter distance in AU, strictly positive.
pub fn io_phase(jd: JulianDate, dist: AstronomicalUnit) -> Degree {
    debug_assert!(dist > 0.0, "Earth–Jupiter distance must be positive");

    let d = jd - 2415020.0;

    // long-period perturbation of Jupiter by Saturn
    let v = reg((134.63 + 0.00111587 * d) * RADEG);
    let earth_anomaly = reg((358.476 + 0.9856003 * d) * RADEG);
    let jup_anomaly = reg((225.328 + 0.0830853 * d + 0.33 * v.sin()) * RADEG);
    let j = reg((221.647 + 0.9025179 * d - 0.33 * v.sin()) * RADEG);

    // equations of the center
    let a = reg(
        (1.916 * earth_anomaly.sin() + 0.020 * (2.0 * earth_anomaly).sin()) * RADEG,
    );
    let b = reg((5.552 * jup_anomaly.sin() + 0.167 * (2.0 * jup_anomaly).sin()) * RADEG);

    let k = reg(j + a - b);
    let earth_radius_vector =
        1.00014 - 0.01672 * earth_anomaly.cos() - 0.00014 * (2.0 * earth_anomaly).cos();
    let psi = (earth_radius_vector / dist * k.sin()).clamp(-1.0, 1.0).asin();

    let io = reg((84.5506 + 203.4058630 * (d - dist / IO_LIGHT_TIME_DIVISOR)) * RADEG + psi - b);

    normalize_degrees(reg(io + PI) / RADEG)
}

/// Shorter arc between two longitudes, in `[0, 180]` degrees.
pub fn angular_separation(a: Degree, b: Degree) -> Degree {
    let delta = (normalize_degrees(a) - normalize_degrees(b)).abs();
    delta.min(360.0 - delta)
}

/// Linear distance between two bodies from their heliocentric longitudes and distances.
///
/// Latitudes are ignored: both bodies are taken in the ecliptic plane. The separation angle is
/// the shorter arc, so longitudes straddling 0°/360° are handled.
///
/// Arguments
/// ---------
/// * `e_lon`, `e_dist`: first body (Earth) longitude in degrees and distance in AU.
/// * `j_lon`, `j_dist`: second body (Jupiter) longitude in degrees and distance in AU.
///
/// Return
/// ------
/// * The separation in AU (law of cosines).
pub fn distance(
    e_lon: Degree,
    e_dist: AstronomicalUnit,
    j_lon: Degree,
    j_dist: AstronomicalUnit,
) -> AstronomicalUnit {
    let angle = angular_separation(e_lon, j_lon) * RADEG;
    (e_dist.powi(2) + j_dist.powi(2) - 2.0 * e_dist * j_dist * angle.cos()).sqrt()
}

#[cfg(test)]
mod geometry_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-1e-14), 0.0);
        assert_abs_diff_eq!(normalize_degrees(-90.0), 270.0);
        assert_abs_diff_eq!(normalize_degrees(725.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reference_values() {
        let jd = 2460000.5;
        assert_abs_diff_eq!(meridian_correction(jd), 2.3278747528531327, epsilon = 1e-9);
        assert_abs_diff_eq!(system_iii_meridian(jd), 325.4466531276703, epsilon = 1e-6);
        assert_abs_diff_eq!(io_phase(jd, 4.5), 164.77870922652826, epsilon = 1e-6);
    }

    #[test]
    fn test_angles_in_range() {
        let mut rng = StdRng::seed_from_u64(1_234);
        for _ in 0..10_000 {
            let jd = rng.random_range(2_300_000.0..2_600_000.0);
            let dist = rng.random_range(3.9..6.5);

            let cml = system_iii_meridian(jd);
            assert!((0.0..360.0).contains(&cml), "cml {cml} out of range");

            let io = io_phase(jd, dist);
            assert!((0.0..360.0).contains(&io), "io phase {io} out of range");
        }
    }

    #[test]
    fn test_cml_drift() {
        // System III turns 870.5° per day relative to the Earth line of sight
        let jd = 2460000.5;
        let step = 1.0 / 1440.0;
        let delta = normalize_degrees(system_iii_meridian(jd + step) - system_iii_meridian(jd));
        assert_abs_diff_eq!(delta, 870.4535567 / 1440.0, epsilon = 1e-3);
    }

    #[test]
    fn test_angular_separation() {
        assert_abs_diff_eq!(angular_separation(350.0, 10.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angular_separation(10.0, 350.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angular_separation(0.0, 180.0), 180.0);
        assert_abs_diff_eq!(angular_separation(-10.0, 10.0), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance() {
        assert_abs_diff_eq!(distance(0.0, 1.0, 90.0, 5.0), 26f64.sqrt(), epsilon = 1e-12);
        // conjunction / opposition
        assert_abs_diff_eq!(distance(40.0, 1.0, 40.0, 5.0), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(distance(40.0, 1.0, 220.0, 5.0), 6.0, epsilon = 1e-12);
        // straddling 0°: a raw difference would give 340°
        assert_abs_diff_eq!(
            distance(350.0, 1.0, 10.0, 5.2),
            distance(0.0, 1.0, 20.0, 5.2),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_distance_symmetry_and_wrap() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let e_lon = rng.random_range(0.0..360.0);
            let j_lon = rng.random_range(0.0..360.0);
            let e_dist = rng.random_range(0.98..1.02);
            let j_dist = rng.random_range(4.9..5.5);

            let d = distance(e_lon, e_dist, j_lon, j_dist);
            assert_abs_diff_eq!(d, distance(j_lon, j_dist, e_lon, e_dist), epsilon = 1e-12);
            assert_abs_diff_eq!(d, distance(e_lon + 360.0, e_dist, j_lon, j_dist), epsilon = 1e-9);
            assert_abs_diff_eq!(d, distance(e_lon, e_dist, j_lon + 360.0, j_dist), epsilon = 1e-9);
            assert!(d >= j_dist - e_dist - 1e-12 && d <= j_dist + e_dist + 1e-12);
        }
    }
}
