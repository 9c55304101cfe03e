//! # Reference frames
//!
//! Frame rotations and coordinate conversions between the three frames the forecaster uses:
//!
//! - **Ecliptic** (mean or true ecliptic and equinox of date): where the orbital elements live.
//! - **Equatorial** (true equator and equinox of date): right ascension / declination.
//! - **Horizontal** (observer's local sky): altitude / azimuth, azimuth counted from north
//!   towards east.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI};

/// Cartesian axis used as a rotation pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Construct a rotation matrix around one of the principal axes.
///
/// The rotation follows the **direct (positive/trigonometric)** sense: counter-clockwise when
/// looking along the axis toward the origin. The rotation is applied to the vector in a fixed
/// frame (`x' = R · x`).
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `axis` - Axis of rotation.
///
/// # Returns
///
/// An orthonormal 3×3 rotation matrix.
///
/// # See also
/// * [`ecliptic_to_equatorial`] – a rotation about X by the obliquity
pub fn rotmt(alpha: f64, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotate an ecliptic vector into the equatorial frame sharing the same equinox.
///
/// Arguments
/// ---------
/// * `ecliptic`: Cartesian vector in the ecliptic frame.
/// * `obliquity`: obliquity of the ecliptic in radians (mean or true, matching the vector).
pub fn ecliptic_to_equatorial(ecliptic: &Vector3<f64>, obliquity: Radian) -> Vector3<f64> {
    rotmt(obliquity, Axis::X) * ecliptic
}

/// Convert a Cartesian position vector to spherical coordinates.
///
/// Works in any frame: applied to an equatorial vector it yields right ascension and
/// declination, applied to an ecliptic vector it yields ecliptic longitude and latitude.
///
/// Returns
/// --------
/// * `(alpha, delta, rho)`: longitude-like angle in `[0, 2π)`, latitude-like angle in
///   `[-π/2, π/2]`, and the vector norm. A null vector maps to `(0, 0, 0)`.
pub fn cartesian_to_radec(cartesian_position: Vector3<f64>) -> (f64, f64, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).asin();

    let cos_delta = delta.cos();
    if cos_delta == 0.0 {
        return (0.0, delta, pos_norm);
    }

    let cos_alpha = cartesian_position.x / (pos_norm * cos_delta);
    let sin_alpha = cartesian_position.y / (pos_norm * cos_delta);
    let alpha = sin_alpha.atan2(cos_alpha).rem_euclid(DPI);
    (alpha, delta, pos_norm)
}

/// Inverse of [`cartesian_to_radec`].
pub fn radec_to_cartesian(alpha: Radian, delta: Radian, rho: f64) -> Vector3<f64> {
    let (sin_a, cos_a) = alpha.sin_cos();
    let (sin_d, cos_d) = delta.sin_cos();
    Vector3::new(rho * cos_d * cos_a, rho * cos_d * sin_a, rho * sin_d)
}

/// Convert equatorial coordinates to horizontal coordinates for an observer.
///
/// Arguments
/// ---------
/// * `hour_angle`: local hour angle of the body in radians (positive west of the meridian).
/// * `declination`: declination in radians.
/// * `latitude`: geodetic latitude of the observer in radians.
///
/// Returns
/// --------
/// * `(altitude, azimuth)` in radians. Azimuth is measured from north, increasing towards east,
///   in `[0, 2π)`.
pub fn equatorial_to_horizontal(
    hour_angle: Radian,
    declination: Radian,
    latitude: Radian,
) -> (Radian, Radian) {
    let (sin_h, cos_h) = hour_angle.sin_cos();
    let (sin_d, cos_d) = declination.sin_cos();
    let (sin_p, cos_p) = latitude.sin_cos();

    let sin_alt = (sin_p * sin_d + cos_p * cos_d * cos_h).clamp(-1.0, 1.0);
    let altitude = sin_alt.asin();

    let azimuth = (-cos_d * sin_h)
        .atan2(sin_d * cos_p - cos_d * sin_p * cos_h)
        .rem_euclid(DPI);

    (altitude, azimuth)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use crate::constants::RADEG;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rotmt_is_orthonormal() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let rot = rotmt(0.7, axis);
            let identity = rot * rot.transpose();
            assert_abs_diff_eq!(identity, Matrix3::identity(), epsilon = 1e-15);
            assert_abs_diff_eq!(rot.determinant(), 1.0, epsilon = 1e-15);
        }

        // direct sense: x rotates towards y around z
        let v = rotmt(std::f64::consts::FRAC_PI_2, Axis::Z) * Vector3::x();
        assert_abs_diff_eq!(v, Vector3::y(), epsilon = 1e-15);
    }

    #[test]
    fn test_ecliptic_to_equatorial() {
        let eps = 23.4392911 * RADEG;

        // the equinox direction is shared
        let x = ecliptic_to_equatorial(&Vector3::x(), eps);
        assert_abs_diff_eq!(x, Vector3::x(), epsilon = 1e-15);

        // ecliptic longitude 90° sits at declination +ε
        let (ra, dec, rho) = cartesian_to_radec(ecliptic_to_equatorial(&Vector3::y(), eps));
        assert_abs_diff_eq!(ra, 90.0 * RADEG, epsilon = 1e-12);
        assert_abs_diff_eq!(dec, eps, epsilon = 1e-12);
        assert_abs_diff_eq!(rho, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_cartesian_to_radec() {
        let (alpha, delta, rho) = cartesian_to_radec(Vector3::new(-1.0, -1.0, 0.0));
        assert_abs_diff_eq!(alpha, 225.0 * RADEG, epsilon = 1e-12);
        assert_abs_diff_eq!(delta, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(rho, 2f64.sqrt(), epsilon = 1e-15);

        assert_eq!(cartesian_to_radec(Vector3::zeros()), (0.0, 0.0, 0.0));

        let v = radec_to_cartesian(1.2, -0.4, 5.2);
        let (alpha, delta, rho) = cartesian_to_radec(v);
        assert_abs_diff_eq!(alpha, 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(delta, -0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(rho, 5.2, epsilon = 1e-12);
    }

    #[test]
    fn test_equatorial_to_horizontal() {
        // Venus seen from Washington, 1987 April 10 19:21 UT
        let (alt, az) = equatorial_to_horizontal(
            64.352133 * RADEG,
            -6.719892 * RADEG,
            38.921389 * RADEG,
        );
        assert_abs_diff_eq!(alt, 15.1249 * RADEG, epsilon = 1e-4 * RADEG);
        assert_abs_diff_eq!(az, 248.0337 * RADEG, epsilon = 1e-4 * RADEG);

        // on the meridian, south of zenith
        let (alt, az) = equatorial_to_horizontal(0.0, 0.0, 45.0 * RADEG);
        assert_abs_diff_eq!(alt, 45.0 * RADEG, epsilon = 1e-12);
        assert_abs_diff_eq!(az, 180.0 * RADEG, epsilon = 1e-12);
    }
}
