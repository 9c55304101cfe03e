use super::constants::DPI;
use std::f64::consts::PI;

/// Principal value of an angle in radians, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Principal difference `a - b` between two angles, in `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let a = principal_angle(a);
    let b = principal_angle(b);

    let mut diff = a - b;

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Solve Kepler's equation `E - e·sin(E) = M` for an elliptic orbit.
///
/// Newton iteration started from `E₀ = M + e·sin(M)` (or `π` for very eccentric orbits, where
/// the plain guess can overshoot). Convergence is quadratic for `e < 1`; the loop stops when
/// the correction drops below a few ulps.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly `M` in radians (any value, reduced internally).
/// * `e`: eccentricity, `0 ≤ e < 1`.
///
/// Return
/// ------
/// * Eccentric anomaly `E` in radians, in `[0, 2π)`.
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    const ITX: usize = 50;
    let contr = 100.0 * f64::EPSILON;

    let ell = principal_angle(mean_anomaly);
    let mut u = if e < 0.8 { ell + e * ell.sin() } else { PI };

    for _ in 0..ITX {
        let du = -(u - e * u.sin() - ell) / (1.0 - e * u.cos());
        u += du;
        if du.abs() < contr {
            break;
        }
    }

    principal_angle(u)
}

#[cfg(test)]
mod kepler_test {

    use super::*;
    use crate::constants::RADEG;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_principal_angle() {
        assert_abs_diff_eq!(principal_angle(-0.5), DPI - 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(3.0 * DPI + 1.0), 1.0, epsilon = 1e-12);
        assert_eq!(principal_angle(0.0), 0.0);
    }

    #[test]
    fn test_angle_diff() {
        assert_abs_diff_eq!(angle_diff(0.1, DPI - 0.1), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_diff(DPI - 0.1, 0.1), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_diff(1.0, 0.5), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_solve_kepler() {
        let e_anom = solve_kepler(5.0 * RADEG, 0.1);
        assert_abs_diff_eq!(e_anom, 5.554589 * RADEG, epsilon = 1e-6 * RADEG);

        let e_anom = solve_kepler(2.0 * RADEG, 0.99);
        assert_abs_diff_eq!(e_anom, 32.361007 * RADEG, epsilon = 1e-6 * RADEG);

        // circular orbit: E = M
        assert_abs_diff_eq!(solve_kepler(1.3, 0.0), 1.3, epsilon = 1e-15);
    }

    #[test]
    fn test_solve_kepler_residual() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let m: f64 = rng.random_range(-10.0..10.0);
            let e: f64 = rng.random_range(0.0..0.95);
            let u = solve_kepler(m, e);
            assert!((0.0..DPI).contains(&u));
            assert_abs_diff_eq!(angle_diff(u - e * u.sin(), m), 0.0, epsilon = 1e-12);
        }
    }
}
