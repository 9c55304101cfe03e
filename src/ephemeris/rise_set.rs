//! Approximate rising, transit and setting times.
//!
//! Single-pass version of the classic spherical astronomy expressions (Meeus, *Astronomical
//! Algorithms*, eq. 15.1 and 15.2). Right ascension and declination are taken constant over
//! the day, which is plenty for a slow mover like Jupiter: the error stays within a couple of
//! minutes.
//!
//! ```text
//! cos H0 = (sin h0 − sin φ · sin δ) / (cos φ · cos δ)
//! m0     = (α − λ − Θ0) / 2π            (λ east-positive)
//! m1     = m0 − H0 / 2π                   rising
//! m2     = m0 + H0 / 2π                   setting
//! ```
//!
//! Each fraction is reduced into one day and expressed in seconds after 0h UT.

use crate::constants::{Radian, SecondsOfDay, DPI, SECONDS_PER_DAY};
use crate::ephemeris::RiseTransitSet;
use crate::observers::ObserverCoord;

/// Angle (radians) to the fraction of a day it represents, in seconds.
fn angle_to_seconds(angle: Radian) -> SecondsOfDay {
    angle / DPI * SECONDS_PER_DAY
}

/// Local hour angle of the body at rising/setting, or `None` when the body never crosses the
/// altitude `h0` (circumpolar or always below).
pub fn rising_hour_angle(latitude: Radian, h0: Radian, dec: Radian) -> Option<Radian> {
    let cos_h0 = (h0.sin() - latitude.sin() * dec.sin()) / (latitude.cos() * dec.cos());
    if !(-1.0..=1.0).contains(&cos_h0) {
        return None;
    }
    Some(cos_h0.acos())
}

/// Approximate rising, transit and setting times for one day.
///
/// Arguments
/// ---------
/// * `observer`: observing site (east-positive longitude).
/// * `h0`: standard altitude in radians (e.g. [`STD_H0_STELLAR`](crate::constants::STD_H0_STELLAR)).
/// * `theta0`: Greenwich apparent sidereal time at 0h UT, in radians.
/// * `ra`, `dec`: apparent right ascension and declination, in radians.
///
/// Return
/// ------
/// * Seconds after 0h UT for each event, reduced into `[0, 86400)`, or `None` if the body does
///   not rise or set on that day.
pub fn approx_times(
    observer: &ObserverCoord,
    h0: Radian,
    theta0: Radian,
    ra: Radian,
    dec: Radian,
) -> Option<RiseTransitSet> {
    let hour_angle = angle_to_seconds(rising_hour_angle(observer.latitude_rad(), h0, dec)?);
    let transit = angle_to_seconds(ra - observer.longitude_rad() - theta0);

    Some(RiseTransitSet {
        rising: (transit - hour_angle).rem_euclid(SECONDS_PER_DAY),
        transit: transit.rem_euclid(SECONDS_PER_DAY),
        set: (transit + hour_angle).rem_euclid(SECONDS_PER_DAY),
    })
}
