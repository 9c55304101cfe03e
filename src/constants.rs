//! # Constants and type definitions for jovian_noise
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **type
//! aliases** shared by the forecast engine.
//!
//! ## Overview
//!
//! - Angular and temporal unit conversions (degrees ↔ radians, days ↔ seconds)
//! - Reference epochs (J2000, JD ↔ MJD offset)
//! - Empirical constants of the Io/Jupiter model (light time, recommendation cutoff)
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a civil day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Longest forecast accepted, in days
pub const MAX_FORECAST_DAYS: f64 = 3660.0;

/// Mean sidereal day in SI seconds, the period between two transits of a fixed star
pub const SIDEREAL_DAY: f64 = 86_164.0905;

/// Julian Date of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000_JD: f64 = 2_451_545.0;

/// MJD epoch of J2000.0
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Light travel time for one astronomical unit, in days
pub const LIGHT_TIME_DAYS_PER_AU: f64 = 0.005_775_518_3;

/// Divisor turning an Earth–Jupiter distance in AU into the light-time term of the Io
/// phase model (days). This is the rounded value used by the empirical Io formula and is kept
/// as-is so results match published tables.
pub const IO_LIGHT_TIME_DIVISOR: f64 = 173.0;

/// Standard altitude of a star-like body at rising/setting: −0°34′ (refraction at the horizon)
pub const STD_H0_STELLAR: f64 = -34.0 / 60.0 * RADEG;

/// Hour-angle window (hours from transit) inside which a forecast is flagged as recommended
pub const RECOMMEND_CUTOFF_HOURS: f64 = 3.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Julian Date (days, UTC scale unless stated otherwise)
pub type JulianDate = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Signed seconds relative to the start of a UTC day; may lie outside `[0, 86400)`
pub type SecondsOfDay = f64;
/// Signed hours
pub type Hours = f64;
