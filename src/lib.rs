//! # jovian_noise
//!
//! Forecasts of Jupiter's decameter radio storms driven by the moon Io.
//!
//! A run samples a UTC time range, computes the System III central meridian longitude and Io's
//! orbital phase at each instant, and keeps the samples falling in one of the Io-A, Io-B, Io-C
//! (or non-Io-A) emission windows. With an observer site, samples where Jupiter is below the
//! horizon are dropped and each record gains the hour angle from transit and the alt/az of
//! the planet.
//!
//! ## Modules
//!
//! - [`geometry`]: CML, Io phase, Earth–Jupiter distance
//! - [`radio_source`]: window classifier
//! - [`ephemeris`]: planetary positions and rise/transit/set ([`ephemeris::Ephemeris`])
//! - [`visibility`]: per-day visibility cache and transit bookkeeping
//! - [`forecast`]: sampling driver, records, text and JSON output

pub mod constants;
pub mod earth_orientation;
pub mod ephemeris;
pub mod forecast;
pub mod geometry;
pub mod jovian_errors;
pub mod kepler;
pub mod logging;
pub mod observers;
pub mod radio_source;
pub mod ref_system;
pub mod time;
pub mod visibility;
