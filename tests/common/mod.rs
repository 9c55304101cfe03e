#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use hifitime::{Epoch, Unit};
use jovian_noise::ephemeris::mean_elements::MeanElementEphemeris;
use jovian_noise::forecast::{ForecastConfig, ForecastRecord, ForecastRun};
use jovian_noise::observers::ObserverCoord;

pub fn midnight(year: i32, month: u8, day: u8) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, month, day)
}

/// Run a forecast with the mean-element ephemeris.
pub fn run_forecast(
    start: Epoch,
    hours: i64,
    interval_minutes: i64,
    observer: Option<(f64, f64)>,
    non_io_a: bool,
) -> ForecastRun {
    let mut config = ForecastConfig::new(start, Unit::Hour * hours, Unit::Minute * interval_minutes)
        .with_non_io_a(non_io_a);
    if let Some((lat, lon)) = observer {
        config = config.with_observer(ObserverCoord::new(lat, lon).unwrap());
    }
    ForecastRun::compute(config, &MeanElementEphemeris::new()).unwrap()
}

pub fn assert_record_close(actual: &ForecastRecord, expected: &ForecastRecord, epsilon: f64) {
    assert_eq!(actual.instant, expected.instant);
    assert_eq!(actual.radio_source, expected.radio_source);
    assert_abs_diff_eq!(actual.meridian, expected.meridian, epsilon = epsilon);
    assert_abs_diff_eq!(actual.io_phase, expected.io_phase, epsilon = epsilon);
    assert_abs_diff_eq!(actual.distance, expected.distance, epsilon = epsilon);
}
