//! # Text rendering of a forecast
//!
//! Display adaptor printing a [`ForecastRun`] as a framed banner followed by a table of the
//! retained samples.
//!
//! ## Layout
//!
//! ```text
//! ################################################################################
//!                 Jovian Decameter Radio Storm Forecast for:
//!                     2024-12-01 00:00:00 UTC
//!                                 until:
//!                     2024-12-30 23:59:59 UTC
//!                 --- For coordinates 45.5º, -122.6º ---
//!                 Local time zone: -08:00 (-0800)
//! ################################################################################
//! <table>
//! ################################################################################
//! ```
//!
//! The coordinate line only appears for an observer forecast, the time zone line only when a
//! local column was requested.
//!
//! Columns:
//!
//! - without observer: `DY | Date | UTC | [Local] | Phase° | CML | Dist. | Src`
//! - with observer: `DY | Date | UTC | [Local] | Phase° | CML | Dist. | TrHA | Src | Alt. | Az. | Rec`
//!
//! `DY` is the UTC day of year. A local time whose day of year differs from the UTC one is
//! suffixed with `*`. Altitude and azimuth are sexagesimal degrees, the transit hour angle is
//! signed hours.
//!
//! ## Quick example
//!
//! ```rust,ignore
//! println!("{}", run.show().with_seconds_precision(0));
//! ```
use std::fmt;

use chrono::{Datelike, FixedOffset};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::constants::Degree;
use crate::forecast::{localized, ForecastRecord, ForecastRun};
use crate::time::epoch_to_datetime;

const RULE: &str =
    "################################################################################";

/// Display adaptor for a [`ForecastRun`].
///
/// Borrowing only; the table is built when the adaptor is formatted.
pub struct ForecastDisplay<'a> {
    run: &'a ForecastRun,
    sec_prec: usize,
}

impl<'a> ForecastDisplay<'a> {
    pub fn new(run: &'a ForecastRun) -> Self {
        ForecastDisplay { run, sec_prec: 2 }
    }

    /// Fractional digits of the arcseconds in the altitude / azimuth columns.
    pub fn with_seconds_precision(mut self, prec: usize) -> Self {
        self.sec_prec = prec;
        self
    }

    fn header(&self) -> Vec<Cell> {
        let with_local = !self.run.config.display_zone.is_utc();
        let with_sky = self.run.config.observer.is_some();

        let mut names = vec!["DY", "Date", "UTC"];
        if with_local {
            names.push("Local");
        }
        names.extend(["Phase°", "CML", "Dist."]);
        if with_sky {
            names.extend(["TrHA", "Src", "Alt.", "Az.", "Rec"]);
        } else {
            names.push("Src");
        }
        names.into_iter().map(Cell::new).collect()
    }

    fn row(&self, record: &ForecastRecord) -> Row {
        let zone = &self.run.config.display_zone;
        let right = |s: String| Cell::new(s).set_alignment(CellAlignment::Right);

        let utc = epoch_to_datetime(&record.instant);
        let (doy, date, time) = match &utc {
            Some(dt) => (
                dt.ordinal().to_string(),
                dt.format("%b %d").to_string(),
                dt.format("%H:%M").to_string(),
            ),
            None => ("?".into(), record.instant.to_string(), String::new()),
        };

        let mut cells = vec![right(doy), Cell::new(date), Cell::new(time)];

        if !zone.is_utc() {
            let local = match (localized(zone, &record.instant), &utc) {
                (Some(l), Some(u)) => {
                    let marker = if l.ordinal() != u.ordinal() { "*" } else { "" };
                    format!("{}{marker}", l.format("%H:%M"))
                }
                _ => String::new(),
            };
            cells.push(Cell::new(local));
        }

        cells.push(right(format!("{:.2}", record.io_phase)));
        cells.push(right(format!("{:.2}", record.meridian)));
        cells.push(right(format!("{:.2}", record.distance)));

        match &record.local {
            Some(sky) => {
                cells.push(right(format!("{:+.2}", sky.transit_hour_angle)));
                cells.push(Cell::new(record.radio_source.to_string()));
                cells.push(right(fmt_sdms(sky.altitude, self.sec_prec)));
                cells.push(right(fmt_sdms(sky.azimuth, self.sec_prec)));
                cells.push(Cell::new(if record.recommended() { "Y" } else { "N" }));
            }
            None => cells.push(Cell::new(record.radio_source.to_string())),
        }

        Row::from(cells)
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(self.header());

        for record in &self.run.records {
            table.add_row(self.row(record));
        }
        table
    }
}

impl fmt::Display for ForecastDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.run.config;
        let pad = " ".repeat(16);

        writeln!(f, "{RULE}")?;
        writeln!(f, "{pad}Jovian Decameter Radio Storm Forecast for:")?;
        writeln!(f, "{pad}    {}", fmt_instant(&config.start))?;
        writeln!(f, "{pad}                until:")?;
        writeln!(f, "{pad}    {}", fmt_instant(&config.end()))?;
        if let Some(observer) = &config.observer {
            writeln!(f, "{pad}--- For coordinates {observer} ---")?;
        }
        if !config.display_zone.is_utc() {
            if let Some(start) = epoch_to_datetime(&config.start) {
                let offset = config.display_zone.offset_at(&start);
                writeln!(
                    f,
                    "{pad}Local time zone: {} ({})",
                    config.display_zone,
                    fmt_offset(&offset)
                )?;
            }
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "{}", self.table())?;
        writeln!(f, "{RULE}")
    }
}

fn fmt_instant(epoch: &hifitime::Epoch) -> String {
    match epoch_to_datetime(epoch) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => epoch.to_string(),
    }
}

/// `±HHMM` rendering of a UTC offset.
fn fmt_offset(offset: &FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let minutes = total.abs() / 60;
    format!("{sign}{:02}{:02}", minutes / 60, minutes % 60)
}

/// Split an angle in degrees into sign, degrees, arcminutes and arcseconds rounded to `prec`
/// digits, carrying a rounded 60″ into the minutes (and 60′ into the degrees).
pub fn sdms_prec(angle: Degree, prec: usize) -> (char, u32, u32, f64) {
    let sign = if angle < 0.0 { '-' } else { '+' };
    let scale = 10f64.powi(prec as i32);

    let total_arcsec = (angle.abs() * 3600.0 * scale).round() / scale;
    let mut deg = (total_arcsec / 3600.0).floor();
    let mut min = ((total_arcsec - deg * 3600.0) / 60.0).floor();
    let mut sec = total_arcsec - deg * 3600.0 - min * 60.0;

    // floating residue after rounding
    if sec >= 60.0 - 0.5 / scale {
        sec = 0.0;
        min += 1.0;
    }
    if min >= 60.0 {
        min = 0.0;
        deg += 1.0;
    }
    (sign, deg as u32, min as u32, sec.max(0.0))
}

/// Sexagesimal degrees, e.g. `+12°34'56.78"`.
pub fn fmt_sdms(angle: Degree, prec: usize) -> String {
    let (sign, d, m, s) = sdms_prec(angle, prec);
    let width = if prec == 0 { 2 } else { prec + 3 };
    format!("{sign}{d:02}°{m:02}'{s:0width$.prec$}\"")
}

#[cfg(test)]
mod display_test {
    use super::*;
    use crate::forecast::{DisplayZone, ForecastConfig, LocalSky};
    use crate::observers::ObserverCoord;
    use crate::radio_source::RadioSource;
    use hifitime::{Epoch, Unit};

    fn run(observer: bool, zone: DisplayZone) -> ForecastRun {
        let start = Epoch::from_gregorian_utc_at_midnight(2024, 12, 1);
        let mut config = ForecastConfig::new(start, Unit::Hour * 24, Unit::Minute * 30)
            .with_display_zone(zone);
        let local = observer.then_some(LocalSky {
            transit_hour_angle: -1.25,
            altitude: 35.5,
            azimuth: 120.25,
        });
        if observer {
            config = config.with_observer(ObserverCoord::new(45.5, -122.6).unwrap());
        }

        ForecastRun {
            config,
            day_positions: None,
            records: vec![ForecastRecord {
                instant: Epoch::from_gregorian_utc(2024, 12, 1, 23, 30, 0, 0),
                io_phase: 231.456,
                meridian: 250.0,
                distance: 4.0912,
                radio_source: RadioSource::IoA,
                local,
            }],
        }
    }

    #[test]
    fn test_sdms_carry() {
        assert_eq!(sdms_prec(12.5, 2), ('+', 12, 30, 0.0));
        let (_, d, m, s) = sdms_prec(29.999_999_9, 2);
        assert_eq!((d, m, s), (30, 0, 0.0));
        assert_eq!(sdms_prec(-0.5, 0), ('-', 0, 30, 0.0));
    }

    #[test]
    fn test_fmt_sdms() {
        assert_eq!(fmt_sdms(35.5, 2), "+35°30'00.00\"");
        assert_eq!(fmt_sdms(-3.2583333333, 0), "-03°15'30\"");
        assert_eq!(fmt_sdms(120.25, 1), "+120°15'00.0\"");
    }

    #[test]
    fn test_fmt_offset() {
        assert_eq!(fmt_offset(&FixedOffset::west_opt(8 * 3600).unwrap()), "-0800");
        assert_eq!(fmt_offset(&FixedOffset::east_opt(5 * 3600 + 1800).unwrap()), "+0530");
        assert_eq!(fmt_offset(&FixedOffset::west_opt(1800).unwrap()), "-0030");
    }

    #[test]
    fn test_banner_without_observer() {
        let text = run(false, DisplayZone::Utc).show().to_string();
        assert!(text.starts_with(RULE));
        assert!(text.contains("Jovian Decameter Radio Storm Forecast for:"));
        assert!(text.contains("2024-12-01 00:00:00 UTC"));
        assert!(text.contains("2024-12-01 23:59:59 UTC"));
        assert!(!text.contains("For coordinates"));
        assert!(!text.contains("Local time zone"));
        assert!(!text.contains("TrHA"));
        assert!(text.contains("Io-A"));
        assert!(text.contains("231.46"));
        assert!(text.contains("Dec 01"));
    }

    #[test]
    fn test_table_with_observer_and_zone() {
        let zone = DisplayZone::Fixed(FixedOffset::east_opt(3600).unwrap());
        let text = run(true, zone).show().to_string();

        assert!(text.contains("--- For coordinates 45.5º, -122.6º ---"));
        assert!(text.contains("Local time zone: +01:00 (+0100)"));
        for column in ["DY", "Local", "TrHA", "Alt.", "Az.", "Rec"] {
            assert!(text.contains(column), "missing column {column}");
        }
        // 23:30 UTC is 00:30 on the next day
        assert!(text.contains("00:30*"));
        assert!(text.contains("-1.25"));
        assert!(text.contains("+35°30'00.00\""));
        assert!(text.contains("336"));

        let coarse = run(true, zone).show().with_seconds_precision(0).to_string();
        assert!(coarse.contains("+120°15'00\""));
    }

    #[test]
    fn test_header_without_local_column() {
        let text = run(true, DisplayZone::Utc).show().to_string();
        assert!(!text.contains("Local"));
        assert!(text.contains("Rec"));
    }
}
