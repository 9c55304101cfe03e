use std::io::Write;
use std::process::ExitCode;

use chrono::{DateTime, SubsecRound, Utc};
use clap::Parser;
use hifitime::Unit;

use jovian_noise::ephemeris::mean_elements::MeanElementEphemeris;
use jovian_noise::forecast::{
    DisplayZone, ForecastConfig, ForecastRun, DEFAULT_DURATION_HOURS, DEFAULT_INTERVAL_MINUTES,
};
use jovian_noise::jovian_errors::JovianError;
use jovian_noise::logging::init_logging;
use jovian_noise::observers::ObserverCoord;
use jovian_noise::time::{datetime_to_epoch, parse_duration};

#[derive(Parser, Debug)]
#[command(name = "jovian-noise", version)]
#[command(about = "Forecast Jupiter's Io-related decameter radio storms", long_about = None)]
struct Cli {
    /// Start time in RFC 3339 format (defaults to now)
    #[arg(long = "start-time", value_name = "RFC3339")]
    start_time: Option<String>,

    /// Length of the forecast: hours, or a span such as 720h, 90m or 1h30m
    #[arg(long, default_value_t = DEFAULT_DURATION_HOURS.to_string(), value_name = "span", allow_hyphen_values = true)]
    duration: String,

    /// Sampling step
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MINUTES, value_name = "minutes", allow_negative_numbers = true)]
    interval: i64,

    /// Observer latitude in degrees; limits results to when Jupiter is up. Requires --lon
    #[arg(long, value_name = "deg", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Observer longitude in degrees, east positive. Requires --lat
    #[arg(long, value_name = "deg", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Include forecasts for the non-Io-A source
    #[arg(long = "non-io-a", default_value_t = false)]
    non_io_a: bool,

    /// Print the forecast as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Add a column in the system's local time
    #[arg(long = "local-time", default_value_t = false)]
    local_time: bool,

    /// Add a column at a fixed UTC offset (±HH:MM)
    #[arg(long = "utc-offset", value_name = "±HH:MM", allow_hyphen_values = true)]
    utc_offset: Option<String>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn to_config(&self) -> Result<ForecastConfig, JovianError> {
        let start = match &self.start_time {
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map_err(|_| JovianError::InvalidStartTime(s.clone()))?
                .with_timezone(&Utc),
            None => Utc::now().trunc_subsecs(0),
        };

        let observer = ObserverCoord::from_optional(self.lat, self.lon)?;
        let zone = DisplayZone::from_options(self.local_time, self.utc_offset.as_deref())?;

        let mut config = ForecastConfig::new(
            datetime_to_epoch(&start)?,
            parse_duration(&self.duration)?,
            Unit::Minute * self.interval,
        )
        .with_non_io_a(self.non_io_a)
        .with_display_zone(zone);
        if let Some(observer) = observer {
            config = config.with_observer(observer);
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<(), JovianError> {
    let config = cli.to_config()?;
    let forecast = ForecastRun::compute(config, &MeanElementEphemeris::new())?;

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        writeln!(stdout, "{}", forecast.to_json()?)?;
    } else {
        write!(stdout, "{}", forecast.show())?;
    }
    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod main_test {
    use super::*;

    fn config(args: &[&str]) -> Result<ForecastConfig, JovianError> {
        let mut argv = vec!["jovian-noise", "--start-time", "2024-12-01T00:00:00Z"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().to_config()
    }

    #[test]
    fn test_duration_spans() {
        assert_eq!(config(&[]).unwrap().duration, Unit::Hour * 720);
        assert_eq!(config(&["--duration", "90m"]).unwrap().duration, Unit::Minute * 90);
        assert_eq!(config(&["--duration", "36"]).unwrap().duration, Unit::Hour * 36);
    }

    #[test]
    fn test_bad_duration_is_a_config_error() {
        for bad in ["NaN", "inf", "-3", "0"] {
            assert_eq!(
                config(&["--duration", bad]),
                Err(JovianError::InvalidDuration(bad.to_string()))
            );
        }
        assert!(matches!(
            config(&["--duration", "1e20"]),
            Err(JovianError::DurationTooLong { .. })
        ));
    }
}
