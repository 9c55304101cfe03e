//! # Logging setup
//!
//! Installs the global `tracing` subscriber used by the `jovian-noise` binary.
//!
//! The filter is read from `RUST_LOG` when set; otherwise it follows the number of `-v` flags
//! given on the command line. Events go to stderr so the forecast on stdout can be piped.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level selected by the count of `-v` flags.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize the global logging subscriber.
///
/// Call once at startup; later calls are ignored.
///
/// Arguments
/// -----------------
/// * `verbosity`: number of `-v` flags, used when `RUST_LOG` is unset or invalid.
pub fn init_logging(verbosity: u8) {
    let level = level_from_verbosity(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod logging_test {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), Level::WARN);
        assert_eq!(level_from_verbosity(1), Level::INFO);
        assert_eq!(level_from_verbosity(2), Level::DEBUG);
        assert_eq!(level_from_verbosity(7), Level::TRACE);
    }

    #[test]
    fn test_init_twice() {
        init_logging(0);
        init_logging(3);
    }
}
