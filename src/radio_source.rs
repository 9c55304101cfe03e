//! # Decameter radio sources
//!
//! Classification of a (CML, Io phase) pair into the named emission windows of Jupiter's
//! decameter radio storms.
//!
//! | Source   | CML `M` (deg)                 | Io phase `I` (deg) |
//! |----------|-------------------------------|--------------------|
//! | Io-A     | 200 ≤ M ≤ 270                 | 205 < I < 260      |
//! | Io-B     | 105 < M < 185                 | 80 < I < 110       |
//! | Io-C     | 300 < M < 360 or 0 < M < 20   | 225 < I < 260      |
//! | non-Io-A | 230 < M < 280                 | any                |
//!
//! Windows are tested in table order and the first match wins. Io-A and non-Io-A overlap in
//! longitude, so a sample inside Io-A's CML range but outside its Io window still falls
//! through to non-Io-A.
//!
//! These boundaries are empirical and have moved between published tables.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::Degree;
use crate::jovian_errors::JovianError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadioSource {
    None,
    IoA,
    IoB,
    IoC,
    NonIoA,
}

impl RadioSource {
    /// Classify a central meridian longitude and Io phase, both in `[0, 360)` degrees.
    pub fn classify(meridian: Degree, io_phase: Degree) -> Self {
        let m = meridian;
        let io = io_phase;

        if (200.0..=270.0).contains(&m) && io > 205.0 && io < 260.0 {
            RadioSource::IoA
        } else if m > 105.0 && m < 185.0 && io > 80.0 && io < 110.0 {
            RadioSource::IoB
        } else if ((m > 300.0 && m < 360.0) || (m > 0.0 && m < 20.0)) && io > 225.0 && io < 260.0
        {
            RadioSource::IoC
        } else if m > 230.0 && m < 280.0 {
            RadioSource::NonIoA
        } else {
            RadioSource::None
        }
    }

    /// Published name of the source; `None` has no name.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            RadioSource::None => None,
            RadioSource::IoA => Some("Io-A"),
            RadioSource::IoB => Some("Io-B"),
            RadioSource::IoC => Some("Io-C"),
            RadioSource::NonIoA => Some("non-Io-A"),
        }
    }

    /// Whether a sample of this class makes it into a forecast.
    pub fn is_reported(&self, include_non_io_a: bool) -> bool {
        match self {
            RadioSource::None => false,
            RadioSource::NonIoA => include_non_io_a,
            RadioSource::IoA | RadioSource::IoB | RadioSource::IoC => true,
        }
    }
}

impl FromStr for RadioSource {
    type Err = JovianError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Io-A" => Ok(RadioSource::IoA),
            "Io-B" => Ok(RadioSource::IoB),
            "Io-C" => Ok(RadioSource::IoC),
            "non-Io-A" => Ok(RadioSource::NonIoA),
            _ => Err(JovianError::InvalidRadioSource(s.to_string())),
        }
    }
}

impl fmt::Display for RadioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().unwrap_or("-"))
    }
}

impl Serialize for RadioSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for RadioSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}
