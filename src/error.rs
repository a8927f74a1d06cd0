//! Unified error types for the EnvSentry firmware.
//!
//! Classification and rendering are total functions, so every variant
//! here belongs to one of the two fallible boundaries: acquiring sensor
//! readings and establishing gas-sensor baselines at startup.  All
//! variants are `Copy` so they can be held alongside the last good
//! snapshot and passed to the diagnostic sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// Gas-sensor baselines could not be established.
    Calibration(CalibrationError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Calibration(e) => write!(f, "calibration: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Which of the five monitored quantities a reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Humidity,
    Illuminance,
    CombustibleGas,
    CarbonMonoxide,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Illuminance => "illuminance",
            Self::CombustibleGas => "combustible gas",
            Self::CarbonMonoxide => "carbon monoxide",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorError {
    /// I2C transaction with the climate sensor failed.
    BusError,
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// The collaborator produced NaN or infinity.
    NotANumber(Metric),
    /// Reading is outside the physically plausible range.
    OutOfRange(Metric, f32),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusError => write!(f, "I2C bus error"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::NotANumber(m) => write!(f, "{m} reading is not a number"),
            Self::OutOfRange(m, v) => write!(f, "{m} reading {v} out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Calibration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// Fewer valid baseline samples than required were obtained.
    InsufficientSamples {
        sensor: &'static str,
        valid: u8,
        required: u8,
    },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientSamples {
                sensor,
                valid,
                required,
            } => write!(
                f,
                "{sensor}: only {valid} of {required} baseline samples valid"
            ),
        }
    }
}

impl From<CalibrationError> for Error {
    fn from(e: CalibrationError) -> Self {
        Self::Calibration(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
