//! System configuration parameters
//!
//! All tunable parameters for the EnvSentry monitor.  The configuration is
//! fixed for the lifetime of the process; a build-time JSON override can be
//! supplied through the `ENVSENTRY_CONFIG` environment variable when the
//! firmware is compiled.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::thresholds::ThresholdTable;

/// Whether the diagnostic task emits anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    On,
    Off,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Diagnostics ---
    pub logging: LogMode,
    /// Diagnostic report interval (milliseconds)
    pub diagnostic_interval_ms: u32,

    // --- Startup ---
    /// Gas-sensor warm-up before calibration (milliseconds)
    pub preheat_duration_ms: u32,
    /// Baseline samples averaged per gas sensor
    pub calibration_samples: u8,

    // --- Outputs ---
    pub buzzer_enabled: bool,
    /// When false the indicators stay dark after calibration.
    pub reactions_enabled: bool,

    // --- Timing ---
    /// Sensor sampling + classification interval (milliseconds)
    pub sample_interval_ms: u32,

    // --- Classification ---
    pub thresholds: ThresholdTable,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            logging: LogMode::On,
            diagnostic_interval_ms: 1000,

            preheat_duration_ms: 90_000, // MQ heaters need ~90 s
            calibration_samples: 10,

            buzzer_enabled: true,
            reactions_enabled: true,

            sample_interval_ms: 1000, // 1 Hz

            thresholds: ThresholdTable::REFERENCE,
        }
    }
}

impl MonitorConfig {
    /// Parse a JSON override.  Missing fields take their defaults; the
    /// result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON override"))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration from an optional build-time override.
    /// An invalid override is reported and replaced by the defaults.
    pub fn from_override(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => {
                info!("Config: build-time override applied");
                config
            }
            Err(e) => {
                warn!("Config: override rejected ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_interval_ms == 0 {
            return Err(Error::Config("sample_interval_ms must be non-zero"));
        }
        if self.diagnostic_interval_ms == 0 {
            return Err(Error::Config("diagnostic_interval_ms must be non-zero"));
        }
        if self.calibration_samples == 0 {
            return Err(Error::Config("calibration_samples must be non-zero"));
        }
        self.thresholds.validate().map_err(Error::Config)
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging == LogMode::On
    }
}
