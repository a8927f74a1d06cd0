//! Threshold classification engine.
//!
//! Turns one [`SensorSnapshot`] into a single severity verdict.  Pure and
//! deterministic: no clock, no I/O, no retained state.
//!
//! ## Resolution order (highest safety priority first)
//!
//! | Condition                               | Verdict              |
//! |-----------------------------------------|----------------------|
//! | CO ≥ critical level                     | `EmergencyCo`        |
//! | combustible gas ≥ critical level        | `CriticalGas`        |
//! | temperature or humidity critical        | `CriticalTempHumid`  |
//! | two or more warning flags               | `WarningMultiple`    |
//! | exactly one warning flag                | `WarningSingle`      |
//! | otherwise                               | `Normal`             |
//!
//! Illuminance has a critical band in the threshold table and its critical
//! flag is reported in [`Assessment::criticals`], but only its *warning*
//! flag takes part in resolution.  A room that is far too dark is a
//! warning, never a critical verdict.

use serde::{Deserialize, Serialize};

use crate::sensors::SensorSnapshot;
use crate::thresholds::ThresholdTable;

/// Severity verdict.  Variant order is severity order, so `Ord` compares
/// severities directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Reaction {
    Normal = 0,
    WarningSingle = 1,
    WarningMultiple = 2,
    CriticalTempHumid = 3,
    CriticalGas = 4,
    EmergencyCo = 5,
}

impl Reaction {
    pub const ALL: [Self; 6] = [
        Self::Normal,
        Self::WarningSingle,
        Self::WarningMultiple,
        Self::CriticalTempHumid,
        Self::CriticalGas,
        Self::EmergencyCo,
    ];

    /// Convert a stored discriminant back to a verdict.
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::WarningSingle => "WARNING_SINGLE",
            Self::WarningMultiple => "WARNING_MULTIPLE",
            Self::CriticalTempHumid => "CRITICAL_TEMP_HUMID",
            Self::CriticalGas => "CRITICAL_GAS",
            Self::EmergencyCo => "EMERGENCY_CO",
        }
    }
}

impl core::fmt::Display for Reaction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flag per metric.  Gas and CO never carry a warning flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricFlags {
    pub temperature: bool,
    pub humidity: bool,
    pub illuminance: bool,
    pub combustible_gas: bool,
    pub carbon_monoxide: bool,
}

impl MetricFlags {
    /// Number of raised flags.
    pub fn count(&self) -> u8 {
        [
            self.temperature,
            self.humidity,
            self.illuminance,
            self.combustible_gas,
            self.carbon_monoxide,
        ]
        .into_iter()
        .filter(|f| *f)
        .count() as u8
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }
}

/// Verdict plus the flags it was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub verdict: Reaction,
    pub warnings: MetricFlags,
    pub criticals: MetricFlags,
}

/// Compute every flag and resolve the verdict.
pub fn assess(snap: &SensorSnapshot, table: &ThresholdTable) -> Assessment {
    let criticals = MetricFlags {
        temperature: table.temperature.is_critical(snap.temperature),
        humidity: table.humidity.is_critical(snap.humidity),
        illuminance: table.illuminance.is_critical(snap.illuminance),
        combustible_gas: table.combustible_gas.is_critical(snap.combustible_gas),
        carbon_monoxide: table.carbon_monoxide.is_critical(snap.carbon_monoxide),
    };
    let warnings = MetricFlags {
        temperature: table.temperature.is_warning(snap.temperature),
        humidity: table.humidity.is_warning(snap.humidity),
        illuminance: table.illuminance.is_warning(snap.illuminance),
        combustible_gas: false,
        carbon_monoxide: false,
    };

    Assessment {
        verdict: resolve(&warnings, &criticals),
        warnings,
        criticals,
    }
}

/// Verdict only.
pub fn classify(snap: &SensorSnapshot, table: &ThresholdTable) -> Reaction {
    assess(snap, table).verdict
}

fn resolve(warnings: &MetricFlags, criticals: &MetricFlags) -> Reaction {
    if criticals.carbon_monoxide {
        return Reaction::EmergencyCo;
    }
    if criticals.combustible_gas {
        return Reaction::CriticalGas;
    }
    if criticals.temperature || criticals.humidity {
        return Reaction::CriticalTempHumid;
    }
    match warnings.count() {
        0 => Reaction::Normal,
        1 => Reaction::WarningSingle,
        _ => Reaction::WarningMultiple,
    }
}
