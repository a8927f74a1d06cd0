//! Per-metric warning and critical bounds.
//!
//! The table is loaded once with the configuration and never mutated.
//! Temperature, humidity and illuminance each carry a symmetric band
//! (`low_critical ≤ low_warning ≤ high_warning ≤ high_critical`).  The
//! two gases are absent in clean air, so they only carry an upper alarm
//! level.
//!
//! All band checks are strict: a value exactly equal to a bound is in
//! range.  Gas levels are the exception and trigger at `>=`.

use serde::{Deserialize, Serialize};

/// Warning/critical band for a metric that can deviate in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low_critical: f32,
    pub low_warning: f32,
    pub high_warning: f32,
    pub high_critical: f32,
}

impl Band {
    pub const fn new(
        low_critical: f32,
        low_warning: f32,
        high_warning: f32,
        high_critical: f32,
    ) -> Self {
        Self {
            low_critical,
            low_warning,
            high_warning,
            high_critical,
        }
    }

    /// Outside the critical bounds (strictly).
    pub fn is_critical(&self, value: f32) -> bool {
        value < self.low_critical || value > self.high_critical
    }

    /// Outside the warning bounds (strictly).
    pub fn is_warning(&self, value: f32) -> bool {
        value < self.low_warning || value > self.high_warning
    }

    fn is_well_formed(&self) -> bool {
        let bounds = [
            self.low_critical,
            self.low_warning,
            self.high_warning,
            self.high_critical,
        ];
        bounds.iter().all(|b| b.is_finite()) && bounds.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Upper alarm level for a gas that should be absent in the safe case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasLimit {
    /// Concentration (ppm) at or above which the alarm triggers.
    pub critical_level: f32,
}

impl GasLimit {
    pub const fn new(critical_level: f32) -> Self {
        Self { critical_level }
    }

    pub fn is_critical(&self, ppm: f32) -> bool {
        ppm >= self.critical_level
    }
}

/// The complete threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    /// °C
    pub temperature: Band,
    /// %RH
    pub humidity: Band,
    /// Raw light-sensor scale.
    pub illuminance: Band,
    /// ppm after MQ-5 regression.
    pub combustible_gas: GasLimit,
    /// ppm after MQ-7 regression.
    pub carbon_monoxide: GasLimit,
}

impl ThresholdTable {
    /// Reference value set for a habitable enclosed room.
    pub const REFERENCE: Self = Self {
        temperature: Band::new(18.0, 20.0, 25.0, 27.0),
        humidity: Band::new(30.0, 40.0, 60.0, 70.0),
        // 10-bit light scale, see `sensors::light_level`.
        illuminance: Band::new(100.0, 200.0, 800.0, 1000.0),
        combustible_gas: GasLimit::new(600.0),
        carbon_monoxide: GasLimit::new(150.0),
    };

    /// Check that every band is ordered and finite and every gas level is
    /// a positive finite number.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.temperature.is_well_formed() {
            return Err("temperature band must be finite and non-decreasing");
        }
        if !self.humidity.is_well_formed() {
            return Err("humidity band must be finite and non-decreasing");
        }
        if !self.illuminance.is_well_formed() {
            return Err("illuminance band must be finite and non-decreasing");
        }
        for level in [
            self.combustible_gas.critical_level,
            self.carbon_monoxide.critical_level,
        ] {
            if !level.is_finite() || level <= 0.0 {
                return Err("gas critical level must be positive");
            }
        }
        Ok(())
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_is_valid() {
        assert!(ThresholdTable::REFERENCE.validate().is_ok());
    }

    #[test]
    fn band_bounds_do_not_trigger() {
        let band = ThresholdTable::REFERENCE.temperature;
        for bound in [18.0, 27.0] {
            assert!(!band.is_critical(bound), "{bound} must be in range");
        }
        for bound in [20.0, 25.0] {
            assert!(!band.is_warning(bound), "{bound} must be in range");
        }
        assert!(band.is_critical(17.99));
        assert!(band.is_critical(27.01));
        assert!(band.is_warning(19.99));
        assert!(band.is_warning(25.01));
    }

    #[test]
    fn gas_level_triggers_at_equality() {
        let co = ThresholdTable::REFERENCE.carbon_monoxide;
        assert!(!co.is_critical(149.9));
        assert!(co.is_critical(150.0));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut t = ThresholdTable::REFERENCE;
        t.humidity = Band::new(30.0, 60.0, 40.0, 70.0);
        assert!(t.validate().is_err());
    }

    #[test]
    fn nan_bound_is_rejected() {
        let mut t = ThresholdTable::REFERENCE;
        t.illuminance.high_critical = f32::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn zero_gas_level_is_rejected() {
        let mut t = ThresholdTable::REFERENCE;
        t.combustible_gas = GasLimit::new(0.0);
        assert_eq!(t.validate(), Err("gas critical level must be positive"));
    }
}
