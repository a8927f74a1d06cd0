//! MQ-series metal-oxide gas sensors (MQ-5 combustible gas, MQ-7 CO).
//!
//! The sensing element sits in a divider with a load resistor `RL`; the
//! ADC sees the voltage across `RL`.  From that we recover the sensor
//! resistance
//!
//! ```text
//!   Rs = (Vref · RL / Vout) − RL
//! ```
//!
//! and convert the ratio to the clean-air baseline `R0` with the
//! datasheet's log-log regression `ppm = a · (Rs/R0)^b`.
//!
//! `R0` is unknown until calibration: with the sensor in clean air, the
//! datasheet gives the expected `Rs/R0`, so each sample yields
//! `R0 = Rs / ratio`.

use crate::app::ports::{AnalogInput, GasConcentrationSensor};
use crate::error::SensorError;
use crate::pins::{ADC_MAX, ADC_VREF};

/// Load resistor on the breakout boards (kΩ).
const LOAD_RESISTOR_KOHM: f32 = 10.0;

/// Regression coefficients and clean-air ratio for one sensor type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MqModel {
    pub name: &'static str,
    pub a: f32,
    pub b: f32,
    /// `Rs/R0` in clean air, from the datasheet sensitivity curve.
    pub clean_air_ratio: f32,
    /// Reading reported when the sensor saturates (Rs → 0).
    pub max_ppm: f32,
}

/// MQ-5, LPG curve.
pub const MQ5: MqModel = MqModel {
    name: "MQ-5",
    a: 1163.8,
    b: -3.874,
    clean_air_ratio: 6.5,
    max_ppm: 10_000.0,
};

/// MQ-7, CO curve.
pub const MQ7: MqModel = MqModel {
    name: "MQ-7",
    a: 99.042,
    b: -1.518,
    clean_air_ratio: 27.5,
    max_ppm: 4_000.0,
};

pub struct MqSensor<A> {
    model: MqModel,
    adc: A,
    /// Voltage from the last `update` (V).
    voltage: f32,
    /// Clean-air baseline (kΩ); `None` until calibrated.
    r0: Option<f32>,
}

impl<A: AnalogInput> MqSensor<A> {
    pub fn new(model: MqModel, adc: A) -> Self {
        Self {
            model,
            adc,
            voltage: 0.0,
            r0: None,
        }
    }

    pub fn baseline(&self) -> Option<f32> {
        self.r0
    }

    /// Sensor resistance (kΩ) for the last voltage.  Infinite when the ADC
    /// reads zero (open circuit / unpowered heater).
    fn rs(&self) -> f32 {
        if self.voltage <= 0.0 {
            return f32::INFINITY;
        }
        if self.voltage >= ADC_VREF {
            return 0.0;
        }
        ((ADC_VREF * LOAD_RESISTOR_KOHM / self.voltage) - LOAD_RESISTOR_KOHM).max(0.0)
    }
}

impl<A: AnalogInput> GasConcentrationSensor for MqSensor<A> {
    fn update(&mut self) -> Result<(), SensorError> {
        let raw = self.adc.read_raw()?;
        self.voltage = f32::from(raw.min(ADC_MAX)) / f32::from(ADC_MAX) * ADC_VREF;
        Ok(())
    }

    /// NaN before calibration, so the snapshot check rejects it.
    fn read_concentration(&self) -> f32 {
        let Some(r0) = self.r0 else {
            return f32::NAN;
        };
        let ratio = self.rs() / r0;
        if ratio <= 0.0 {
            return self.model.max_ppm;
        }
        (self.model.a * ratio.powf(self.model.b)).clamp(0.0, self.model.max_ppm)
    }

    fn calibrate_baseline(&mut self, reference_ratio: f32) -> f32 {
        self.rs() / reference_ratio
    }

    fn set_baseline(&mut self, r0: f32) {
        self.r0 = Some(r0);
    }
}
