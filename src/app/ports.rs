//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! The leaf capabilities (`DigitalOutput`, `ToneOutput`, `AnalogInput`,
//! `TemperatureHumiditySensor`, `GasConcentrationSensor`) are implemented by
//! drivers.  The aggregate ports (`SensorPort`, `IndicatorPort`,
//! `DiagnosticSink`, `Clock`) are what the [`MonitorService`] and the
//! calibrator consume, so the domain core never touches hardware directly.
//!
//! [`MonitorService`]: super::service::MonitorService

use crate::error::SensorError;
use crate::indicator::IndicatorState;
use crate::sensors::SensorSnapshot;

use super::events::MonitorEvent;

// ───────────────────────────────────────────────────────────────
// Leaf capabilities
// ───────────────────────────────────────────────────────────────

/// One LED or enable line.
pub trait DigitalOutput {
    fn set(&mut self, on: bool);
}

/// Buzzer waveform generator.
pub trait ToneOutput {
    fn play(&mut self, frequency_hz: u16);
    fn stop(&mut self);
}

/// Single ADC channel.
pub trait AnalogInput {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Combined temperature / humidity sensor on the I2C bus.
pub trait TemperatureHumiditySensor {
    /// °C
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
    /// %RH
    fn read_humidity(&mut self) -> Result<f32, SensorError>;
}

/// Resistive gas sensor with a clean-air baseline.
pub trait GasConcentrationSensor {
    /// Take a fresh reading from the underlying channel.
    fn update(&mut self) -> Result<(), SensorError>;

    /// Concentration (ppm) derived from the last `update`.
    fn read_concentration(&self) -> f32;

    /// Baseline resistance implied by the last `update`, assuming the air
    /// is clean and the sensor's clean-air `Rs/R0` equals `reference_ratio`.
    fn calibrate_baseline(&mut self, reference_ratio: f32) -> f32;

    /// Commit the baseline used by every later concentration reading.
    fn set_baseline(&mut self, r0: f32);
}

// ───────────────────────────────────────────────────────────────
// Aggregate ports
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain one snapshot.
pub trait SensorPort {
    /// Read every metric once.  Any invalid reading fails the whole snapshot.
    fn read_all(&mut self, now_ms: u32) -> Result<SensorSnapshot, SensorError>;
}

/// Write-side port: drives the three LEDs and the buzzer.
pub trait IndicatorPort {
    fn show(&mut self, state: &IndicatorState);
}

/// The domain emits structured [`MonitorEvent`]s through this port.
/// Purely observational; nothing here feeds back into classification.
pub trait DiagnosticSink {
    fn emit(&mut self, event: &MonitorEvent);
}

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; every consumer
/// compares instants with wrapping subtraction.
pub trait Clock {
    fn now_ms(&self) -> u32;
}
