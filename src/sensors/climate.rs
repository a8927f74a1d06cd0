//! BME280 temperature / humidity sensor on I²C.
//!
//! One forced-mode measurement yields both values, so `read_temperature`
//! triggers the measurement and `read_humidity` returns the humidity from
//! that same measurement.  This keeps the two halves of a snapshot
//! coherent and costs a single bus transaction per sampling tick.
//!
//! ## Dual-target design
//!
//! With the `espidf` feature: wraps the `bme280` driver over any
//! embedded-hal 1.0 I²C bus.
//! On host/test: [`SimClimate`] reads from static atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::ports::TemperatureHumiditySensor;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Hardware driver
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub struct Bme280Climate<I2C, D> {
    device: bme280::i2c::BME280<I2C>,
    delay: D,
    humidity: Option<f32>,
}

#[cfg(feature = "espidf")]
impl<I2C, D> Bme280Climate<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
    D: embedded_hal::delay::DelayNs,
{
    /// Probe the sensor at the primary address (0x76) and load its
    /// calibration coefficients.  Fails when nothing answers on the bus.
    pub fn new(i2c: I2C, mut delay: D) -> Result<Self, SensorError> {
        let mut device = bme280::i2c::BME280::new_primary(i2c);
        device.init(&mut delay).map_err(|_| SensorError::BusError)?;
        Ok(Self {
            device,
            delay,
            humidity: None,
        })
    }
}

#[cfg(feature = "espidf")]
impl<I2C, D> TemperatureHumiditySensor for Bme280Climate<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
    D: embedded_hal::delay::DelayNs,
{
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let m = self
            .device
            .measure(&mut self.delay)
            .map_err(|_| SensorError::BusError)?;
        self.humidity = Some(m.humidity);
        Ok(m.temperature)
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        match self.humidity.take() {
            Some(h) => Ok(h),
            None => {
                let m = self
                    .device
                    .measure(&mut self.delay)
                    .map_err(|_| SensorError::BusError)?;
                Ok(m.humidity)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// Bit patterns of the injected `f32` values.  22 °C / 50 %RH at start.
#[cfg(not(target_os = "espidf"))]
static SIM_TEMPERATURE: AtomicU32 = AtomicU32::new(0x41B0_0000);
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY: AtomicU32 = AtomicU32::new(0x4248_0000);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(celsius: f32, humidity: f32) {
    SIM_TEMPERATURE.store(celsius.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY.store(humidity.to_bits(), Ordering::Relaxed);
}

/// Host stand-in for the BME280.  Inject NaN to simulate a bus glitch.
#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct SimClimate;

#[cfg(not(target_os = "espidf"))]
impl TemperatureHumiditySensor for SimClimate {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_TEMPERATURE.load(Ordering::Relaxed)))
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_HUMIDITY.load(Ordering::Relaxed)))
    }
}
