//! Sensor subsystem: individual drivers, the aggregating [`SensorHub`] and
//! the [`SnapshotProducer`] that guards classification from bad readings.
//!
//! The hub reads each metric exactly once per call and either returns a
//! complete [`SensorSnapshot`] or the first invalid reading it hit.  The
//! producer turns that into an [`Acquisition`]: a fresh snapshot, the last
//! good snapshot held over a failed read, or nothing at all when no read
//! has ever succeeded.

pub mod analog;
pub mod climate;
pub mod gas;

use core::ops::RangeInclusive;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::{
    AnalogInput, GasConcentrationSensor, SensorPort, TemperatureHumiditySensor,
};
use crate::error::{Metric, SensorError};

/// BME280 operating range.
const TEMPERATURE_RANGE_C: RangeInclusive<f32> = -40.0..=85.0;
const HUMIDITY_RANGE_RH: RangeInclusive<f32> = 0.0..=100.0;
const ILLUMINANCE_RANGE: RangeInclusive<f32> = 0.0..=LIGHT_SCALE_MAX as f32;

/// Full scale of the light metric.  The illuminance bands are expressed on
/// a 10-bit scale, so 12-bit ADC counts are shifted down by two bits.
pub const LIGHT_SCALE_MAX: u16 = crate::pins::ADC_MAX >> 2;

/// Convert a raw 12-bit ADC count to the 10-bit light scale.
pub fn light_level(raw: u16) -> f32 {
    f32::from(raw.min(crate::pins::ADC_MAX) >> 2)
}
const GAS_RANGE_PPM: RangeInclusive<f32> = 0.0..=f32::MAX;

/// One point-in-time reading of all five metrics.  Built once per sampling
/// tick and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Monotonic clock value when the reading was taken.
    pub taken_at_ms: u32,
    /// °C
    pub temperature: f32,
    /// %RH
    pub humidity: f32,
    /// 10-bit light-sensor scale (0 – 1023).
    pub illuminance: f32,
    /// ppm
    pub combustible_gas: f32,
    /// ppm
    pub carbon_monoxide: f32,
}

/// Reject NaN/infinite values and anything outside `range`.
pub fn check_reading(
    metric: Metric,
    value: f32,
    range: &RangeInclusive<f32>,
) -> Result<f32, SensorError> {
    if !value.is_finite() {
        return Err(SensorError::NotANumber(metric));
    }
    if !range.contains(&value) {
        return Err(SensorError::OutOfRange(metric, value));
    }
    Ok(value)
}

// ───────────────────────────────────────────────────────────────
// SensorHub
// ───────────────────────────────────────────────────────────────

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub<C, L, G, K> {
    pub climate: C,
    pub light: L,
    pub gas: G,
    pub co: K,
}

impl<C, L, G, K> SensorHub<C, L, G, K>
where
    C: TemperatureHumiditySensor,
    L: AnalogInput,
    G: GasConcentrationSensor,
    K: GasConcentrationSensor,
{
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(climate: C, light: L, gas: G, co: K) -> Self {
        Self {
            climate,
            light,
            gas,
            co,
        }
    }
}

impl<C, L, G, K> SensorPort for SensorHub<C, L, G, K>
where
    C: TemperatureHumiditySensor,
    L: AnalogInput,
    G: GasConcentrationSensor,
    K: GasConcentrationSensor,
{
    fn read_all(&mut self, now_ms: u32) -> Result<SensorSnapshot, SensorError> {
        let temperature = check_reading(
            Metric::Temperature,
            self.climate.read_temperature()?,
            &TEMPERATURE_RANGE_C,
        )?;
        let humidity = check_reading(
            Metric::Humidity,
            self.climate.read_humidity()?,
            &HUMIDITY_RANGE_RH,
        )?;
        let illuminance = check_reading(
            Metric::Illuminance,
            light_level(self.light.read_raw()?),
            &ILLUMINANCE_RANGE,
        )?;

        self.gas.update()?;
        let combustible_gas = check_reading(
            Metric::CombustibleGas,
            self.gas.read_concentration(),
            &GAS_RANGE_PPM,
        )?;

        self.co.update()?;
        let carbon_monoxide = check_reading(
            Metric::CarbonMonoxide,
            self.co.read_concentration(),
            &GAS_RANGE_PPM,
        )?;

        Ok(SensorSnapshot {
            taken_at_ms: now_ms,
            temperature,
            humidity,
            illuminance,
            combustible_gas,
            carbon_monoxide,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// SnapshotProducer
// ───────────────────────────────────────────────────────────────

/// Outcome of one sampling tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquisition {
    /// Every metric read and passed plausibility checks.
    Fresh(SensorSnapshot),
    /// This tick failed; the last good snapshot is still in effect.
    Held {
        snapshot: SensorSnapshot,
        error: SensorError,
    },
    /// This tick failed and no read has ever succeeded.
    Unavailable(SensorError),
}

impl Acquisition {
    /// The snapshot that should be classified this tick, if it is new.
    pub fn fresh(&self) -> Option<&SensorSnapshot> {
        match self {
            Self::Fresh(s) => Some(s),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<SensorError> {
        match self {
            Self::Fresh(_) => None,
            Self::Held { error, .. } | Self::Unavailable(error) => Some(*error),
        }
    }
}

/// Wraps a [`SensorPort`] with the hold-last-good policy.
pub struct SnapshotProducer<S> {
    source: S,
    last_good: Option<SensorSnapshot>,
}

impl<S: SensorPort> SnapshotProducer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last_good: None,
        }
    }

    /// Read one snapshot.  No retries, no smoothing.
    pub fn acquire(&mut self, now_ms: u32) -> Acquisition {
        match self.source.read_all(now_ms) {
            Ok(snapshot) => {
                self.last_good = Some(snapshot);
                Acquisition::Fresh(snapshot)
            }
            Err(error) => {
                warn!("Sampling rejected: {error}");
                match self.last_good {
                    Some(snapshot) => Acquisition::Held { snapshot, error },
                    None => Acquisition::Unavailable(error),
                }
            }
        }
    }

    /// Most recent snapshot that passed validation.
    pub fn last_good(&self) -> Option<&SensorSnapshot> {
        self.last_good.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
