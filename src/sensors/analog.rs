//! ADC1 oneshot channel.
//!
//! Backs the light sensor directly and the two MQ gas sensors through
//! [`MqSensor`](super::gas::MqSensor).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` per channel for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::app::ports::AnalogInput;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
const SIM_CHANNELS: usize = 10;

/// `u16::MAX` marks a simulated read failure.
#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [AtomicU16; SIM_CHANNELS] = [const { AtomicU16::new(0) }; SIM_CHANNELS];

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    SIM_ADC[channel as usize % SIM_CHANNELS].store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_adc(channel: u32) {
    SIM_ADC[channel as usize % SIM_CHANNELS].store(u16::MAX, Ordering::Relaxed);
}

pub struct AdcChannel {
    channel: u32,
}

impl AdcChannel {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl AnalogInput for AdcChannel {
    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel).ok_or(SensorError::AdcReadFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        match SIM_ADC[self.channel as usize % SIM_CHANNELS].load(Ordering::Relaxed) {
            u16::MAX => Err(SensorError::AdcReadFailed),
            raw => Ok(raw),
        }
    }
}
