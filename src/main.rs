//! EnvSentry firmware: main entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SensorHub          IndicatorPanel     LogDiagnosticSink       │
//! │  (BME280, ADC, MQ)  (LEDs + buzzer)    (DiagnosticSink)        │
//! │  MonotonicClock                                                │
//! │  (Clock + DelayNs)                                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  Scheduler · Classifier · Renderer · VerdictCell       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Calibrator (runs once, blocking preheat)                      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use core::fmt::Display;

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info};

use envsentry::adapters::log_sink::LogDiagnosticSink;
use envsentry::adapters::time::MonotonicClock;
use envsentry::app::ports::{Clock, IndicatorPort};
use envsentry::app::service::MonitorService;
use envsentry::calibrator::{CalibrationTarget, Calibrator};
use envsentry::config::MonitorConfig;
use envsentry::drivers::hw_init::{self, ADC1_CH_CO, ADC1_CH_GAS, ADC1_CH_LIGHT};
use envsentry::drivers::indicator_panel::board_panel;
use envsentry::error::Error;
use envsentry::indicator::IndicatorState;
use envsentry::pins;
use envsentry::sensors::SensorHub;
use envsentry::sensors::analog::AdcChannel;
use envsentry::sensors::climate::Bme280Climate;
use envsentry::sensors::gas::{MQ5, MQ7, MqSensor};

/// Main-loop yield so the idle task runs.  Short enough that the 200 ms
/// CO tone alternation stays clean.
const LOOP_YIELD_MS: u32 = 10;

// ── Fatal halt ────────────────────────────────────────────────

/// Light every LED, log the cause and park.  Used for any condition that
/// makes monitoring meaningless (no sensors, no baseline).
fn halt(panel: &mut impl IndicatorPort, cause: &dyn Display) -> ! {
    panel.show(&IndicatorState::FAULT);
    error!("FATAL: {}, halting", cause);
    loop {
        FreeRtos::delay_ms(1000);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  EnvSentry v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (build-time override or defaults) ────
    let config = MonitorConfig::from_override(option_env!("ENVSENTRY_CONFIG"));
    info!(
        "Config: preheat={} ms, samples={}, buzzer={}, reactions={}, logging={:?}",
        config.preheat_duration_ms,
        config.calibration_samples,
        config.buzzer_enabled,
        config.reactions_enabled,
        config.logging,
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let mut panel = board_panel();
    if let Err(e) = hw_init::init_peripherals() {
        halt(&mut panel, &Error::from(e));
    }

    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let climate = match Bme280Climate::new(i2c, Ets) {
        Ok(c) => c,
        Err(e) => halt(&mut panel, &Error::from(e)),
    };
    info!("BME280 found on I2C (SDA={}, SCL={})", pins::I2C_SDA_GPIO, pins::I2C_SCL_GPIO);

    // ── 4. Preheat + baseline calibration ─────────────────────
    let mut gas = MqSensor::new(MQ5, AdcChannel::new(ADC1_CH_GAS));
    let mut co = MqSensor::new(MQ7, AdcChannel::new(ADC1_CH_CO));
    let mut clock = MonotonicClock::new();
    let mut sink = LogDiagnosticSink::new();

    {
        let mut targets = [
            CalibrationTarget {
                label: MQ5.name,
                sensor: &mut gas,
                clean_air_ratio: MQ5.clean_air_ratio,
            },
            CalibrationTarget {
                label: MQ7.name,
                sensor: &mut co,
                clean_air_ratio: MQ7.clean_air_ratio,
            },
        ];
        let calibrated =
            Calibrator::new(&mut clock, &config).run(&mut panel, &mut sink, &mut targets);
        if let Err(e) = calibrated {
            halt(&mut panel, &Error::from(e));
        }
    }

    // ── 5. Monitoring loop ────────────────────────────────────
    let hub = SensorHub::new(climate, AdcChannel::new(ADC1_CH_LIGHT), gas, co);
    let mut service = MonitorService::new(config, hub);
    service.start(&mut sink);

    loop {
        service.tick(clock.now_ms(), &mut panel, &mut sink);
        clock.delay_ms(LOOP_YIELD_MS);
    }
}
