//! One-shot startup calibration.
//!
//! ```text
//!   beep ─▶ preheat (blocking, LED rotation) ─▶ chirp ─▶ baseline sampling
//! ```
//!
//! The MQ heaters need a fixed warm-up before their resistance settles,
//! so this is the one place the firmware blocks.  Time comes from an
//! injected [`Clock`] and sleeping from an injected [`DelayNs`], which
//! lets tests run a 90 s preheat instantly.
//!
//! After preheat each gas sensor is sampled exactly
//! `calibration_samples` times.  A sample that cannot be read, or whose
//! implied baseline is not a positive finite resistance, is invalid.  Any
//! invalid sample fails calibration: the firmware must not start with a
//! skewed baseline.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{info, warn};

use crate::app::events::MonitorEvent;
use crate::app::ports::{Clock, DiagnosticSink, GasConcentrationSensor, IndicatorPort};
use crate::config::MonitorConfig;
use crate::error::CalibrationError;
use crate::indicator::{IndicatorState, preheat_frame};

/// Power-on beep.
const STARTUP_BEEP: (u16, u32) = (2000, 50);
/// Preheat finished.
const READY_CHIRP: (u16, u32) = (2000, 200);
/// Animation refresh while preheating.
const PREHEAT_FRAME_MS: u32 = 10;

/// Upper bound on sensors calibrated in one run.
pub const MAX_TARGETS: usize = 4;

/// One gas sensor to calibrate.
pub struct CalibrationTarget<'a> {
    pub label: &'static str,
    pub sensor: &'a mut dyn GasConcentrationSensor,
    /// Datasheet `Rs/R0` in clean air.
    pub clean_air_ratio: f32,
}

/// Committed clean-air baseline for one sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub label: &'static str,
    pub r0: f32,
}

pub type Baselines = Vec<Baseline, MAX_TARGETS>;

pub struct Calibrator<'c, C> {
    clock: &'c mut C,
    config: &'c MonitorConfig,
}

impl<'c, C: Clock + DelayNs> Calibrator<'c, C> {
    pub fn new(clock: &'c mut C, config: &'c MonitorConfig) -> Self {
        Self { clock, config }
    }

    /// Full startup sequence.  Blocks for the configured preheat.
    pub fn run(
        &mut self,
        panel: &mut impl IndicatorPort,
        sink: &mut impl DiagnosticSink,
        targets: &mut [CalibrationTarget<'_>],
    ) -> Result<Baselines, CalibrationError> {
        self.beep(panel, STARTUP_BEEP);
        self.preheat(panel, sink);
        self.beep(panel, READY_CHIRP);

        let mut baselines = Baselines::new();
        for target in targets.iter_mut() {
            let r0 = self.establish_baseline(target)?;
            if self.config.logging_enabled() {
                sink.emit(&MonitorEvent::Calibrated {
                    sensor: target.label,
                    baseline: r0,
                });
            }
            // More targets than slots is a wiring mistake in main, not a
            // sensor fault; the baseline is still committed.
            if baselines.push(Baseline { label: target.label, r0 }).is_err() {
                warn!("Calibration: baseline table full, {} not recorded", target.label);
            }
        }
        Ok(baselines)
    }

    /// Rotate the LEDs until `preheat_duration_ms` has elapsed, then clear them.
    pub fn preheat(&mut self, panel: &mut impl IndicatorPort, sink: &mut impl DiagnosticSink) {
        let duration_ms = self.config.preheat_duration_ms;
        info!("Calibration: preheating gas sensors for {duration_ms} ms");
        if self.config.logging_enabled() {
            sink.emit(&MonitorEvent::Preheating { duration_ms });
        }

        let start = self.clock.now_ms();
        loop {
            let now = self.clock.now_ms();
            if now.wrapping_sub(start) >= duration_ms {
                break;
            }
            panel.show(&preheat_frame(now));
            self.clock.delay_ms(PREHEAT_FRAME_MS);
        }
        panel.show(&IndicatorState::DARK);
    }

    /// Average exactly `calibration_samples` baseline samples and commit
    /// the mean to the sensor.
    pub fn establish_baseline(
        &mut self,
        target: &mut CalibrationTarget<'_>,
    ) -> Result<f32, CalibrationError> {
        let required = self.config.calibration_samples;
        let mut valid: u8 = 0;
        let mut sum = 0.0f32;

        for _ in 0..required {
            if let Err(e) = target.sensor.update() {
                warn!("Calibration: {} sample unreadable: {e}", target.label);
                continue;
            }
            let r0 = target.sensor.calibrate_baseline(target.clean_air_ratio);
            if r0.is_finite() && r0 > 0.0 {
                sum += r0;
                valid += 1;
            } else {
                warn!("Calibration: {} sample rejected (R0={r0})", target.label);
            }
        }

        if valid < required {
            return Err(CalibrationError::InsufficientSamples {
                sensor: target.label,
                valid,
                required,
            });
        }

        let mean = sum / f32::from(valid);
        target.sensor.set_baseline(mean);
        info!("Calibration: {} R0={mean:.2} kOhm", target.label);
        Ok(mean)
    }

    fn beep(&mut self, panel: &mut impl IndicatorPort, (hz, duration_ms): (u16, u32)) {
        if !self.config.buzzer_enabled {
            return;
        }
        panel.show(&IndicatorState {
            tone_hz: Some(hz),
            ..IndicatorState::DARK
        });
        self.clock.delay_ms(duration_ms);
        panel.show(&IndicatorState::DARK);
    }
}
