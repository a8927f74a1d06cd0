//! Integration tests for startup calibration feeding the monitoring loop.
//!
//! Uses the real MQ regression drivers over mock or simulated ADC
//! channels, so a baseline established here is the one every later
//! concentration reading divides by.

use envsentry::app::events::MonitorEvent;
use envsentry::app::ports::GasConcentrationSensor;
use envsentry::app::service::MonitorService;
use envsentry::calibrator::{CalibrationTarget, Calibrator};
use envsentry::classifier::Reaction;
use envsentry::config::MonitorConfig;
use envsentry::drivers::hw_init::{ADC1_CH_CO, ADC1_CH_GAS, ADC1_CH_LIGHT};
use envsentry::error::{CalibrationError, SensorError};
use envsentry::indicator::{IndicatorState, preheat_frame};
use envsentry::sensors::SensorHub;
use envsentry::sensors::analog::{AdcChannel, sim_set_adc};
use envsentry::sensors::climate::{SimClimate, sim_set_climate};
use envsentry::sensors::gas::{MQ5, MQ7, MqSensor};

use crate::mock_hw::{FakeClock, MockAdc, RecordingPanel, RecordingSink};

fn short_preheat() -> MonitorConfig {
    MonitorConfig {
        preheat_duration_ms: 900,
        ..MonitorConfig::default()
    }
}

#[test]
fn preheat_then_chirp_then_baselines() {
    let config = short_preheat();
    let mut clock = FakeClock::at(0);
    let mut panel = RecordingPanel::new();
    let mut sink = RecordingSink::new();
    let mut gas = MqSensor::new(MQ5, MockAdc(Ok(400)));
    let mut co = MqSensor::new(MQ7, MockAdc(Ok(300)));

    let baselines = {
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
        Calibrator::new(&mut clock, &config)
            .run(&mut panel, &mut sink, &mut targets)
            .unwrap()
    };

    // Beep, 90 preheat frames, clear, chirp on, chirp off.
    assert_eq!(panel.frames.len(), 2 + 90 + 1 + 2);
    assert_eq!(panel.frames[0].tone_hz, Some(2000));
    assert_eq!(panel.frames[1], IndicatorState::DARK);
    assert_eq!(panel.frames[2], preheat_frame(50));
    assert_eq!(panel.frames[92], IndicatorState::DARK);
    assert_eq!(panel.frames[93].tone_hz, Some(2000));
    assert_eq!(clock.slept_ms, 50 + 900 + 200);

    assert_eq!(baselines.len(), 2);
    assert_eq!(gas.baseline(), Some(baselines[0].r0));
    assert_eq!(co.baseline(), Some(baselines[1].r0));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        MonitorEvent::Calibrated { sensor: "MQ-7", .. }
    )));

    // Clean air after calibration reads as almost nothing.
    gas.update().unwrap();
    co.update().unwrap();
    assert!(gas.read_concentration() < 1.0);
    assert!(co.read_concentration() < 1.0);
}

#[test]
fn dead_gas_channel_is_fatal() {
    let config = short_preheat();
    let mut clock = FakeClock::at(0);
    let mut panel = RecordingPanel::new();
    let mut sink = RecordingSink::new();
    let mut gas = MqSensor::new(MQ5, MockAdc(Ok(0)));

    let err = Calibrator::new(&mut clock, &config)
        .run(
            &mut panel,
            &mut sink,
            &mut [CalibrationTarget {
                label: MQ5.name,
                sensor: &mut gas,
                clean_air_ratio: MQ5.clean_air_ratio,
            }],
        )
        .unwrap_err();

    assert_eq!(
        err,
        CalibrationError::InsufficientSamples {
            sensor: "MQ-5",
            valid: 0,
            required: 10,
        }
    );
    assert_eq!(gas.baseline(), None);
}

#[test]
fn failing_adc_is_fatal() {
    let config = short_preheat();
    let mut clock = FakeClock::at(0);
    let mut co = MqSensor::new(MQ7, MockAdc(Err(SensorError::AdcReadFailed)));
    let mut target = CalibrationTarget {
        label: MQ7.name,
        sensor: &mut co,
        clean_air_ratio: MQ7.clean_air_ratio,
    };
    assert!(matches!(
        Calibrator::new(&mut clock, &config).establish_baseline(&mut target),
        Err(CalibrationError::InsufficientSamples { valid: 0, .. })
    ));
}

/// Full host pipeline over the simulated board: calibrate in clean air,
/// then flood the CO sensor.  Only this test touches the simulated
/// channels.
#[test]
fn simulated_board_end_to_end() {
    sim_set_climate(22.0, 50.0);
    sim_set_adc(ADC1_CH_LIGHT, 2000);
    sim_set_adc(ADC1_CH_GAS, 400);
    sim_set_adc(ADC1_CH_CO, 300);

    let config = short_preheat();
    let mut clock = FakeClock::at(0);
    let mut panel = RecordingPanel::new();
    let mut sink = RecordingSink::new();
    let mut gas = MqSensor::new(MQ5, AdcChannel::new(ADC1_CH_GAS));
    let mut co = MqSensor::new(MQ7, AdcChannel::new(ADC1_CH_CO));

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
        Calibrator::new(&mut clock, &config)
            .run(&mut panel, &mut sink, &mut targets)
            .unwrap();
    }

    let hub = SensorHub::new(SimClimate, AdcChannel::new(ADC1_CH_LIGHT), gas, co);
    let mut svc = MonitorService::new(config, hub);
    svc.start(&mut sink);

    let now = clock.now;
    svc.tick(now, &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::Normal);
    let snap = *svc.last_snapshot().unwrap();
    assert_eq!(snap.illuminance, 500.0);
    assert!(snap.carbon_monoxide < 1.0);

    sim_set_adc(ADC1_CH_CO, 3600);
    svc.tick(now.wrapping_add(1000), &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::EmergencyCo);
    assert!(svc.last_snapshot().unwrap().carbon_monoxide >= 150.0);

    sim_set_climate(f32::NAN, 50.0);
    svc.tick(now.wrapping_add(2000), &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::EmergencyCo);
    assert_eq!(svc.samples_rejected(), 1);
}
