//! Integration tests for the MonitorService → classifier → indicator pipeline.
//!
//! Drives the service with a manual clock exactly as the main loop does
//! (one `tick` per iteration) and asserts on what reaches the panel and
//! the diagnostic sink.

use envsentry::app::events::MonitorEvent;
use envsentry::app::service::{INITIAL_VERDICT, MonitorService};
use envsentry::classifier::Reaction;
use envsentry::config::{LogMode, MonitorConfig};
use envsentry::error::{Metric, SensorError};
use envsentry::indicator::IndicatorState;
use envsentry::sensors::SensorSnapshot;

use crate::mock_hw::{MockSensors, RecordingPanel, RecordingSink, nominal};

fn make_service(
    config: MonitorConfig,
    snapshot: SensorSnapshot,
) -> (MonitorService<MockSensors>, RecordingPanel, RecordingSink) {
    let mut svc = MonitorService::new(config, MockSensors::new(snapshot));
    let mut sink = RecordingSink::new();
    svc.start(&mut sink);
    (svc, RecordingPanel::new(), sink)
}

/// Tick every `step_ms` from `from` (inclusive) to `to` (exclusive).
fn run(
    svc: &mut MonitorService<MockSensors>,
    panel: &mut RecordingPanel,
    sink: &mut RecordingSink,
    from: u32,
    to: u32,
    step_ms: u32,
) {
    let mut now = from;
    while now < to {
        svc.tick(now, panel, sink);
        now += step_ms;
    }
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn scenario_verdicts_reach_the_panel() {
    let cases = [
        (nominal(), Reaction::Normal),
        (
            SensorSnapshot {
                temperature: 19.5,
                ..nominal()
            },
            Reaction::WarningSingle,
        ),
        (
            SensorSnapshot {
                temperature: 19.5,
                humidity: 35.0,
                illuminance: 150.0,
                ..nominal()
            },
            Reaction::WarningMultiple,
        ),
        (
            SensorSnapshot {
                carbon_monoxide: 160.0,
                ..nominal()
            },
            Reaction::EmergencyCo,
        ),
        (
            SensorSnapshot {
                combustible_gas: 700.0,
                ..nominal()
            },
            Reaction::CriticalGas,
        ),
        (
            SensorSnapshot {
                temperature: 15.0,
                ..nominal()
            },
            Reaction::CriticalTempHumid,
        ),
    ];

    for (snapshot, expected) in cases {
        let (mut svc, mut panel, mut sink) = make_service(MonitorConfig::default(), snapshot);
        svc.tick(0, &mut panel, &mut sink);
        assert_eq!(svc.verdict(), expected, "{snapshot:?}");
        assert_eq!(
            *panel.last().unwrap(),
            envsentry::indicator::render(expected, 0)
        );
    }
}

#[test]
fn first_frame_uses_fresh_verdict_not_initial() {
    let (mut svc, mut panel, mut sink) = make_service(MonitorConfig::default(), nominal());
    assert_eq!(svc.verdict(), INITIAL_VERDICT);
    svc.tick(0, &mut panel, &mut sink);
    assert_eq!(panel.frames.len(), 1);
    assert!(panel.frames[0].green);
}

// ── Scheduling ────────────────────────────────────────────────

#[test]
fn renders_every_tick_but_samples_once_per_second() {
    let (mut svc, mut panel, mut sink) = make_service(MonitorConfig::default(), nominal());
    run(&mut svc, &mut panel, &mut sink, 0, 5000, 10);

    assert_eq!(panel.frames.len(), 500);
    assert_eq!(svc.sensors_mut().reads, 5);
    assert_eq!(svc.samples_taken(), 5);
    assert_eq!(sink.reports().count(), 5);
}

#[test]
fn diagnostic_interval_is_independent() {
    let config = MonitorConfig {
        diagnostic_interval_ms: 2500,
        ..MonitorConfig::default()
    };
    let (mut svc, mut panel, mut sink) = make_service(config, nominal());
    run(&mut svc, &mut panel, &mut sink, 0, 10_000, 50);

    assert_eq!(svc.samples_taken(), 10);
    assert_eq!(sink.reports().count(), 4);
}

#[test]
fn co_alarm_blinks_and_alternates_between_samples() {
    let (mut svc, mut panel, mut sink) = make_service(
        MonitorConfig::default(),
        SensorSnapshot {
            carbon_monoxide: 400.0,
            ..nominal()
        },
    );
    run(&mut svc, &mut panel, &mut sink, 0, 1000, 100);

    let red: Vec<bool> = panel.frames.iter().map(|f| f.red).collect();
    assert_eq!(
        red,
        [true, true, true, true, true, false, false, false, false, false]
    );
    let tones: Vec<Option<u16>> = panel.frames.iter().map(|f| f.tone_hz).collect();
    assert_eq!(
        &tones[..4],
        [Some(1500), Some(1500), Some(2000), Some(2000)]
    );
    assert!(tones.iter().all(Option::is_some));
}

#[test]
fn verdict_change_takes_effect_at_next_sample() {
    let (mut svc, mut panel, mut sink) = make_service(MonitorConfig::default(), nominal());
    svc.tick(0, &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::Normal);

    svc.sensors_mut().set(SensorSnapshot {
        combustible_gas: 650.0,
        ..nominal()
    });
    svc.tick(500, &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::Normal);

    let shown = svc.tick(1000, &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::CriticalGas);
    assert!(shown.red);
    assert_eq!(shown.tone_hz, Some(1500));
    assert!(sink.events.contains(&MonitorEvent::VerdictChanged {
        from: Reaction::Normal,
        to: Reaction::CriticalGas,
    }));
}

#[test]
fn sampling_continues_across_clock_wraparound() {
    let (mut svc, mut panel, mut sink) = make_service(MonitorConfig::default(), nominal());
    let start = u32::MAX - 1500;
    svc.tick(start, &mut panel, &mut sink);
    svc.tick(start.wrapping_add(1000), &mut panel, &mut sink);
    // Wrapped: 2000 ms after start.
    svc.tick(start.wrapping_add(2000), &mut panel, &mut sink);
    svc.tick(start.wrapping_add(2500), &mut panel, &mut sink);
    assert_eq!(svc.samples_taken(), 3);
}

// ── Invalid readings ──────────────────────────────────────────

#[test]
fn invalid_reading_before_any_success_keeps_initial_verdict() {
    let (mut svc, mut panel, mut sink) = make_service(MonitorConfig::default(), nominal());
    svc.sensors_mut().fail(SensorError::BusError);
    svc.tick(0, &mut panel, &mut sink);

    assert_eq!(svc.verdict(), INITIAL_VERDICT);
    assert!(svc.last_snapshot().is_none());
    assert!(sink.events.contains(&MonitorEvent::ReadingRejected {
        error: SensorError::BusError,
        holding: false,
    }));
    let report = sink.reports().last().unwrap();
    assert!(report.snapshot.is_none());
}

#[test]
fn invalid_reading_holds_last_good_snapshot() {
    let (mut svc, mut panel, mut sink) = make_service(
        MonitorConfig::default(),
        SensorSnapshot {
            temperature: 15.0,
            ..nominal()
        },
    );
    svc.tick(0, &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::CriticalTempHumid);

    svc.sensors_mut()
        .fail(SensorError::NotANumber(Metric::Temperature));
    svc.tick(1000, &mut panel, &mut sink);
    svc.tick(2000, &mut panel, &mut sink);

    assert_eq!(svc.verdict(), Reaction::CriticalTempHumid);
    assert_eq!(svc.samples_rejected(), 2);
    assert_eq!(svc.last_snapshot().map(|s| s.taken_at_ms), Some(0));
    let report = sink.reports().last().unwrap();
    assert!(report.stale);
    assert_eq!(report.snapshot.map(|s| s.temperature), Some(15.0));

    svc.sensors_mut().set(nominal());
    svc.tick(3000, &mut panel, &mut sink);
    assert_eq!(svc.verdict(), Reaction::Normal);
    assert!(!svc.build_report().stale);
}

// ── Configuration switches ────────────────────────────────────

#[test]
fn reactions_disabled_keeps_panel_dark() {
    let config = MonitorConfig {
        reactions_enabled: false,
        ..MonitorConfig::default()
    };
    let (mut svc, mut panel, mut sink) = make_service(
        config,
        SensorSnapshot {
            carbon_monoxide: 500.0,
            ..nominal()
        },
    );
    run(&mut svc, &mut panel, &mut sink, 0, 2000, 100);

    assert_eq!(svc.verdict(), Reaction::EmergencyCo);
    assert!(panel.frames.iter().all(|f| *f == IndicatorState::DARK));
}

#[test]
fn buzzer_disabled_keeps_leds() {
    let config = MonitorConfig {
        buzzer_enabled: false,
        ..MonitorConfig::default()
    };
    let (mut svc, mut panel, mut sink) = make_service(
        config,
        SensorSnapshot {
            combustible_gas: 900.0,
            ..nominal()
        },
    );
    run(&mut svc, &mut panel, &mut sink, 0, 1000, 100);

    assert!(panel.frames.iter().all(|f| f.red && f.tone_hz.is_none()));
}

#[test]
fn logging_off_emits_nothing() {
    let config = MonitorConfig {
        logging: LogMode::Off,
        ..MonitorConfig::default()
    };
    let (mut svc, mut panel, mut sink) = make_service(config, nominal());
    svc.sensors_mut().fail(SensorError::AdcReadFailed);
    run(&mut svc, &mut panel, &mut sink, 0, 3000, 100);
    svc.sensors_mut().set(nominal());
    run(&mut svc, &mut panel, &mut sink, 3000, 5000, 100);

    assert!(sink.events.is_empty());
    assert_eq!(sink.verdict_changes(), 0);
    assert_eq!(svc.verdict(), Reaction::Normal);
}
