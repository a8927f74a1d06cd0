//! Mock hardware adapters for integration tests.
//!
//! Records every indicator frame and diagnostic event so tests can assert
//! on the full output history without touching real GPIO/LEDC registers.

use embedded_hal::delay::DelayNs;
use envsentry::app::events::MonitorEvent;
use envsentry::app::ports::{AnalogInput, Clock, DiagnosticSink, IndicatorPort, SensorPort};
use envsentry::error::SensorError;
use envsentry::indicator::IndicatorState;
use envsentry::sensors::SensorSnapshot;

// ── Sensors ───────────────────────────────────────────────────

/// Nominal room: every metric inside its comfort band.
pub fn nominal() -> SensorSnapshot {
    SensorSnapshot {
        taken_at_ms: 0,
        temperature: 22.0,
        humidity: 50.0,
        illuminance: 500.0,
        combustible_gas: 0.0,
        carbon_monoxide: 0.0,
    }
}

/// Sensor port whose next reading is set by the test.
pub struct MockSensors {
    pub next: Result<SensorSnapshot, SensorError>,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockSensors {
    pub fn new(snapshot: SensorSnapshot) -> Self {
        Self {
            next: Ok(snapshot),
            reads: 0,
        }
    }

    pub fn set(&mut self, snapshot: SensorSnapshot) {
        self.next = Ok(snapshot);
    }

    pub fn fail(&mut self, error: SensorError) {
        self.next = Err(error);
    }
}

impl SensorPort for MockSensors {
    fn read_all(&mut self, now_ms: u32) -> Result<SensorSnapshot, SensorError> {
        self.reads += 1;
        self.next.map(|s| SensorSnapshot {
            taken_at_ms: now_ms,
            ..s
        })
    }
}

/// ADC channel returning a fixed raw count.
pub struct MockAdc(pub Result<u16, SensorError>);

impl AnalogInput for MockAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.0
    }
}

// ── Indicators ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingPanel {
    pub frames: Vec<IndicatorState>,
}

#[allow(dead_code)]
impl RecordingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&IndicatorState> {
        self.frames.last()
    }
}

impl IndicatorPort for RecordingPanel {
    fn show(&mut self, state: &IndicatorState) {
        self.frames.push(*state);
    }
}

// ── Diagnostics ───────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<MonitorEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> impl Iterator<Item = &envsentry::app::events::Report> {
        self.events.iter().filter_map(|e| match e {
            MonitorEvent::Report(r) => Some(r),
            _ => None,
        })
    }

    pub fn verdict_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, MonitorEvent::VerdictChanged { .. }))
            .count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&mut self, event: &MonitorEvent) {
        self.events.push(event.clone());
    }
}

// ── Time ──────────────────────────────────────────────────────

/// Manual clock: advances only when delayed or told to.
pub struct FakeClock {
    pub now: u32,
    pub slept_ms: u64,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn at(now: u32) -> Self {
        Self { now, slept_ms: 0 }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns.div_ceil(1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
        self.slept_ms += u64::from(ms);
    }
}
