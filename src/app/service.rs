//! Monitor service, the hexagonal core.
//!
//! [`MonitorService`] owns the snapshot producer, the scheduler and the
//! shared verdict.  All I/O flows through port traits injected at call
//! sites, so the whole loop is testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ DiagnosticSink
//!                 │        MonitorService         │
//! IndicatorPort ◀─│ Scheduler · Classifier · Cell │
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info};

use crate::classifier::{Assessment, MetricFlags, Reaction, assess};
use crate::config::MonitorConfig;
use crate::indicator::{IndicatorState, render};
use crate::scheduler::{Scheduler, Task, TaskKind, VerdictCell};
use crate::sensors::{Acquisition, SensorSnapshot, SnapshotProducer};

use super::events::{MonitorEvent, Report};
use super::ports::{DiagnosticSink, IndicatorPort, SensorPort};

/// Verdict shown between the end of calibration and the first
/// successful classification.
pub const INITIAL_VERDICT: Reaction = Reaction::WarningMultiple;

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService<S> {
    config: MonitorConfig,
    producer: SnapshotProducer<S>,
    scheduler: Scheduler,
    verdict: VerdictCell,
    /// Flags behind the current verdict; `None` until the first
    /// successful classification.
    assessment: Option<Assessment>,
    /// Last sampling tick failed and an older snapshot is in effect.
    stale: bool,
    samples_taken: u32,
    samples_rejected: u32,
}

impl<S: SensorPort> MonitorService<S> {
    /// Construct the service.  `config` must already be validated.
    pub fn new(config: MonitorConfig, sensors: S) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.add(Task {
            label: "sampling",
            kind: TaskKind::Sampling,
            period_ms: config.sample_interval_ms,
        });
        scheduler.add(Task {
            label: "diagnostics",
            kind: TaskKind::Diagnostics,
            period_ms: config.diagnostic_interval_ms,
        });
        if !config.logging_enabled() {
            scheduler.set_enabled(TaskKind::Diagnostics, false);
        }

        Self {
            config,
            producer: SnapshotProducer::new(sensors),
            scheduler,
            verdict: VerdictCell::new(INITIAL_VERDICT),
            assessment: None,
            stale: false,
            samples_taken: 0,
            samples_rejected: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl DiagnosticSink) {
        info!(
            "MonitorService started (sampling every {} ms, verdict {})",
            self.config.sample_interval_ms,
            self.verdict.load()
        );
        self.emit(sink, &MonitorEvent::Started);
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One pass of the main loop: run whatever tasks are due, then render
    /// the current verdict unconditionally.  Returns what was shown.
    pub fn tick(
        &mut self,
        now_ms: u32,
        panel: &mut impl IndicatorPort,
        sink: &mut impl DiagnosticSink,
    ) -> IndicatorState {
        for task in self.scheduler.poll(now_ms) {
            match task {
                TaskKind::Sampling => self.sample(now_ms, sink),
                TaskKind::Diagnostics => self.report(sink),
            }
        }

        let state = render(self.verdict.load(), now_ms).masked(&self.config);
        panel.show(&state);
        state
    }

    fn sample(&mut self, now_ms: u32, sink: &mut impl DiagnosticSink) {
        match self.producer.acquire(now_ms) {
            Acquisition::Fresh(snapshot) => {
                self.samples_taken = self.samples_taken.wrapping_add(1);
                self.stale = false;
                let assessment = assess(&snapshot, &self.config.thresholds);
                self.assessment = Some(assessment);

                let previous = self.verdict.store(assessment.verdict);
                if previous != assessment.verdict {
                    info!("Verdict: {} -> {}", previous, assessment.verdict);
                    self.emit(
                        sink,
                        &MonitorEvent::VerdictChanged {
                            from: previous,
                            to: assessment.verdict,
                        },
                    );
                }
            }
            rejected => {
                self.samples_rejected = self.samples_rejected.wrapping_add(1);
                let holding = matches!(rejected, Acquisition::Held { .. });
                self.stale = holding;
                if let Some(error) = rejected.error() {
                    debug!("Sampling: holding={holding}, verdict stays {}", self.verdict.load());
                    self.emit(sink, &MonitorEvent::ReadingRejected { error, holding });
                }
            }
        }
    }

    fn report(&self, sink: &mut impl DiagnosticSink) {
        self.emit(sink, &MonitorEvent::Report(self.build_report()));
    }

    fn emit(&self, sink: &mut impl DiagnosticSink, event: &MonitorEvent) {
        if self.config.logging_enabled() {
            sink.emit(event);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_report(&self) -> Report {
        let (warnings, criticals) = self
            .assessment
            .map_or((MetricFlags::default(), MetricFlags::default()), |a| {
                (a.warnings, a.criticals)
            });
        Report {
            snapshot: self.producer.last_good().copied(),
            verdict: self.verdict.load(),
            warnings,
            criticals,
            stale: self.stale,
        }
    }

    pub fn verdict(&self) -> Reaction {
        self.verdict.load()
    }

    pub fn last_snapshot(&self) -> Option<&SensorSnapshot> {
        self.producer.last_good()
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        self.assessment.as_ref()
    }

    pub fn samples_taken(&self) -> u32 {
        self.samples_taken
    }

    pub fn samples_rejected(&self) -> u32 {
        self.samples_rejected
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        self.producer.source_mut()
    }
}
