//! Outbound diagnostic events.
//!
//! The [`MonitorService`](super::service::MonitorService) and the
//! calibrator emit these through the
//! [`DiagnosticSink`](super::ports::DiagnosticSink) port.

use crate::classifier::{MetricFlags, Reaction};
use crate::error::SensorError;
use crate::sensors::SensorSnapshot;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Preheat started.
    Preheating { duration_ms: u32 },

    /// A gas sensor's baseline resistance was committed.
    Calibrated { sensor: &'static str, baseline: f32 },

    /// Monitoring loop entered.
    Started,

    /// Periodic diagnostic report.
    Report(Report),

    /// The shared verdict changed.
    VerdictChanged { from: Reaction, to: Reaction },

    /// A sampling tick produced an invalid reading and was not classified.
    ReadingRejected { error: SensorError, holding: bool },
}

/// One diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    /// Most recent valid snapshot, if any has been taken.
    pub snapshot: Option<SensorSnapshot>,
    pub verdict: Reaction,
    pub warnings: MetricFlags,
    pub criticals: MetricFlags,
    /// True while the last sampling tick failed and an older snapshot is held.
    pub stale: bool,
}
