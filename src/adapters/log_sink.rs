//! Log-based diagnostic sink adapter.
//!
//! Implements [`DiagnosticSink`] by writing structured monitor events to
//! the ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::{MonitorEvent, Report};
use crate::app::ports::DiagnosticSink;
use crate::classifier::MetricFlags;

/// Adapter that logs every [`MonitorEvent`] to the serial console.
#[derive(Default)]
pub struct LogDiagnosticSink;

impl LogDiagnosticSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for LogDiagnosticSink {
    fn emit(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Report(report) => log_report(report),
            MonitorEvent::VerdictChanged { from, to } => {
                info!("VERDICT | {} -> {}", from, to);
            }
            MonitorEvent::ReadingRejected { error, holding } => {
                warn!(
                    "READING | rejected: {} | {}",
                    error,
                    if *holding { "holding last good" } else { "no valid snapshot yet" }
                );
            }
            MonitorEvent::Preheating { duration_ms } => {
                info!("CALIB | preheating {} s", duration_ms / 1000);
            }
            MonitorEvent::Calibrated { sensor, baseline } => {
                info!("CALIB | {} R0={:.2}kOhm", sensor, baseline);
            }
            MonitorEvent::Started => {
                info!("START | monitoring");
            }
        }
    }
}

fn log_report(r: &Report) {
    match &r.snapshot {
        Some(s) => info!(
            "SAMPLE | T={:.1}\u{00b0}C H={:.1}% L={:.0} | gas={:.0}ppm CO={:.0}ppm | \
             {} | warn=0b{:05b} crit=0b{:05b}{}",
            s.temperature,
            s.humidity,
            s.illuminance,
            s.combustible_gas,
            s.carbon_monoxide,
            r.verdict,
            flag_bits(&r.warnings),
            flag_bits(&r.criticals),
            if r.stale { " | STALE" } else { "" },
        ),
        None => info!("SAMPLE | no valid snapshot | {}", r.verdict),
    }
}

/// Bit 0 = temperature … bit 4 = carbon monoxide.
fn flag_bits(f: &MetricFlags) -> u8 {
    [
        f.temperature,
        f.humidity,
        f.illuminance,
        f.combustible_gas,
        f.carbon_monoxide,
    ]
    .iter()
    .enumerate()
    .fold(0, |bits, (i, set)| bits | (u8::from(*set) << i))
}
