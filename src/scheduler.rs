//! Cooperative task scheduler.
//!
//! Single thread, no preemption.  The main loop polls the scheduler with
//! the current monotonic time on every iteration; the scheduler answers
//! with the tasks whose interval has elapsed.  The indicator renderer is
//! not a scheduled task: it runs on every iteration regardless.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        main loop                              │
//! │                                                               │
//! │   now_ms ──▶ Scheduler::poll ──┬──▶ Sampling    (1000 ms)     │
//! │                                │      snapshot ─▶ classify    │
//! │                                │      ─▶ VerdictCell::store   │
//! │                                │                              │
//! │                                └──▶ Diagnostics (config)      │
//! │                                       VerdictCell::load ─▶ log│
//! │                                                               │
//! │   every iteration: render(VerdictCell::load, now_ms) ─▶ LEDs  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timers compare instants with wrapping `u32` subtraction, so the
//! ~49.7-day rollover of a millisecond counter needs no special case.

use core::sync::atomic::{AtomicU8, Ordering};

use heapless::Vec;
use log::info;

use crate::classifier::Reaction;

// ═══════════════════════════════════════════════════════════════
//  Interval timer
// ═══════════════════════════════════════════════════════════════

/// Software timer holding the instant it last fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period_ms: u32,
    last_fired: Option<u32>,
}

impl IntervalTimer {
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_fired: None,
        }
    }

    /// True (and re-armed at `now_ms`) when a full period has passed since
    /// the last fire.  Always true on the first poll.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let due = match self.last_fired {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= self.period_ms,
        };
        if due {
            self.last_fired = Some(now_ms);
        }
        due
    }
}

// ═══════════════════════════════════════════════════════════════
//  Task slots
// ═══════════════════════════════════════════════════════════════

/// What a due slot asks the caller to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Acquire a snapshot and classify it.
    Sampling,
    /// Emit a diagnostic report.
    Diagnostics,
}

/// A single task registration.
#[derive(Debug, Clone, Copy)]
pub struct Task {
    pub label: &'static str,
    pub kind: TaskKind,
    pub period_ms: u32,
}

/// Maximum number of tasks (stack-allocated).
pub const MAX_TASKS: usize = 4;

/// Tasks due in one poll, in slot order.
pub type DueTasks = Vec<TaskKind, MAX_TASKS>;

#[derive(Debug, Clone, Copy)]
struct TaskEntry {
    task: Task,
    timer: IntervalTimer,
    enabled: bool,
}

pub struct Scheduler {
    slots: [Option<TaskEntry>; MAX_TASKS],
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            slots: [None; MAX_TASKS],
        }
    }

    /// Register a task.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, task: Task) -> Option<usize> {
        let (i, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, s)| s.is_none())?;
        info!(
            "Scheduler: added '{}' every {} ms at slot {}",
            task.label, task.period_ms, i
        );
        *slot = Some(TaskEntry {
            timer: IntervalTimer::new(task.period_ms),
            task,
            enabled: true,
        });
        Some(i)
    }

    /// Enable or disable every slot running `kind`.
    pub fn set_enabled(&mut self, kind: TaskKind, enabled: bool) {
        for entry in self.slots.iter_mut().flatten() {
            if entry.task.kind == kind {
                entry.enabled = enabled;
            }
        }
    }

    /// Collect every enabled task whose interval has elapsed at `now_ms`.
    pub fn poll(&mut self, now_ms: u32) -> DueTasks {
        let mut due = DueTasks::new();
        for entry in self.slots.iter_mut().flatten() {
            if entry.enabled && entry.timer.poll(now_ms) {
                // Capacity equals the slot count, so this cannot overflow.
                let _ = due.push(entry.task.kind);
            }
        }
        due
    }
}

// ═══════════════════════════════════════════════════════════════
//  Shared verdict
// ═══════════════════════════════════════════════════════════════

/// The one piece of state shared between tasks.
///
/// Written only by the sampling task after a complete classification;
/// read by the renderer and diagnostics.  Backed by an atomic so the
/// same guarantee holds if the renderer ever moves to another core.
#[derive(Debug)]
pub struct VerdictCell(AtomicU8);

impl VerdictCell {
    pub const fn new(initial: Reaction) -> Self {
        Self(AtomicU8::new(initial as u8))
    }

    pub fn load(&self) -> Reaction {
        Reaction::from_u8(self.0.load(Ordering::Acquire)).unwrap_or(Reaction::WarningMultiple)
    }

    /// Replace the verdict, returning the previous one.
    pub fn store(&self, verdict: Reaction) -> Reaction {
        let previous = self.0.swap(verdict as u8, Ordering::AcqRel);
        Reaction::from_u8(previous).unwrap_or(Reaction::WarningMultiple)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
