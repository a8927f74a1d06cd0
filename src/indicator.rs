//! Indicator renderer: verdict + time → LED/buzzer output.
//!
//! The main loop calls [`render`] on every iteration, not on a timer, so
//! the result must depend on nothing but its arguments.  Blink and tone
//! phases come from `now_ms % period` compared with `period / 2`; there
//! are no counters and no edge detection.  A consequence is that a blink
//! does not restart when the verdict changes, it picks up wherever the
//! clock happens to be.
//!
//! ## Mapping
//!
//! | Verdict              | Green | Yellow      | Red         | Buzzer                       |
//! |----------------------|-------|-------------|-------------|------------------------------|
//! | `Normal`             | solid | off         | off         | silent                       |
//! | `WarningSingle`      | off   | solid       | off         | silent                       |
//! | `WarningMultiple`    | off   | blink 1 s   | off         | silent                       |
//! | `CriticalTempHumid`  | off   | off         | blink 2 s   | silent                       |
//! | `CriticalGas`        | off   | off         | solid       | 1500 Hz first half of 1 s    |
//! | `EmergencyCo`        | off   | off         | blink 1 s   | 1500 / 2000 Hz every 200 ms  |

use crate::classifier::Reaction;
use crate::config::MonitorConfig;

/// Rotation window of the warm-up animation.
pub const PREHEAT_WINDOW_MS: u32 = 900;

const GAS_TONE_HZ: u16 = 1500;
const CO_LOW_TONE_HZ: u16 = 1500;
const CO_HIGH_TONE_HZ: u16 = 2000;

// ── Descriptors ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    Off,
    Solid,
    /// 50 % duty, lit during the first half of each period.
    Blink { period_ms: u32 },
}

impl LedMode {
    fn lit(self, now_ms: u32) -> bool {
        match self {
            Self::Off => false,
            Self::Solid => true,
            Self::Blink { period_ms } => first_half(now_ms, period_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerMode {
    Silent,
    /// Tone during the first half of each period, silent the second half.
    Pulsed { hz: u16, period_ms: u32 },
    /// `first_hz` for the first half, `second_hz` for the second; never silent.
    Alternating {
        period_ms: u32,
        first_hz: u16,
        second_hz: u16,
    },
}

impl BuzzerMode {
    fn tone(self, now_ms: u32) -> Option<u16> {
        match self {
            Self::Silent => None,
            Self::Pulsed { hz, period_ms } => first_half(now_ms, period_ms).then_some(hz),
            Self::Alternating {
                period_ms,
                first_hz,
                second_hz,
            } => Some(if first_half(now_ms, period_ms) {
                first_hz
            } else {
                second_hz
            }),
        }
    }
}

/// Static description of how one verdict looks and sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPattern {
    pub green: LedMode,
    pub yellow: LedMode,
    pub red: LedMode,
    pub buzzer: BuzzerMode,
}

impl IndicatorPattern {
    const fn new(green: LedMode, yellow: LedMode, red: LedMode, buzzer: BuzzerMode) -> Self {
        Self {
            green,
            yellow,
            red,
            buzzer,
        }
    }

    /// Resolve the pattern at one instant.
    pub fn at(&self, now_ms: u32) -> IndicatorState {
        IndicatorState {
            green: self.green.lit(now_ms),
            yellow: self.yellow.lit(now_ms),
            red: self.red.lit(now_ms),
            tone_hz: self.buzzer.tone(now_ms),
        }
    }
}

/// Pure lookup, one arm per verdict.
pub const fn pattern(verdict: Reaction) -> IndicatorPattern {
    use BuzzerMode::Silent;
    use LedMode::{Blink, Off, Solid};

    match verdict {
        Reaction::Normal => IndicatorPattern::new(Solid, Off, Off, Silent),
        Reaction::WarningSingle => IndicatorPattern::new(Off, Solid, Off, Silent),
        Reaction::WarningMultiple => {
            IndicatorPattern::new(Off, Blink { period_ms: 1000 }, Off, Silent)
        }
        Reaction::CriticalTempHumid => {
            IndicatorPattern::new(Off, Off, Blink { period_ms: 2000 }, Silent)
        }
        Reaction::CriticalGas => IndicatorPattern::new(
            Off,
            Off,
            Solid,
            BuzzerMode::Pulsed {
                hz: GAS_TONE_HZ,
                period_ms: 1000,
            },
        ),
        Reaction::EmergencyCo => IndicatorPattern::new(
            Off,
            Off,
            Blink { period_ms: 1000 },
            BuzzerMode::Alternating {
                period_ms: 400,
                first_hz: CO_LOW_TONE_HZ,
                second_hz: CO_HIGH_TONE_HZ,
            },
        ),
    }
}

// ── Output ────────────────────────────────────────────────────

/// What the hardware should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorState {
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
    /// `None` means the buzzer is silent.
    pub tone_hz: Option<u16>,
}

impl IndicatorState {
    pub const DARK: Self = Self {
        green: false,
        yellow: false,
        red: false,
        tone_hz: None,
    };

    /// Fatal startup condition: every LED solid, no tone.
    pub const FAULT: Self = Self {
        green: true,
        yellow: true,
        red: true,
        tone_hz: None,
    };

    /// Apply the output switches from the configuration.
    pub fn masked(self, config: &MonitorConfig) -> Self {
        if !config.reactions_enabled {
            return Self::DARK;
        }
        Self {
            tone_hz: self.tone_hz.filter(|_| config.buzzer_enabled),
            ..self
        }
    }
}

/// Indicator output for `verdict` at `now_ms`.
pub fn render(verdict: Reaction, now_ms: u32) -> IndicatorState {
    pattern(verdict).at(now_ms)
}

/// Warm-up rotation: green, yellow, red, one third of the window each.
pub fn preheat_frame(now_ms: u32) -> IndicatorState {
    let third = PREHEAT_WINDOW_MS / 3;
    let pos = now_ms % PREHEAT_WINDOW_MS;
    IndicatorState {
        green: pos < third,
        yellow: (third..2 * third).contains(&pos),
        red: pos >= 2 * third,
        tone_hz: None,
    }
}

fn first_half(now_ms: u32, period_ms: u32) -> bool {
    now_ms % period_ms < period_ms / 2
}
