//! Indicator panel: three discrete LEDs and a passive buzzer.
//!
//! [`IndicatorPanel`] implements [`IndicatorPort`] over any three
//! [`DigitalOutput`]s and one [`ToneOutput`].  The renderer is called on
//! every loop iteration, so the panel only touches the tone generator
//! when the requested frequency actually changes; retuning the LEDC
//! timer mid-period would otherwise click.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`GpioLed`] and [`LedcBuzzer`] write through hw_init.
//! On host/test: hw_init calls are no-ops; state is tracked in-memory.

use crate::app::ports::{DigitalOutput, IndicatorPort, ToneOutput};
use crate::drivers::hw_init;
use crate::indicator::IndicatorState;

// ── Leaf drivers ─────────────────────────────────────────────

pub struct GpioLed {
    pin: i32,
    on: bool,
}

impl GpioLed {
    pub fn new(pin: i32) -> Self {
        Self { pin, on: false }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl DigitalOutput for GpioLed {
    fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.pin, on);
        self.on = on;
    }
}

#[derive(Default)]
pub struct LedcBuzzer {
    playing: Option<u16>,
}

impl LedcBuzzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playing(&self) -> Option<u16> {
        self.playing
    }
}

impl ToneOutput for LedcBuzzer {
    fn play(&mut self, frequency_hz: u16) {
        hw_init::buzzer_tone(Some(frequency_hz));
        self.playing = Some(frequency_hz);
    }

    fn stop(&mut self) {
        hw_init::buzzer_tone(None);
        self.playing = None;
    }
}

// ── Panel ────────────────────────────────────────────────────

pub struct IndicatorPanel<G, Y, R, B> {
    pub green: G,
    pub yellow: Y,
    pub red: R,
    pub buzzer: B,
    tone_hz: Option<u16>,
}

impl<G, Y, R, B> IndicatorPanel<G, Y, R, B>
where
    G: DigitalOutput,
    Y: DigitalOutput,
    R: DigitalOutput,
    B: ToneOutput,
{
    pub fn new(green: G, yellow: Y, red: R, buzzer: B) -> Self {
        Self {
            green,
            yellow,
            red,
            buzzer,
            tone_hz: None,
        }
    }

    /// Frequency currently requested from the buzzer.
    pub fn tone_hz(&self) -> Option<u16> {
        self.tone_hz
    }
}

impl<G, Y, R, B> IndicatorPort for IndicatorPanel<G, Y, R, B>
where
    G: DigitalOutput,
    Y: DigitalOutput,
    R: DigitalOutput,
    B: ToneOutput,
{
    fn show(&mut self, state: &IndicatorState) {
        self.green.set(state.green);
        self.yellow.set(state.yellow);
        self.red.set(state.red);

        if state.tone_hz != self.tone_hz {
            match state.tone_hz {
                Some(hz) => self.buzzer.play(hz),
                None => self.buzzer.stop(),
            }
            self.tone_hz = state.tone_hz;
        }
    }
}

/// Panel wired to the board's GPIOs and LEDC buzzer.
pub type BoardPanel = IndicatorPanel<GpioLed, GpioLed, GpioLed, LedcBuzzer>;

pub fn board_panel() -> BoardPanel {
    use crate::pins;
    IndicatorPanel::new(
        GpioLed::new(pins::GREEN_LED_GPIO),
        GpioLed::new(pins::YELLOW_LED_GPIO),
        GpioLed::new(pins::RED_LED_GPIO),
        LedcBuzzer::new(),
    )
}
