//! One-shot hardware peripheral initialization.
//!
//! Configures the indicator LED outputs, ADC1 channels and the LEDC
//! buzzer timer using raw ESP-IDF sys calls.  Called once from `main()`
//! before calibration starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC buzzer config failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(match e {
            HwInitError::AdcInitFailed(_) => "ADC1",
            HwInitError::GpioConfigFailed(_) => "indicator GPIO",
            HwInitError::LedcInitFailed(_) => "buzzer LEDC",
        })
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

/// ADC1 channel numbers for the analog sensors (ESP32-S3: GPIOn = CH(n-1)).
pub const ADC1_CH_LIGHT: u32 = 6;
pub const ADC1_CH_GAS: u32 = 7;
pub const ADC1_CH_CO: u32 = 8;

/// Peripheral groups brought up by [`init_peripherals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    IndicatorOutputs,
    Adc,
    Buzzer,
}

/// LED outputs go first so the fault pattern can be shown when a later
/// stage fails.
pub const INIT_ORDER: [InitStage; 3] = [
    InitStage::IndicatorOutputs,
    InitStage::Adc,
    InitStage::Buzzer,
];

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    for stage in INIT_ORDER {
        // SAFETY: Called once from main() before calibration; single-threaded.
        unsafe {
            match stage {
                InitStage::IndicatorOutputs => init_gpio_outputs()?,
                InitStage::Adc => init_adc()?,
                InitStage::Buzzer => init_ledc()?,
            }
        }
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped ({:?})", INIT_ORDER);
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before either reads.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // 12 dB attenuation gives the full 0–3.3 V span the dividers need.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [ADC1_CH_LIGHT, ADC1_CH_GAS, ADC1_CH_CO] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=light, CH{}=MQ-5, CH{}=MQ-7)",
        ADC1_CH_LIGHT, ADC1_CH_GAS, ADC1_CH_CO
    );
    Ok(())
}

/// One oneshot conversion.  `None` when the driver reports an error.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Option<u16> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return None;
    }
    Some(raw.clamp(0, i32::from(pins::ADC_MAX)) as u16)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::GREEN_LED_GPIO,
        pins::YELLOW_LED_GPIO,
        pins::RED_LED_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: indicator LEDs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC buzzer ──────────────────────────────────────────────

pub const LEDC_CH_BUZZER: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: buzzer, retuned per tone
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::BUZZER_DUTY_BITS,
        freq_hz: pins::BUZZER_IDLE_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Channel 0: buzzer, silent at boot
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_BUZZER,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::BUZZER_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (buzzer=CH{})", LEDC_CH_BUZZER);
    Ok(())
}

/// Drive the buzzer: `Some(hz)` retunes the timer and applies a 50 % duty
/// square wave, `None` drops the duty to zero.
#[cfg(target_os = "espidf")]
pub fn buzzer_tone(tone_hz: Option<u16>) {
    let duty = match tone_hz {
        Some(hz) => {
            // SAFETY: timer 0 was configured in init_ledc(); main loop only.
            unsafe {
                ledc_set_freq(
                    ledc_mode_t_LEDC_LOW_SPEED_MODE,
                    ledc_timer_t_LEDC_TIMER_0,
                    u32::from(hz),
                );
            }
            1u32 << (pins::BUZZER_DUTY_BITS - 1)
        }
        None => 0,
    };
    // SAFETY: LEDC channel configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_BUZZER);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_tone(_tone_hz: Option<u16>) {}
