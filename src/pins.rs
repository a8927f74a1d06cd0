//! GPIO / peripheral pin assignments for the EnvSentry main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Indicator LEDs (discrete, active HIGH)
// ---------------------------------------------------------------------------

pub const GREEN_LED_GPIO: i32 = 2;
pub const YELLOW_LED_GPIO: i32 = 3;
pub const RED_LED_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo driven by an LEDC square wave)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 5;
/// Duty resolution of the buzzer timer.  A 50 % duty square wave is
/// `1 << (BUZZER_DUTY_BITS - 1)`.
pub const BUZZER_DUTY_BITS: u32 = 10;
/// Frequency the LEDC timer is configured with at boot.  Retuned per tone.
pub const BUZZER_IDLE_FREQ_HZ: u32 = 2_000;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Photoresistor divider.  ADC1 channel 6 (GPIO 7 on ESP32-S3).
pub const LIGHT_ADC_GPIO: i32 = 7;
/// MQ-5 combustible gas sensor.  ADC1 channel 7 (GPIO 8).
pub const GAS_ADC_GPIO: i32 = 8;
/// MQ-7 carbon monoxide sensor.  ADC1 channel 8 (GPIO 9).
pub const CO_ADC_GPIO: i32 = 9;

/// ADC1 full-scale count at 12-bit resolution.
pub const ADC_MAX: u16 = 4095;
/// ADC reference voltage with 12 dB attenuation.
pub const ADC_VREF: f32 = 3.3;

// ---------------------------------------------------------------------------
// I²C bus (BME280 climate sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
pub const I2C_FREQ_HZ: u32 = 100_000;
