//! Fuzz target: classifier + renderer over raw `f32` bit patterns
//!
//! Feeds arbitrary bits (NaN, infinities, subnormals included) straight
//! into `assess`, bypassing the plausibility checks the sensor hub
//! applies, then renders the verdict at an arbitrary instant.
//!
//! Invariants checked:
//! - No panics for any snapshot or timestamp
//! - CO at or above its critical level always yields `EmergencyCo`
//! - Rendering twice yields identical output
//!
//! cargo fuzz run fuzz_classifier

#![no_main]

use envsentry::classifier::{Reaction, assess};
use envsentry::indicator::render;
use envsentry::sensors::SensorSnapshot;
use envsentry::thresholds::ThresholdTable;
use libfuzzer_sys::fuzz_target;

fn f32_at(data: &[u8], i: usize) -> f32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&data[i * 4..i * 4 + 4]);
    f32::from_le_bytes(b)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 24 {
        return;
    }

    let snap = SensorSnapshot {
        taken_at_ms: 0,
        temperature: f32_at(data, 0),
        humidity: f32_at(data, 1),
        illuminance: f32_at(data, 2),
        combustible_gas: f32_at(data, 3),
        carbon_monoxide: f32_at(data, 4),
    };
    let now = u32::from_le_bytes([data[20], data[21], data[22], data[23]]);

    let table = ThresholdTable::REFERENCE;
    let a = assess(&snap, &table);
    if snap.carbon_monoxide >= table.carbon_monoxide.critical_level {
        assert_eq!(a.verdict, Reaction::EmergencyCo);
    }
    assert_eq!(render(a.verdict, now), render(a.verdict, now));
});
