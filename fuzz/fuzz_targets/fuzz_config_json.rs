//! Fuzz target: `MonitorConfig::from_json` (build-time override path)
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Any configuration that parses also validates
//! - `from_override` always yields a valid configuration
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use envsentry::config::MonitorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = MonitorConfig::from_json(json) {
        assert!(config.validate().is_ok(), "parsed config failed validation");
    }

    let resolved = MonitorConfig::from_override(Some(json));
    assert!(resolved.validate().is_ok());
});
