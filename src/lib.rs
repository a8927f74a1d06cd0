//! EnvSentry firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod calibrator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod indicator;
pub mod pins;
pub mod scheduler;
pub mod sensors;
pub mod thresholds;

// Hardware-facing modules compile on the host too; their ESP-IDF paths
// are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
