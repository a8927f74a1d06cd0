//! Indicator drivers and hardware initialisation.

pub mod hw_init;
pub mod indicator_panel;
