//! Infrastructure adapters behind the application ports.

pub mod log_sink;
pub mod time;
