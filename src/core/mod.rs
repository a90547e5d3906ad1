//! Engine-wide constants and balance configuration.

pub mod config;
pub mod constants;

pub use config::*;
