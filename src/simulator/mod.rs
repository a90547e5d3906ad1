//! Cultivation balance simulator for Monte Carlo analysis.
//!
//! Runs many seeded characters through the realm and mastery ladders with
//! random cultivation awards to check how the configured cost tables pace:
//! - Ticks to enter each major realm
//! - Share of runs that reach the peak
//! - Mastery reached when a skill is trained alongside the realm
//!
//! Every run drives `Cultivator`, so results follow the real rules.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_run};
