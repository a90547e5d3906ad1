//! Xiuxian - character-build and progression rules for a cultivation RPG.
//!
//! The engine prices attribute, trait and skill choices against a talent
//! budget, hands out depleting random draws, and advances realms and skill
//! mastery from a single cultivation pool. Presentation and narrative live
//! outside this crate.

pub mod build;
pub mod build_info;
pub mod catalog;
pub mod character;
pub mod core;
pub mod error;
pub mod persistence;
pub mod progression;
pub mod simulator;

pub use error::{ConfigError, RulesError, StoreError};
