//! Trait and skill registries, and the attribute-triggered entry engine.

pub mod data;
pub mod registry;
pub mod threshold;
pub mod types;

pub use registry::*;
pub use threshold::*;
pub use types::*;
