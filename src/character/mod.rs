//! Character attributes and their point pricing.

pub mod attributes;
pub mod cost;

pub use attributes::*;
pub use cost::*;
