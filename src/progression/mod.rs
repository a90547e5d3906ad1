//! Post-creation progression: realm breakthroughs and skill mastery, both paid
//! from one cultivation pool.

pub mod cultivator;
pub mod mastery;
pub mod realm;
pub mod shared;

pub use cultivator::Cultivator;
pub use mastery::{MasteryGain, MasteryLevel, SkillMasteryState};
pub use realm::{parse_realm, Breakthrough, RealmStage, RealmState};
pub use shared::SharedCultivator;
