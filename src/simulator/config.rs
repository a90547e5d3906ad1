//! Simulation configuration.

use crate::build::Background;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated characters
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Maximum ticks per run before giving up
    pub max_ticks_per_run: u64,

    /// Cultivation awarded per tick is drawn uniformly from this range
    pub min_award: u64,
    pub max_award: u64,

    /// Origin, which fixes the starting realm
    pub background: Background,

    /// Skill to train alongside the realm, if any
    pub train_skill: Option<String>,

    /// Chance per tick that cultivation goes to the skill before the realm
    pub skill_focus: f64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            max_ticks_per_run: 100_000,
            min_award: 50,
            max_award: 150,
            background: Background::Mortal,
            train_skill: None,
            skill_focus: 0.25,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Small run for checking realm pacing alone
    pub fn realm_pacing_test() -> Self {
        Self {
            num_runs: 100,
            train_skill: None,
            ..Default::default()
        }
    }

    /// Realm pacing while also training a mid-rank skill
    pub fn mastery_split_test(skill: &str) -> Self {
        Self {
            num_runs: 100,
            train_skill: Some(skill.to_string()),
            skill_focus: 0.5,
            ..Default::default()
        }
    }

    pub fn award_range(&self) -> (u64, u64) {
        (
            self.min_award.min(self.max_award),
            self.min_award.max(self.max_award),
        )
    }
}
