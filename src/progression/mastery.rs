//! Per-skill mastery ladder.

use crate::catalog::CatalogEntry;
use crate::core::constants::NUM_MASTERY_LEVELS;
use crate::core::RulesConfig;
use crate::error::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    Novice,
    Apprentice,
    Proficient,
    Expert,
    Master,
    Transcendent,
}

impl MasteryLevel {
    pub const ALL: [MasteryLevel; NUM_MASTERY_LEVELS] = [
        MasteryLevel::Novice,
        MasteryLevel::Apprentice,
        MasteryLevel::Proficient,
        MasteryLevel::Expert,
        MasteryLevel::Master,
        MasteryLevel::Transcendent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MasteryLevel::Novice => "初窥门径",
            MasteryLevel::Apprentice => "略有小成",
            MasteryLevel::Proficient => "融会贯通",
            MasteryLevel::Expert => "炉火纯青",
            MasteryLevel::Master => "登峰造极",
            MasteryLevel::Transcendent => "出神入化",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// `None` at the final level.
    pub fn next(&self) -> Option<MasteryLevel> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

/// Result of a successful mastery upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasteryGain {
    pub skill_id: String,
    pub from: MasteryLevel,
    pub to: MasteryLevel,
    pub spent: u64,
    /// Sub-features revealed by this upgrade.
    pub unlocked: Vec<String>,
}

/// Mastery of one learned skill. `unlocked` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMasteryState {
    pub skill_id: String,
    pub level: MasteryLevel,
    #[serde(default)]
    pub unlocked: BTreeSet<String>,
}

impl SkillMasteryState {
    /// A freshly learned skill, with any first-level features already revealed.
    pub fn learn(skill: &CatalogEntry) -> Self {
        let mut state = Self {
            skill_id: skill.id.clone(),
            level: MasteryLevel::Novice,
            unlocked: BTreeSet::new(),
        };
        state.reveal(skill);
        state
    }

    pub fn is_unlocked(&self, feature: &str) -> bool {
        self.unlocked.contains(feature)
    }

    /// Price of the next upgrade, `None` at the final level.
    pub fn next_cost(&self, skill: &CatalogEntry, config: &RulesConfig) -> Option<u64> {
        config.mastery_cost(skill.rank?, self.level)
    }

    /// Raises mastery one level, paying from `cultivation`. Nothing changes on
    /// failure.
    pub fn upgrade(
        &mut self,
        skill: &CatalogEntry,
        config: &RulesConfig,
        cultivation: &mut u64,
    ) -> Result<MasteryGain, RulesError> {
        if skill.id != self.skill_id {
            return Err(RulesError::CatalogInconsistency(format!(
                "mastery for '{}' upgraded with definition '{}'",
                self.skill_id, skill.id
            )));
        }
        let rank = skill.rank.ok_or_else(|| {
            RulesError::CatalogInconsistency(format!("'{}' is not a skill", skill.id))
        })?;
        let next = self
            .level
            .next()
            .ok_or_else(|| RulesError::TerminalMastery(self.skill_id.clone()))?;
        let cost = config
            .mastery_cost(rank, self.level)
            .ok_or_else(|| RulesError::TerminalMastery(self.skill_id.clone()))?;
        if *cultivation < cost {
            return Err(RulesError::InsufficientCultivation {
                required: cost,
                available: *cultivation,
                shortfall: cost - *cultivation,
            });
        }

        let from = self.level;
        *cultivation -= cost;
        self.level = next;
        let unlocked = self.reveal(skill);

        Ok(MasteryGain {
            skill_id: self.skill_id.clone(),
            from,
            to: next,
            spent: cost,
            unlocked,
        })
    }

    /// Unlocks every feature gated at or below the current level; returns the
    /// newly revealed names.
    fn reveal(&mut self, skill: &CatalogEntry) -> Vec<String> {
        let mut revealed = Vec::new();
        for feature in skill.features_up_to(self.level) {
            if self.unlocked.insert(feature.name.clone()) {
                revealed.push(feature.name.clone());
            }
        }
        revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, SkillRank};

    fn sword_skill() -> CatalogEntry {
        Catalog::builtin()
            .get("qing_yuan_jian_jue")
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_level_order_and_next() {
        assert_eq!(MasteryLevel::Novice.next(), Some(MasteryLevel::Apprentice));
        assert_eq!(MasteryLevel::Transcendent.next(), None);
        assert!(MasteryLevel::Transcendent.is_terminal());
        for pair in MasteryLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_upgrade_debits_and_advances() {
        let config = RulesConfig::default();
        let skill = sword_skill();
        let mut state = SkillMasteryState::learn(&skill);
        let mut cultivation = 1_000;

        let gain = state.upgrade(&skill, &config, &mut cultivation).unwrap();
        assert_eq!(gain.from, MasteryLevel::Novice);
        assert_eq!(gain.to, MasteryLevel::Apprentice);
        assert_eq!(gain.spent, 250);
        assert_eq!(cultivation, 750);
        assert!(gain.unlocked.is_empty());
    }

    #[test]
    fn test_upgrade_reveals_gated_features_once() {
        let config = RulesConfig::default();
        let skill = sword_skill();
        let mut state = SkillMasteryState::learn(&skill);
        let mut cultivation = 100_000;

        state.upgrade(&skill, &config, &mut cultivation).unwrap();
        let gain = state.upgrade(&skill, &config, &mut cultivation).unwrap();
        assert_eq!(gain.to, MasteryLevel::Proficient);
        assert_eq!(gain.unlocked, vec!["剑气化丝".to_string()]);

        let gain = state.upgrade(&skill, &config, &mut cultivation).unwrap();
        assert!(gain.unlocked.is_empty());
        assert!(state.is_unlocked("剑气化丝"));
    }

    #[test]
    fn test_insufficient_cultivation_changes_nothing() {
        let config = RulesConfig::default();
        let skill = sword_skill();
        let mut state = SkillMasteryState::learn(&skill);
        let mut cultivation = 249;

        let err = state.upgrade(&skill, &config, &mut cultivation).unwrap_err();
        assert_eq!(
            err,
            RulesError::InsufficientCultivation {
                required: 250,
                available: 249,
                shortfall: 1,
            }
        );
        assert_eq!(cultivation, 249);
        assert_eq!(state.level, MasteryLevel::Novice);
    }

    #[test]
    fn test_terminal_mastery() {
        let config = RulesConfig::default();
        let skill = sword_skill();
        let mut state = SkillMasteryState::learn(&skill);
        let mut cultivation = u64::MAX;
        while !state.level.is_terminal() {
            state.upgrade(&skill, &config, &mut cultivation).unwrap();
        }
        let before = cultivation;
        assert_eq!(
            state.upgrade(&skill, &config, &mut cultivation),
            Err(RulesError::TerminalMastery("qing_yuan_jian_jue".to_string()))
        );
        assert_eq!(cultivation, before);
        assert!(state.is_unlocked("万剑归宗"));
    }

    #[test]
    fn test_learn_reveals_novice_features() {
        let skill = CatalogEntry::new_skill("s", "S", "", SkillRank::Mortal)
            .with_feature(MasteryLevel::Novice, "basic", "");
        let state = SkillMasteryState::learn(&skill);
        assert!(state.is_unlocked("basic"));
    }

    #[test]
    fn test_higher_rank_costs_more() {
        let config = RulesConfig::default();
        let low = CatalogEntry::new_skill("a", "A", "", SkillRank::Mortal);
        let high = CatalogEntry::new_skill("b", "B", "", SkillRank::Immortal);
        let low_state = SkillMasteryState::learn(&low);
        let high_state = SkillMasteryState::learn(&high);
        assert!(
            high_state.next_cost(&high, &config).unwrap()
                > low_state.next_cost(&low, &config).unwrap()
        );
    }
}
