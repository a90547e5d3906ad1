use super::mastery::{MasteryGain, SkillMasteryState};
use super::realm::{Breakthrough, RealmStage, RealmState};
use crate::build::CharacterBuild;
use crate::catalog::{Catalog, Category};
use crate::core::RulesConfig;
use crate::error::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info};

/// Gameplay progress of one finalized character: realm, the single
/// cultivation pool, and mastery of every learned skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cultivator {
    #[serde(default)]
    pub build_id: String,
    pub realm: RealmState,
    #[serde(default)]
    pub skills: BTreeMap<String, SkillMasteryState>,
}

impl Cultivator {
    pub fn new(stage: RealmStage) -> Self {
        Self {
            build_id: String::new(),
            realm: RealmState::new(stage),
            skills: BTreeMap::new(),
        }
    }

    /// Starts progress for a finalized build. The background picks the
    /// starting realm; chosen, drawn and attribute-granted skills are learned.
    pub fn from_build(build: &CharacterBuild, catalog: &Catalog) -> Result<Self, RulesError> {
        let mut cultivator = Self::new(build.background.starting_stage());
        cultivator.build_id = build.id.clone();

        let granted = catalog.list_triggered(Category::Skill, &build.attributes);
        let ids = build
            .skills
            .ids()
            .chain(granted.iter().map(|e| e.id.as_str()));
        for id in ids {
            let Some(skill) = catalog.get_in(Category::Skill, id) else {
                error!(build_id = %build.id, skill = %id, "finalized build names an unknown skill");
                return Err(RulesError::CatalogInconsistency(format!(
                    "skill '{id}' is not in the catalog"
                )));
            };
            cultivator
                .skills
                .insert(skill.id.clone(), SkillMasteryState::learn(skill));
        }

        info!(
            build_id = %build.id,
            stage = %cultivator.realm.stage,
            skills = cultivator.skills.len(),
            "cultivator created"
        );
        Ok(cultivator)
    }

    pub fn stage(&self) -> RealmStage {
        self.realm.stage
    }

    pub fn cultivation(&self) -> u64 {
        self.realm.cultivation
    }

    pub fn mastery(&self, skill_id: &str) -> Option<&SkillMasteryState> {
        self.skills.get(skill_id)
    }

    /// Credits cultivation granted by the game loop; returns the new total.
    pub fn award(&mut self, amount: u64) -> u64 {
        self.realm.award(amount)
    }

    pub fn advance_realm(&mut self, config: &RulesConfig) -> Result<Breakthrough, RulesError> {
        let result = self.realm.advance(config)?;
        info!(
            from = %result.from,
            to = %result.to,
            spent = result.spent,
            remaining = result.remaining,
            "breakthrough"
        );
        Ok(result)
    }

    /// Adds a skill at the first mastery level. Returns `false` if it was
    /// already known.
    pub fn learn_skill(&mut self, skill_id: &str, catalog: &Catalog) -> Result<bool, RulesError> {
        let skill = catalog
            .get_in(Category::Skill, skill_id)
            .ok_or_else(|| RulesError::UnknownEntry(skill_id.to_string()))?;
        if self.skills.contains_key(skill_id) {
            return Ok(false);
        }
        self.skills
            .insert(skill.id.clone(), SkillMasteryState::learn(skill));
        info!(skill = %skill_id, "skill learned");
        Ok(true)
    }

    pub fn upgrade_skill(
        &mut self,
        skill_id: &str,
        catalog: &Catalog,
        config: &RulesConfig,
    ) -> Result<MasteryGain, RulesError> {
        let state = self
            .skills
            .get_mut(skill_id)
            .ok_or_else(|| RulesError::SkillNotLearned(skill_id.to_string()))?;
        let Some(skill) = catalog.get_in(Category::Skill, skill_id) else {
            error!(skill = %skill_id, "learned skill missing from catalog");
            return Err(RulesError::CatalogInconsistency(format!(
                "learned skill '{skill_id}' is not in the catalog"
            )));
        };

        let gain = state.upgrade(skill, config, &mut self.realm.cultivation)?;
        info!(
            skill = %skill_id,
            level = gain.to.name(),
            spent = gain.spent,
            unlocked = ?gain.unlocked,
            "mastery raised"
        );
        Ok(gain)
    }
}
