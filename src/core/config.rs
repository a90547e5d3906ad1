//! Designer-tunable balance tables.
//!
//! Every number the engine prices with lives here so balance can be retuned
//! from a JSON file without touching engine code. Fields missing from a JSON
//! file keep their built-in values.

use super::constants::{NUM_MAJOR_REALMS, NUM_MASTERY_LEVELS, NUM_MINOR_REALMS, NUM_SKILL_RANKS};
use crate::build::DrawPoolKind;
use crate::catalog::{CatalogEntry, SkillRank};
use crate::character::AttributeCostModel;
use crate::error::ConfigError;
use crate::progression::{MasteryLevel, RealmStage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A point allowance for the whole build. Exactly one is active per build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentTier {
    pub id: String,
    pub label: String,
    pub total_points: i32,
}

impl TalentTier {
    pub fn new(id: &str, label: &str, total_points: i32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            total_points,
        }
    }
}

/// Flat fee charged per draw, per pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawCosts {
    pub positive_trait: i32,
    pub negative_trait: i32,
    pub mixed_trait: i32,
    pub skill: i32,
}

impl Default for DrawCosts {
    fn default() -> Self {
        Self {
            positive_trait: 5,
            negative_trait: 0,
            mixed_trait: 3,
            skill: 4,
        }
    }
}

impl DrawCosts {
    pub fn get(&self, pool: DrawPoolKind) -> i32 {
        match pool {
            DrawPoolKind::PositiveTrait => self.positive_trait,
            DrawPoolKind::NegativeTrait => self.negative_trait,
            DrawPoolKind::MixedTrait => self.mixed_trait,
            DrawPoolKind::Skill => self.skill,
        }
    }
}

pub type RealmCostTable = [[u64; NUM_MINOR_REALMS]; NUM_MAJOR_REALMS];
pub type MasteryCostTable = [[u64; NUM_MASTERY_LEVELS - 1]; NUM_SKILL_RANKS];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub attribute_costs: AttributeCostModel,
    pub talent_tiers: Vec<TalentTier>,
    /// Point price of a skill, indexed by [`SkillRank::index`].
    pub skill_rank_costs: [i32; NUM_SKILL_RANKS],
    pub draw_costs: DrawCosts,
    /// Cultivation needed to break through INTO `[major][minor]`. The entry
    /// for the very first stage is never charged.
    pub realm_costs: RealmCostTable,
    /// Cultivation to raise a skill of `[rank]` from level `[i]` to `i + 1`.
    pub mastery_costs: MasteryCostTable,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            attribute_costs: AttributeCostModel::default(),
            talent_tiers: vec![
                TalentTier::new("fan_pin", "凡品资质", 20),
                TalentTier::new("liang_pin", "良品资质", 30),
                TalentTier::new("shang_pin", "上品资质", 40),
                TalentTier::new("ji_pin", "极品资质", 50),
                TalentTier::new("tian_ming", "天命之资", 65),
            ],
            skill_rank_costs: [2, 4, 6, 9, 13, 18],
            draw_costs: DrawCosts::default(),
            realm_costs: [
                [0, 100, 150, 220],              // 炼气
                [500, 650, 800, 1_000],          // 筑基
                [2_000, 2_500, 3_000, 3_600],    // 金丹
                [6_000, 7_200, 8_400, 9_800],    // 元婴
                [15_000, 18_000, 21_000, 24_500], // 化神
                [36_000, 42_000, 48_000, 55_000], // 合体
                [80_000, 92_000, 105_000, 120_000], // 大乘
            ],
            mastery_costs: [
                [40, 80, 160, 280, 480],                 // 凡阶
                [100, 200, 400, 700, 1_200],             // 黄阶
                [250, 500, 1_000, 1_750, 3_000],         // 玄阶
                [600, 1_200, 2_400, 4_200, 7_200],       // 地阶
                [1_500, 3_000, 6_000, 10_500, 18_000],   // 天阶
                [3_600, 7_200, 14_400, 25_200, 43_200],  // 仙阶
            ],
        }
    }
}

impl RulesConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn talent_tier(&self, id: &str) -> Option<&TalentTier> {
        self.talent_tiers.iter().find(|t| t.id == id)
    }

    pub fn skill_cost(&self, rank: SkillRank) -> i32 {
        self.skill_rank_costs[rank.index()]
    }

    /// Point price of an entry: a trait's own cost, or its skill rank's cost.
    pub fn entry_cost(&self, entry: &CatalogEntry) -> i32 {
        match entry.rank {
            Some(rank) => self.skill_cost(rank),
            None => entry.cost,
        }
    }

    pub fn draw_cost(&self, pool: DrawPoolKind) -> i32 {
        self.draw_costs.get(pool)
    }

    pub fn realm_cost(&self, stage: RealmStage) -> u64 {
        self.realm_costs[stage.major as usize][stage.minor as usize]
    }

    /// Cost of the next mastery step, or `None` at the final level.
    pub fn mastery_cost(&self, rank: SkillRank, level: MasteryLevel) -> Option<u64> {
        level.next()?;
        Some(self.mastery_costs[rank.index()][level.index()])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.attribute_costs.validate()?;

        if self.talent_tiers.is_empty() {
            return Err(ConfigError::invalid("at least one talent tier is required"));
        }
        for (i, tier) in self.talent_tiers.iter().enumerate() {
            if tier.total_points < 0 {
                return Err(ConfigError::invalid(format!(
                    "talent tier '{}' has a negative allowance",
                    tier.id
                )));
            }
            if self.talent_tiers[..i].iter().any(|t| t.id == tier.id) {
                return Err(ConfigError::invalid(format!(
                    "duplicate talent tier '{}'",
                    tier.id
                )));
            }
        }

        if self.skill_rank_costs.iter().any(|c| *c < 0)
            || self.skill_rank_costs.windows(2).any(|w| w[1] < w[0])
        {
            return Err(ConfigError::invalid(
                "skill rank costs must be non-negative and non-decreasing by rank",
            ));
        }

        let draws = self.draw_costs;
        if [
            draws.positive_trait,
            draws.negative_trait,
            draws.mixed_trait,
            draws.skill,
        ]
        .iter()
        .any(|c| *c < 0)
        {
            return Err(ConfigError::invalid("draw costs must be non-negative"));
        }

        // Strictly increasing along the linear stage order, first stage excluded.
        let mut previous = 0;
        for stage in RealmStage::all().skip(1) {
            let cost = self.realm_cost(stage);
            if cost <= previous {
                return Err(ConfigError::invalid(format!(
                    "realm cost for {} ({cost}) must exceed the previous stage ({previous})",
                    stage.label()
                )));
            }
            previous = cost;
        }

        for (r, row) in self.mastery_costs.iter().enumerate() {
            if row.windows(2).any(|w| w[1] <= w[0]) {
                return Err(ConfigError::invalid(format!(
                    "mastery costs for rank {r} must grow with level"
                )));
            }
            if r > 0 {
                let lower = &self.mastery_costs[r - 1];
                if row.iter().zip(lower.iter()).any(|(hi, lo)| hi < lo) {
                    return Err(ConfigError::invalid(format!(
                        "mastery costs for rank {r} must not undercut rank {}",
                        r - 1
                    )));
                }
            }
        }

        Ok(())
    }
}
