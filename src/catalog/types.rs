//! Catalog entry definitions.

use crate::character::{AttributeType, Attributes};
use crate::progression::MasteryLevel;
use serde::{Deserialize, Serialize};

/// Which registry an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trait,
    Skill,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Trait, Category::Skill];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Trait => "Trait",
            Category::Skill => "Skill",
        }
    }
}

/// Skill grade. Ordered from lowest to highest; a skill's point price and its
/// mastery upgrade costs are both looked up by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillRank {
    Mortal,
    Yellow,
    Mystic,
    Earth,
    Heaven,
    Immortal,
}

impl SkillRank {
    pub const ALL: [SkillRank; 6] = [
        SkillRank::Mortal,
        SkillRank::Yellow,
        SkillRank::Mystic,
        SkillRank::Earth,
        SkillRank::Heaven,
        SkillRank::Immortal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SkillRank::Mortal => "凡阶",
            SkillRank::Yellow => "黄阶",
            SkillRank::Mystic => "玄阶",
            SkillRank::Earth => "地阶",
            SkillRank::Heaven => "天阶",
            SkillRank::Immortal => "仙阶",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Attribute band that auto-grants an entry. Open bounds are unbounded on
/// that side; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeThreshold {
    pub attribute: AttributeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i32>,
}

impl AttributeThreshold {
    pub fn at_least(attribute: AttributeType, min_value: i32) -> Self {
        Self {
            attribute,
            min_value: Some(min_value),
            max_value: None,
        }
    }

    pub fn at_most(attribute: AttributeType, max_value: i32) -> Self {
        Self {
            attribute,
            min_value: None,
            max_value: Some(max_value),
        }
    }

    pub fn between(attribute: AttributeType, min_value: i32, max_value: i32) -> Self {
        Self {
            attribute,
            min_value: Some(min_value),
            max_value: Some(max_value),
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min_value.map_or(true, |min| value >= min)
            && self.max_value.map_or(true, |max| value <= max)
    }

    pub fn holds(&self, attrs: &Attributes) -> bool {
        self.contains(attrs.get(self.attribute))
    }
}

/// A hidden skill sub-feature revealed at a mastery level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryFeature {
    pub level: MasteryLevel,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A selectable (or attribute-granted) trait or skill.
///
/// Traits are priced by `cost` (negative refunds points). Skills are priced by
/// `rank` through the configured rank cost table; their `cost` field is unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<SkillRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<AttributeThreshold>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<MasteryFeature>,
}

impl CatalogEntry {
    pub fn new_trait(id: &str, name: &str, description: &str, cost: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            cost,
            rank: None,
            threshold: None,
            features: Vec::new(),
        }
    }

    pub fn new_skill(id: &str, name: &str, description: &str, rank: SkillRank) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            cost: 0,
            rank: Some(rank),
            threshold: None,
            features: Vec::new(),
        }
    }

    pub fn with_threshold(mut self, threshold: AttributeThreshold) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_feature(mut self, level: MasteryLevel, name: &str, description: &str) -> Self {
        self.features.push(MasteryFeature {
            level,
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Emergent entries are granted by attributes and never chosen directly.
    pub fn is_triggered(&self) -> bool {
        self.threshold.is_some()
    }

    pub fn is_triggered_by(&self, attrs: &Attributes) -> bool {
        self.threshold.is_some_and(|t| t.holds(attrs))
    }

    /// Features revealed at or below `level`.
    pub fn features_up_to(&self, level: MasteryLevel) -> impl Iterator<Item = &MasteryFeature> {
        self.features.iter().filter(move |f| f.level <= level)
    }
}
