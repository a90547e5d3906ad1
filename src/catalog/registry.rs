//! Immutable trait/skill registry.

use super::data::{builtin_skills, builtin_traits};
use super::types::{CatalogEntry, Category};
use crate::character::Attributes;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(default)]
    traits: Vec<CatalogEntry>,
    #[serde(default)]
    skills: Vec<CatalogEntry>,
}

/// Registry of every trait and skill, built once at startup and shared by
/// reference. Ids are unique across both categories.
#[derive(Debug, Clone)]
pub struct Catalog {
    traits: Vec<CatalogEntry>,
    skills: Vec<CatalogEntry>,
    index: HashMap<String, (Category, usize)>,
}

impl Catalog {
    /// Builds a validated catalog from trait and skill definitions.
    pub fn new(traits: Vec<CatalogEntry>, skills: Vec<CatalogEntry>) -> Result<Self, ConfigError> {
        for entry in &traits {
            if entry.rank.is_some() || !entry.features.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "trait '{}' must not carry a rank or mastery features",
                    entry.id
                )));
            }
        }
        for entry in &skills {
            if entry.rank.is_none() {
                return Err(ConfigError::invalid(format!(
                    "skill '{}' has no rank",
                    entry.id
                )));
            }
        }
        for entry in traits.iter().chain(skills.iter()) {
            if entry.id.trim().is_empty() {
                return Err(ConfigError::invalid("catalog entry with empty id"));
            }
            if let Some(t) = entry.threshold {
                if let (Some(min), Some(max)) = (t.min_value, t.max_value) {
                    if min > max {
                        return Err(ConfigError::invalid(format!(
                            "entry '{}' has an empty threshold band [{min}, {max}]",
                            entry.id
                        )));
                    }
                }
                if t.min_value.is_none() && t.max_value.is_none() {
                    return Err(ConfigError::invalid(format!(
                        "entry '{}' has a threshold with no bounds",
                        entry.id
                    )));
                }
                if entry.cost != 0 {
                    return Err(ConfigError::invalid(format!(
                        "triggered entry '{}' must cost zero",
                        entry.id
                    )));
                }
            }
        }

        let catalog = Self::indexed(traits, skills);
        let total = catalog.traits.len() + catalog.skills.len();
        if catalog.index.len() != total {
            return Err(ConfigError::invalid("duplicate catalog entry id"));
        }
        Ok(catalog)
    }

    /// The shipped trait and skill set.
    pub fn builtin() -> Self {
        Self::indexed(builtin_traits(), builtin_skills())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data.traits, data.skills)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn indexed(traits: Vec<CatalogEntry>, skills: Vec<CatalogEntry>) -> Self {
        let mut index = HashMap::with_capacity(traits.len() + skills.len());
        for (i, entry) in traits.iter().enumerate() {
            index.insert(entry.id.clone(), (Category::Trait, i));
        }
        for (i, entry) in skills.iter().enumerate() {
            index.insert(entry.id.clone(), (Category::Skill, i));
        }
        Self {
            traits,
            skills,
            index,
        }
    }

    pub fn entries(&self, category: Category) -> &[CatalogEntry] {
        match category {
            Category::Trait => &self.traits,
            Category::Skill => &self.skills,
        }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        let (category, i) = self.index.get(id)?;
        self.entries(*category).get(*i)
    }

    /// Looks up an id only within `category`.
    pub fn get_in(&self, category: Category, id: &str) -> Option<&CatalogEntry> {
        match self.index.get(id) {
            Some((c, i)) if *c == category => self.entries(category).get(*i),
            _ => None,
        }
    }

    pub fn category_of(&self, id: &str) -> Option<Category> {
        self.index.get(id).map(|(c, _)| *c)
    }

    /// Entries that may be chosen directly (no attribute threshold).
    pub fn list_selectable(&self, category: Category) -> Vec<&CatalogEntry> {
        self.entries(category)
            .iter()
            .filter(|e| !e.is_triggered())
            .collect()
    }

    /// Threshold entries of `category` whose band holds for `attrs`.
    pub fn list_triggered(&self, category: Category, attrs: &Attributes) -> Vec<&CatalogEntry> {
        self.entries(category)
            .iter()
            .filter(|e| e.is_triggered_by(attrs))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.traits.len() + self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
