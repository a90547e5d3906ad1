//! On-disk shape of a saved build.
//!
//! Every field is defaulted so older files still load. Only the identity
//! fields are required.
//!
//! | field         | default when missing                 |
//! |---------------|--------------------------------------|
//! | `version`     | 1                                    |
//! | `background`  | `mortal`                             |
//! | `talent_tier` | `fan_pin`                            |
//! | `attributes`  | each missing key at its baseline     |
//! | `traits`      | empty                                |
//! | `skills`      | empty                                |
//! | `draws`       | empty history                        |
//! | `draw_spent`  | 0                                    |
//! | `created_at`  | `updated_at`                         |
//! | `updated_at`  | 0                                    |

use crate::build::{Background, CharacterBuild, DrawPoolState, Selection};
use crate::character::{AttributeType, Attributes};
use crate::core::constants::{BUILD_SCHEMA_VERSION, DEFAULT_TALENT_TIER};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

fn legacy_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRecord {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub talent_tier: Option<String>,
    /// Keyed by attribute key (`constitution`, `luck`, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, i32>,
    #[serde(default)]
    pub traits: Selection,
    #[serde(default)]
    pub skills: Selection,
    #[serde(default)]
    pub draws: DrawPoolState,
    #[serde(default)]
    pub draw_spent: i32,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: i64,
}

impl BuildRecord {
    pub fn from_build(build: &CharacterBuild) -> Self {
        Self {
            version: BUILD_SCHEMA_VERSION,
            id: Some(build.id.clone()),
            name: Some(build.name.clone()),
            background: build.background,
            talent_tier: Some(build.talent_tier.clone()),
            attributes: build
                .attributes
                .iter()
                .map(|(attr, value)| (attr.key().to_string(), value))
                .collect(),
            traits: build.traits.clone(),
            skills: build.skills.clone(),
            draws: build.draws.clone(),
            draw_spent: build.draw_spent,
            created_at: Some(build.created_at),
            updated_at: build.updated_at,
        }
    }

    /// Coerces the record into a build, filling defaults. Fails only when an
    /// identity field is absent.
    pub fn into_build(self) -> Result<CharacterBuild, StoreError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| StoreError::MalformedBuild("missing id".to_string()))?;
        let name = self
            .name
            .ok_or_else(|| StoreError::MalformedBuild(format!("build {id} has no name")))?;

        let mut attributes = Attributes::new();
        for (key, value) in &self.attributes {
            let Some(attr) = AttributeType::from_key(key) else {
                warn!(build_id = %id, key = %key, "ignoring unknown attribute");
                continue;
            };
            let clamped = attr.clamp_value(*value);
            if clamped != *value {
                warn!(build_id = %id, ?attr, value, clamped, "clamping stored attribute");
            }
            attributes
                .set(attr, clamped)
                .map_err(|e| StoreError::MalformedBuild(e.to_string()))?;
        }

        let talent_tier = self.talent_tier.unwrap_or_else(|| {
            warn!(build_id = %id, "no talent tier stored, assuming {DEFAULT_TALENT_TIER}");
            DEFAULT_TALENT_TIER.to_string()
        });

        let mut build = CharacterBuild {
            id,
            name,
            background: self.background,
            talent_tier,
            attributes,
            traits: self.traits,
            skills: self.skills,
            draws: self.draws,
            draw_spent: self.draw_spent.max(0),
            created_at: self.created_at.unwrap_or(self.updated_at),
            updated_at: self.updated_at,
        };
        build.normalize_origins();
        Ok(build)
    }
}
