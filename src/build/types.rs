use super::draw::DrawPoolState;
use super::selection::{Selection, SelectionOrigin};
use crate::catalog::Category;
use crate::character::Attributes;
use crate::core::constants::MAX_NAME_CHARS;
use crate::error::RulesError;
use crate::progression::RealmStage;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub type BuildId = String;

/// Character origin. Decides the realm a finalized character starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    Mortal,
    Rogue,
    Clan,
    Sect,
}

impl Background {
    pub const ALL: [Background; 4] = [
        Background::Mortal,
        Background::Rogue,
        Background::Clan,
        Background::Sect,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Background::Mortal => "凡人",
            Background::Rogue => "散修",
            Background::Clan => "世家",
            Background::Sect => "宗门",
        }
    }

    pub fn starting_stage(&self) -> RealmStage {
        let minor = match self {
            Background::Mortal => 0,
            Background::Rogue => 1,
            Background::Clan => 2,
            Background::Sect => 3,
        };
        RealmStage { major: 0, minor }
    }
}

/// A character configuration. Owned by a `BuildSession` while editable and
/// handed out by value once finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBuild {
    pub id: BuildId,
    pub name: String,
    pub background: Background,
    pub talent_tier: String,
    pub attributes: Attributes,
    pub traits: Selection,
    pub skills: Selection,
    pub draws: DrawPoolState,
    /// Total draw fees paid.
    pub draw_spent: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CharacterBuild {
    pub fn selection(&self, category: Category) -> &Selection {
        match category {
            Category::Trait => &self.traits,
            Category::Skill => &self.skills,
        }
    }

    pub(crate) fn selection_mut(&mut self, category: Category) -> &mut Selection {
        match category {
            Category::Trait => &mut self.traits,
            Category::Skill => &mut self.skills,
        }
    }

    /// Brings stored origins back to what a session could have produced.
    /// Triggered rows are dropped; drawn rows with no matching draw record
    /// become direct choices and are priced as such.
    pub(crate) fn normalize_origins(&mut self) {
        for category in Category::ALL {
            let rows: Vec<(String, SelectionOrigin)> = self
                .selection(category)
                .iter()
                .map(|(id, origin)| (id.to_string(), origin))
                .collect();
            for (id, origin) in rows {
                match origin {
                    SelectionOrigin::Triggered => {
                        warn!(build_id = %self.id, entry = %id, "dropping stored triggered entry");
                        self.selection_mut(category).remove(&id);
                    }
                    SelectionOrigin::Drawn if !self.draws.was_drawn(&id) => {
                        warn!(build_id = %self.id, entry = %id, "unrecorded draw, now direct");
                        self.selection_mut(category).insert(&id, SelectionOrigin::Direct);
                    }
                    _ => {}
                }
            }
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), RulesError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(RulesError::InvalidName("name cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(RulesError::InvalidName(format!(
            "name must be {MAX_NAME_CHARS} characters or less"
        )));
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(RulesError::InvalidName(
            "name can only contain letters, numbers, spaces, hyphens, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// File-safe form of a build name.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
