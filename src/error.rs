//! Error types for the rules engine, persistence and configuration layers.
//!
//! Every rules error is a recoverable, per-operation rejection: the state the
//! operation was invoked on is left exactly as it was.

use std::io;

use thiserror::Error;

use crate::build::{DrawPoolKind, LedgerCategory};
use crate::character::AttributeType;

/// Rejections raised by build, catalog and progression operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// Attribute value outside its declared range.
    #[error("{attribute:?} value {value} is outside [{min}, {max}]")]
    OutOfRange {
        attribute: AttributeType,
        value: i32,
        min: i32,
        max: i32,
    },

    /// Request would drive the remaining budget below zero.
    #[error("need {required} points but only {remaining} remain ({category:?})")]
    InsufficientBudget {
        category: LedgerCategory,
        required: i32,
        remaining: i32,
    },

    /// No eligible candidate is left in the pool.
    #[error("draw pool {0:?} is empty")]
    EmptyPool(DrawPoolKind),

    /// Attempt to remove a drawn or triggered entry.
    #[error("entry '{0}' cannot be removed")]
    Irrevocable(String),

    #[error("已达至境巅峰")]
    TerminalState,

    #[error("skill '{0}' is already at its final mastery level")]
    TerminalMastery(String),

    /// Not enough cultivation for the requested transition.
    #[error("need {required} cultivation, have {available} (short {shortfall})")]
    InsufficientCultivation {
        required: u64,
        available: u64,
        shortfall: u64,
    },

    #[error("unrecognized realm label '{0}'")]
    UnrecognizedRealm(String),

    #[error("unknown catalog entry '{0}'")]
    UnknownEntry(String),

    /// Threshold entries are granted by attributes, never chosen.
    #[error("entry '{0}' is granted by attributes and cannot be selected")]
    NotSelectable(String),

    #[error("unknown talent tier '{0}'")]
    UnknownTalentTier(String),

    #[error("skill '{0}' has not been learned")]
    SkillNotLearned(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A stored id no longer resolves against the catalog it was built from.
    #[error("catalog inconsistency: {0}")]
    CatalogInconsistency(String),
}

impl RulesError {
    /// Numeric deficit for "need N more" style messages, when one applies.
    pub fn shortfall(&self) -> Option<u64> {
        match self {
            RulesError::InsufficientBudget {
                required,
                remaining,
                ..
            } => Some((*required - *remaining).max(0) as u64),
            RulesError::InsufficientCultivation { shortfall, .. } => Some(*shortfall),
            _ => None,
        }
    }
}

/// Failures of the persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid build JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("progress encoding failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("save file checksum verification failed")]
    ChecksumMismatch,

    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    BadMagic { expected: u64, found: u64 },

    #[error("no build with id '{0}'")]
    NotFound(String),

    /// Persisted data is missing a required identity field.
    #[error("malformed build: {0}")]
    MalformedBuild(String),

    #[error("could not determine a data directory")]
    NoDataDir,
}

/// Rejections raised while loading or validating designer data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
