use crate::core::constants::{
    MAJOR_REALM_NAMES, MINOR_REALM_NAMES, NUM_MAJOR_REALMS, NUM_MINOR_REALMS,
};
use crate::core::RulesConfig;
use crate::error::RulesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 28 realm stages. Ordering is lexicographic on (major, minor),
/// which is also the breakthrough order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredStage")]
pub struct RealmStage {
    pub major: u8,
    pub minor: u8,
}

/// Unchecked wire form; saved stages are range-checked on the way in.
#[derive(Deserialize)]
struct StoredStage {
    major: u8,
    minor: u8,
}

impl TryFrom<StoredStage> for RealmStage {
    type Error = String;

    fn try_from(stored: StoredStage) -> Result<Self, Self::Error> {
        RealmStage::new(stored.major, stored.minor).ok_or_else(|| {
            format!(
                "realm stage ({}, {}) is outside the ladder",
                stored.major, stored.minor
            )
        })
    }
}

impl RealmStage {
    pub const FIRST: RealmStage = RealmStage { major: 0, minor: 0 };
    pub const PEAK: RealmStage = RealmStage {
        major: NUM_MAJOR_REALMS as u8 - 1,
        minor: NUM_MINOR_REALMS as u8 - 1,
    };

    pub fn new(major: u8, minor: u8) -> Option<Self> {
        if (major as usize) < NUM_MAJOR_REALMS && (minor as usize) < NUM_MINOR_REALMS {
            Some(Self { major, minor })
        } else {
            None
        }
    }

    /// Position in the linear order, 0..28.
    pub fn ordinal(&self) -> usize {
        self.major as usize * NUM_MINOR_REALMS + self.minor as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal >= NUM_MAJOR_REALMS * NUM_MINOR_REALMS {
            return None;
        }
        Some(Self {
            major: (ordinal / NUM_MINOR_REALMS) as u8,
            minor: (ordinal % NUM_MINOR_REALMS) as u8,
        })
    }

    pub fn all() -> impl Iterator<Item = RealmStage> {
        (0..NUM_MAJOR_REALMS * NUM_MINOR_REALMS).filter_map(Self::from_ordinal)
    }

    /// The stage a successful breakthrough leads to; `None` at the peak.
    pub fn next(&self) -> Option<RealmStage> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::PEAK
    }

    /// `"?"` for a hand-built stage outside the ladder.
    pub fn major_name(&self) -> &'static str {
        MAJOR_REALM_NAMES.get(self.major as usize).copied().unwrap_or("?")
    }

    pub fn minor_name(&self) -> &'static str {
        MINOR_REALM_NAMES.get(self.minor as usize).copied().unwrap_or("?")
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.major_name(), self.minor_name())
    }
}

impl fmt::Display for RealmStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.major_name(), self.minor_name())
    }
}

/// Parses labels such as "筑基中期". A bare major name means its first
/// sub-stage; anything else unrecognized is rejected rather than guessed.
impl FromStr for RealmStage {
    type Err = RulesError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let trimmed = label.trim();
        for (major, major_name) in MAJOR_REALM_NAMES.iter().enumerate() {
            let Some(rest) = trimmed.strip_prefix(*major_name) else {
                continue;
            };
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok(Self {
                    major: major as u8,
                    minor: 0,
                });
            }
            if let Some(minor) = MINOR_REALM_NAMES.iter().position(|m| *m == rest) {
                return Ok(Self {
                    major: major as u8,
                    minor: minor as u8,
                });
            }
            break;
        }
        Err(RulesError::UnrecognizedRealm(label.to_string()))
    }
}

pub fn parse_realm(label: &str) -> Result<RealmStage, RulesError> {
    label.parse()
}

/// A successful breakthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakthrough {
    pub from: RealmStage,
    pub to: RealmStage,
    pub spent: u64,
    pub remaining: u64,
}

/// Realm position plus the cultivation pool that pays for breakthroughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmState {
    pub stage: RealmStage,
    pub cultivation: u64,
}

impl Default for RealmState {
    fn default() -> Self {
        Self::new(RealmStage::FIRST)
    }
}

impl RealmState {
    pub fn new(stage: RealmStage) -> Self {
        Self {
            stage,
            cultivation: 0,
        }
    }

    /// Adds awarded cultivation; returns the new total.
    pub fn award(&mut self, amount: u64) -> u64 {
        self.cultivation = self.cultivation.saturating_add(amount);
        self.cultivation
    }

    /// Price of the next breakthrough, `None` at the peak.
    pub fn next_cost(&self, config: &RulesConfig) -> Option<u64> {
        self.stage.next().map(|next| config.realm_cost(next))
    }

    pub fn can_advance(&self, config: &RulesConfig) -> bool {
        self.next_cost(config)
            .is_some_and(|cost| self.cultivation >= cost)
    }

    /// Breaks through to the next stage, debiting its cost in the same step.
    /// On failure nothing changes.
    pub fn advance(&mut self, config: &RulesConfig) -> Result<Breakthrough, RulesError> {
        let next = self.stage.next().ok_or(RulesError::TerminalState)?;
        let cost = config.realm_cost(next);
        if self.cultivation < cost {
            return Err(RulesError::InsufficientCultivation {
                required: cost,
                available: self.cultivation,
                shortfall: cost - self.cultivation,
            });
        }

        let from = self.stage;
        self.cultivation -= cost;
        self.stage = next;

        Ok(Breakthrough {
            from,
            to: next,
            spent: cost,
            remaining: self.cultivation,
        })
    }
}
