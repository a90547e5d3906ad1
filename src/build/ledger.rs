//! Point budget bookkeeping for a build.

use crate::error::RulesError;
use serde::{Deserialize, Serialize};

/// The four consumption tallies a build spends points on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    Attributes,
    Traits,
    Skills,
    Draws,
}

impl LedgerCategory {
    pub const ALL: [LedgerCategory; 4] = [
        LedgerCategory::Attributes,
        LedgerCategory::Traits,
        LedgerCategory::Skills,
        LedgerCategory::Draws,
    ];
}

/// Read-only view of the ledger for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetState {
    pub total_points: i32,
    pub attributes: i32,
    pub traits: i32,
    pub skills: i32,
    pub draws: i32,
    pub remaining: i32,
}

/// Total allowance against four signed tallies.
///
/// Tallies may go negative (refunding flaws, attributes below baseline). The
/// only enforced invariant is that an application which increases net
/// consumption leaves `remaining() >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLedger {
    total_points: i32,
    tallies: [i32; 4],
}

impl BudgetLedger {
    pub fn new(total_points: i32) -> Self {
        Self {
            total_points,
            tallies: [0; 4],
        }
    }

    /// Rebuilds a ledger from stored tallies without checking them.
    pub fn restore(
        total_points: i32,
        attributes: i32,
        traits: i32,
        skills: i32,
        draws: i32,
    ) -> Self {
        Self {
            total_points,
            tallies: [attributes, traits, skills, draws],
        }
    }

    pub fn total_points(&self) -> i32 {
        self.total_points
    }

    pub fn tally(&self, category: LedgerCategory) -> i32 {
        self.tallies[category as usize]
    }

    pub fn spent(&self) -> i32 {
        self.tallies.iter().sum()
    }

    pub fn remaining(&self) -> i32 {
        self.total_points - self.spent()
    }

    /// Whether consuming `delta` more points keeps the budget non-negative.
    /// Refunds (`delta <= 0`) are always affordable.
    pub fn can_afford(&self, delta: i32) -> bool {
        delta <= 0 || delta <= self.remaining()
    }

    pub fn apply(&mut self, category: LedgerCategory, delta: i32) -> Result<(), RulesError> {
        self.apply_all(&[(category, delta)])
    }

    /// Applies several tally adjustments as one unit, checked on their net
    /// effect. On error nothing is applied.
    pub fn apply_all(&mut self, deltas: &[(LedgerCategory, i32)]) -> Result<(), RulesError> {
        let net: i32 = deltas.iter().map(|(_, d)| d).sum();
        if !self.can_afford(net) {
            // Report against the category carrying the largest charge.
            let category = deltas
                .iter()
                .max_by_key(|(_, d)| *d)
                .map(|(c, _)| *c)
                .unwrap_or(LedgerCategory::Attributes);
            return Err(RulesError::InsufficientBudget {
                category,
                required: net,
                remaining: self.remaining(),
            });
        }
        for (category, delta) in deltas {
            self.tallies[*category as usize] += delta;
        }
        Ok(())
    }

    /// Switches the allowance. Refused when the new total cannot cover what
    /// is already consumed.
    pub fn set_total(&mut self, total_points: i32) -> Result<(), RulesError> {
        let spent = self.spent();
        if total_points < spent && total_points < self.total_points {
            return Err(RulesError::InsufficientBudget {
                category: LedgerCategory::Attributes,
                required: spent,
                remaining: total_points,
            });
        }
        self.total_points = total_points;
        Ok(())
    }

    pub fn state(&self) -> BudgetState {
        BudgetState {
            total_points: self.total_points,
            attributes: self.tally(LedgerCategory::Attributes),
            traits: self.tally(LedgerCategory::Traits),
            skills: self.tally(LedgerCategory::Skills),
            draws: self.tally(LedgerCategory::Draws),
            remaining: self.remaining(),
        }
    }
}
