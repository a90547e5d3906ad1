//! The character-creation wizard state.
//!
//! A `BuildSession` owns one editable `CharacterBuild` and the ledger that
//! prices it. Every intent method checks and commits in one `&mut self`
//! call, so a rejected intent leaves the session exactly as it was.

use super::draw::{self, DrawPoolKind};
use super::ledger::{BudgetLedger, BudgetState, LedgerCategory};
use super::selection::{SelectedEntry, SelectionOrigin};
use super::types::{validate_name, Background, CharacterBuild};
use crate::catalog::{Catalog, CatalogEntry, Category, ThresholdEngine};
use crate::character::AttributeType;
use crate::core::RulesConfig;
use crate::error::RulesError;
use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

fn ledger_category(category: Category) -> LedgerCategory {
    match category {
        Category::Trait => LedgerCategory::Traits,
        Category::Skill => LedgerCategory::Skills,
    }
}

/// A finalize attempt that was refused. The session is handed back untouched.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct FinalizeRejected<'a> {
    pub error: RulesError,
    pub session: BuildSession<'a>,
}

#[derive(Debug, Clone)]
pub struct BuildSession<'a> {
    catalog: &'a Catalog,
    config: &'a RulesConfig,
    build: CharacterBuild,
    ledger: BudgetLedger,
}

impl<'a> BuildSession<'a> {
    /// Starts a fresh build: every attribute at baseline, nothing selected.
    pub fn new(
        catalog: &'a Catalog,
        config: &'a RulesConfig,
        talent_tier: &str,
    ) -> Result<Self, RulesError> {
        let tier = config
            .talent_tier(talent_tier)
            .ok_or_else(|| RulesError::UnknownTalentTier(talent_tier.to_string()))?;
        let now = Utc::now().timestamp();
        let build = CharacterBuild {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            background: Background::default(),
            talent_tier: tier.id.clone(),
            attributes: Default::default(),
            traits: Default::default(),
            skills: Default::default(),
            draws: Default::default(),
            draw_spent: 0,
            created_at: now,
            updated_at: now,
        };
        let ledger = BudgetLedger::new(tier.total_points);

        debug!(build_id = %build.id, tier = %tier.id, "build session started");
        Ok(Self {
            catalog,
            config,
            build,
            ledger,
        })
    }

    /// Re-enters editing on a previously finalized build.
    ///
    /// Stored ids the catalog no longer knows (or that became attribute
    /// triggered) are dropped, as are triggered rows; drawn rows without a
    /// draw record are priced as direct choices. The ledger is rebuilt from
    /// what remains and is not checked here; `finalize` enforces a
    /// non-negative budget again.
    pub fn reopen(
        mut build: CharacterBuild,
        catalog: &'a Catalog,
        config: &'a RulesConfig,
    ) -> Result<Self, RulesError> {
        let tier = config
            .talent_tier(&build.talent_tier)
            .ok_or_else(|| RulesError::UnknownTalentTier(build.talent_tier.clone()))?;
        for (attr, value) in build.attributes.iter() {
            attr.validate(value)?;
        }

        for category in Category::ALL {
            let stale: Vec<String> = build
                .selection(category)
                .ids()
                .filter(|id| {
                    catalog
                        .get_in(category, id)
                        .map_or(true, |entry| entry.is_triggered())
                })
                .map(str::to_string)
                .collect();
            for id in stale {
                warn!(build_id = %build.id, entry = %id, "dropping unknown entry on reopen");
                build.selection_mut(category).remove(&id);
            }
        }
        build.draws.retain(|record| catalog.get(&record.id).is_some());
        build.normalize_origins();

        let mut tallies = [0; 2];
        for (slot, category) in Category::ALL.into_iter().enumerate() {
            for (id, origin) in build.selection(category).iter() {
                let Some(entry) = catalog.get(id) else {
                    continue;
                };
                tallies[slot] += match origin {
                    SelectionOrigin::Direct => config.entry_cost(entry),
                    SelectionOrigin::Drawn => Self::drawn_refund(entry),
                    SelectionOrigin::Triggered => 0,
                };
            }
        }
        let ledger = BudgetLedger::restore(
            tier.total_points,
            config.attribute_costs.total(&build.attributes),
            tallies[0],
            tallies[1],
            build.draw_spent,
        );

        debug!(build_id = %build.id, remaining = ledger.remaining(), "build reopened");
        Ok(Self {
            catalog,
            config,
            build,
            ledger,
        })
    }

    /// Trait-tally line recorded for a drawn entry besides the pool fee.
    fn drawn_refund(entry: &CatalogEntry) -> i32 {
        if entry.rank.is_none() && entry.cost < 0 {
            entry.cost
        } else {
            0
        }
    }

    fn touch(&mut self) {
        self.build.updated_at = Utc::now().timestamp();
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn build(&self) -> &CharacterBuild {
        &self.build
    }

    pub fn budget(&self) -> BudgetState {
        self.ledger.state()
    }

    pub fn remaining(&self) -> i32 {
        self.ledger.remaining()
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), RulesError> {
        validate_name(name)?;
        self.build.name = name.trim().to_string();
        self.touch();
        Ok(())
    }

    pub fn set_background(&mut self, background: Background) {
        self.build.background = background;
        self.touch();
    }

    /// Switches the active talent tier. Refused when the new allowance cannot
    /// cover what the build already consumes.
    pub fn set_talent_tier(&mut self, id: &str) -> Result<(), RulesError> {
        let tier = self
            .config
            .talent_tier(id)
            .ok_or_else(|| RulesError::UnknownTalentTier(id.to_string()))?;
        self.ledger.set_total(tier.total_points)?;
        self.build.talent_tier = tier.id.clone();
        self.touch();
        debug!(tier = %tier.id, remaining = self.ledger.remaining(), "talent tier changed");
        Ok(())
    }

    /// Moves an attribute to `value`. Out-of-range values are an error; an
    /// in-range value the budget cannot pay for is refused silently and
    /// `Ok(false)` is returned with nothing changed.
    pub fn set_attribute(&mut self, attr: AttributeType, value: i32) -> Result<bool, RulesError> {
        attr.validate(value)?;
        let current = self.build.attributes.get(attr);
        if value == current {
            return Ok(true);
        }

        let costs = &self.config.attribute_costs;
        let delta = costs.cost(attr, value) - costs.cost(attr, current);
        if self.ledger.apply(LedgerCategory::Attributes, delta).is_err() {
            debug!(?attr, value, delta, "attribute change refused by budget");
            return Ok(false);
        }
        let before = self.build.attributes;
        self.build.attributes.set(attr, value)?;
        self.touch();
        debug!(?attr, value, remaining = self.ledger.remaining(), "attribute set");
        let (gained, lost) = ThresholdEngine::diff(self.catalog, &before, &self.build.attributes);
        if !gained.is_empty() || !lost.is_empty() {
            debug!(?gained, ?lost, "triggered entries changed");
        }
        Ok(true)
    }

    /// Slider-style relative change, clamped to the attribute's range.
    /// Returns whether the value moved.
    pub fn step_attribute(&mut self, attr: AttributeType, steps: i32) -> Result<bool, RulesError> {
        let current = self.build.attributes.get(attr);
        let target = attr.clamp_value(current.saturating_add(steps));
        if target == current {
            return Ok(false);
        }
        self.set_attribute(attr, target)
    }

    /// Adds a catalog entry as a direct choice, paying its price.
    pub fn select(&mut self, id: &str) -> Result<(), RulesError> {
        let entry = self
            .catalog
            .get(id)
            .ok_or_else(|| RulesError::UnknownEntry(id.to_string()))?;
        if entry.is_triggered() {
            return Err(RulesError::NotSelectable(id.to_string()));
        }
        let Some(category) = self.catalog.category_of(id) else {
            return Err(RulesError::UnknownEntry(id.to_string()));
        };
        if self.build.selection(category).contains(id) {
            return Ok(());
        }

        let cost = self.config.entry_cost(entry);
        self.ledger.apply(ledger_category(category), cost)?;
        self.build
            .selection_mut(category)
            .insert(id, SelectionOrigin::Direct);
        self.touch();
        debug!(entry = %id, cost, remaining = self.ledger.remaining(), "entry selected");
        Ok(())
    }

    /// Removes a direct choice and reverses its price. Drawn and triggered
    /// entries are `Irrevocable`; removing an entry that isn't selected is a
    /// no-op.
    ///
    /// Dropping a refunding flaw raises consumption, so this can also fail with
    /// `InsufficientBudget`.
    pub fn deselect(&mut self, id: &str) -> Result<(), RulesError> {
        let entry = self
            .catalog
            .get(id)
            .ok_or_else(|| RulesError::UnknownEntry(id.to_string()))?;
        if entry.is_triggered() {
            return Err(RulesError::Irrevocable(id.to_string()));
        }
        let Some(category) = self.catalog.category_of(id) else {
            return Err(RulesError::UnknownEntry(id.to_string()));
        };
        match self.build.selection(category).origin(id) {
            None => return Ok(()),
            Some(origin) if !origin.is_removable() => {
                return Err(RulesError::Irrevocable(id.to_string()));
            }
            Some(_) => {}
        }

        let cost = self.config.entry_cost(entry);
        self.ledger.apply(ledger_category(category), -cost)?;
        self.build.selection_mut(category).remove(id);
        self.touch();
        debug!(entry = %id, refund = cost, remaining = self.ledger.remaining(), "entry deselected");
        Ok(())
    }

    /// Selects or deselects; returns whether the entry is now selected.
    pub fn toggle(&mut self, id: &str) -> Result<bool, RulesError> {
        let selected = self
            .catalog
            .category_of(id)
            .is_some_and(|c| self.build.selection(c).contains(id));
        if selected {
            self.deselect(id)?;
            Ok(false)
        } else {
            self.select(id)?;
            Ok(true)
        }
    }

    /// Entries `pool` could still hand out.
    pub fn candidates(&self, pool: DrawPoolKind) -> Vec<&'a CatalogEntry> {
        self.build
            .draws
            .candidates(pool, self.catalog, self.build.selection(pool.category()))
    }

    /// Draws one entry from `pool`.
    ///
    /// Fails `EmptyPool` when nothing is left, then `InsufficientBudget` when
    /// the pool fee exceeds the remaining points; both checks happen before
    /// the RNG is touched. A drawn flaw also books its refund on the trait
    /// tally in the same ledger application.
    pub fn draw<R: Rng>(
        &mut self,
        pool: DrawPoolKind,
        rng: &mut R,
    ) -> Result<&'a CatalogEntry, RulesError> {
        let candidates = self.candidates(pool);
        if candidates.is_empty() {
            return Err(RulesError::EmptyPool(pool));
        }
        let fee = self.config.draw_cost(pool);
        if !self.ledger.can_afford(fee) {
            return Err(RulesError::InsufficientBudget {
                category: LedgerCategory::Draws,
                required: fee,
                remaining: self.ledger.remaining(),
            });
        }

        let entry = draw::pick(&candidates, rng).ok_or(RulesError::EmptyPool(pool))?;
        let mut lines = vec![(LedgerCategory::Draws, fee)];
        let refund = Self::drawn_refund(entry);
        if refund != 0 {
            lines.push((LedgerCategory::Traits, refund));
        }
        self.ledger.apply_all(&lines)?;

        self.build
            .selection_mut(pool.category())
            .insert(&entry.id, SelectionOrigin::Drawn);
        self.build.draws.record(pool, &entry.id);
        self.build.draw_spent += fee;
        self.touch();
        info!(
            pool = pool.name(),
            entry = %entry.id,
            fee,
            remaining = self.ledger.remaining(),
            "drew entry"
        );
        Ok(entry)
    }

    /// Entries of `category` currently granted by attributes.
    pub fn triggered(&self, category: Category) -> Vec<&'a CatalogEntry> {
        self.catalog.list_triggered(category, &self.build.attributes)
    }

    /// Stored choices followed by triggered grants, for display.
    pub fn selected(&self, category: Category) -> Vec<SelectedEntry> {
        let mut rows = Vec::new();
        for (id, origin) in self.build.selection(category).iter() {
            let Some(entry) = self.catalog.get_in(category, id) else {
                error!(entry = %id, "selected entry missing from catalog");
                continue;
            };
            let cost = match origin {
                SelectionOrigin::Direct => self.config.entry_cost(entry),
                _ => Self::drawn_refund(entry),
            };
            rows.push(SelectedEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
                origin,
                cost,
            });
        }
        for entry in self.triggered(category) {
            rows.push(SelectedEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
                origin: SelectionOrigin::Triggered,
                cost: 0,
            });
        }
        rows
    }

    pub fn traits(&self) -> Vec<SelectedEntry> {
        self.selected(Category::Trait)
    }

    pub fn skills(&self) -> Vec<SelectedEntry> {
        self.selected(Category::Skill)
    }

    /// Checks everything `finalize` requires without consuming the session.
    pub fn check(&self) -> Result<(), RulesError> {
        validate_name(&self.build.name)?;
        for category in Category::ALL {
            for id in self.build.selection(category).ids() {
                if self.catalog.get_in(category, id).is_none() {
                    error!(entry = %id, "stored entry missing from catalog");
                    return Err(RulesError::CatalogInconsistency(format!(
                        "'{id}' is not in the catalog"
                    )));
                }
            }
        }
        // Everything is already booked, so nothing more is required; the
        // deficit shows as a negative remainder.
        if self.ledger.remaining() < 0 {
            let category = LedgerCategory::ALL
                .into_iter()
                .max_by_key(|c| self.ledger.tally(*c))
                .unwrap_or(LedgerCategory::Attributes);
            return Err(RulesError::InsufficientBudget {
                category,
                required: 0,
                remaining: self.ledger.remaining(),
            });
        }
        Ok(())
    }

    /// Closes the session and hands out the immutable build. On refusal the
    /// session comes back with the error.
    pub fn finalize(mut self) -> Result<CharacterBuild, FinalizeRejected<'a>> {
        if let Err(error) = self.check() {
            return Err(FinalizeRejected {
                error,
                session: self,
            });
        }
        self.touch();
        info!(build_id = %self.build.id, name = %self.build.name, "build finalized");
        Ok(self.build)
    }
}
