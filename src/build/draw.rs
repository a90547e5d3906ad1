//! Depleting random draw pools.

use super::selection::Selection;
use crate::catalog::{Catalog, CatalogEntry, Category};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPoolKind {
    PositiveTrait,
    NegativeTrait,
    MixedTrait,
    Skill,
}

impl DrawPoolKind {
    pub const ALL: [DrawPoolKind; 4] = [
        DrawPoolKind::PositiveTrait,
        DrawPoolKind::NegativeTrait,
        DrawPoolKind::MixedTrait,
        DrawPoolKind::Skill,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DrawPoolKind::PositiveTrait => "吉运签",
            DrawPoolKind::NegativeTrait => "劫数签",
            DrawPoolKind::MixedTrait => "命数签",
            DrawPoolKind::Skill => "功法签",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            DrawPoolKind::Skill => Category::Skill,
            _ => Category::Trait,
        }
    }

    /// Catalog membership of the pool, before depletion. Threshold entries
    /// never qualify.
    pub fn admits(&self, entry: &CatalogEntry) -> bool {
        if entry.is_triggered() {
            return false;
        }
        match self {
            DrawPoolKind::PositiveTrait => entry.rank.is_none() && entry.cost > 0,
            DrawPoolKind::NegativeTrait => entry.rank.is_none() && entry.cost < 0,
            DrawPoolKind::MixedTrait => entry.rank.is_none(),
            DrawPoolKind::Skill => entry.rank.is_some(),
        }
    }
}

/// One past draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub pool: DrawPoolKind,
    pub id: String,
}

/// Everything drawn so far in a build, in draw order. Only ever grows, so the
/// candidate sets only ever shrink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawPoolState {
    history: Vec<DrawRecord>,
}

impl DrawPoolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[DrawRecord] {
        &self.history
    }

    pub fn was_drawn(&self, id: &str) -> bool {
        self.history.iter().any(|r| r.id == id)
    }

    pub fn drawn_from(&self, pool: DrawPoolKind) -> usize {
        self.history.iter().filter(|r| r.pool == pool).count()
    }

    /// Remaining candidates: pool members not already selected and never drawn
    /// before, in catalog order.
    pub fn candidates<'c>(
        &self,
        pool: DrawPoolKind,
        catalog: &'c Catalog,
        selection: &Selection,
    ) -> Vec<&'c CatalogEntry> {
        catalog
            .entries(pool.category())
            .iter()
            .filter(|e| pool.admits(e))
            .filter(|e| !selection.contains(&e.id) && !self.was_drawn(&e.id))
            .collect()
    }

    pub(crate) fn record(&mut self, pool: DrawPoolKind, id: &str) {
        self.history.push(DrawRecord {
            pool,
            id: id.to_string(),
        });
    }

    /// Drops history entries the predicate rejects. Used when reopening a
    /// build against a catalog that no longer knows some ids.
    pub(crate) fn retain(&mut self, keep: impl Fn(&DrawRecord) -> bool) {
        self.history.retain(|r| keep(r));
    }
}

/// Uniform pick among `candidates`; `None` when empty.
pub fn pick<'c, R: Rng>(candidates: &[&'c CatalogEntry], rng: &mut R) -> Option<&'c CatalogEntry> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::SelectionOrigin;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pool_predicates() {
        let catalog = Catalog::builtin();
        let state = DrawPoolState::new();
        let selection = Selection::new();

        let positive = state.candidates(DrawPoolKind::PositiveTrait, &catalog, &selection);
        assert!(!positive.is_empty());
        assert!(positive.iter().all(|e| e.cost > 0 && !e.is_triggered()));

        let negative = state.candidates(DrawPoolKind::NegativeTrait, &catalog, &selection);
        assert!(negative.iter().all(|e| e.cost < 0));

        let mixed = state.candidates(DrawPoolKind::MixedTrait, &catalog, &selection);
        assert_eq!(
            mixed.len(),
            catalog.list_selectable(Category::Trait).len()
        );
        assert!(mixed.len() > positive.len() + negative.len());

        let skills = state.candidates(DrawPoolKind::Skill, &catalog, &selection);
        assert!(skills.iter().all(|e| e.rank.is_some() && !e.is_triggered()));
    }

    #[test]
    fn test_selected_and_drawn_entries_leave_every_pool() {
        let catalog = Catalog::builtin();
        let mut state = DrawPoolState::new();
        let mut selection = Selection::new();
        let before = state
            .candidates(DrawPoolKind::MixedTrait, &catalog, &selection)
            .len();

        selection.insert("jian_xin", SelectionOrigin::Direct);
        state.record(DrawPoolKind::NegativeTrait, "xin_mo");

        let mixed = state.candidates(DrawPoolKind::MixedTrait, &catalog, &selection);
        assert_eq!(mixed.len(), before - 2);
        assert!(mixed.iter().all(|e| e.id != "jian_xin" && e.id != "xin_mo"));
        assert_eq!(state.drawn_from(DrawPoolKind::NegativeTrait), 1);
        assert_eq!(state.drawn_from(DrawPoolKind::MixedTrait), 0);
    }

    #[test]
    fn test_pick_is_deterministic_for_a_seed() {
        let catalog = Catalog::builtin();
        let candidates =
            DrawPoolState::new().candidates(DrawPoolKind::Skill, &catalog, &Selection::new());

        let a = pick(&candidates, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = pick(&candidates, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a.id, b.id);
        assert!(pick(&[], &mut ChaCha8Rng::seed_from_u64(7)).is_none());
    }
}
