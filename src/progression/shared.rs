use super::cultivator::Cultivator;
use super::mastery::MasteryGain;
use super::realm::Breakthrough;
use crate::catalog::Catalog;
use crate::core::RulesConfig;
use crate::error::RulesError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A `Cultivator` shared between threads. Each operation holds the lock for
/// its whole check-and-debit, so two callers can never both spend the same
/// cultivation.
#[derive(Debug, Clone, Default)]
pub struct SharedCultivator {
    inner: Arc<Mutex<Cultivator>>,
}

impl SharedCultivator {
    pub fn new(cultivator: Cultivator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cultivator)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cultivator> {
        // Operations never leave a half-applied state behind, so a poisoned
        // lock still guards a consistent value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn award(&self, amount: u64) -> u64 {
        self.lock().award(amount)
    }

    pub fn advance_realm(&self, config: &RulesConfig) -> Result<Breakthrough, RulesError> {
        self.lock().advance_realm(config)
    }

    pub fn upgrade_skill(
        &self,
        skill_id: &str,
        catalog: &Catalog,
        config: &RulesConfig,
    ) -> Result<MasteryGain, RulesError> {
        self.lock().upgrade_skill(skill_id, catalog, config)
    }

    pub fn cultivation(&self) -> u64 {
        self.lock().cultivation()
    }

    /// Copy of the current state, for saving or display.
    pub fn snapshot(&self) -> Cultivator {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{MasteryLevel, RealmStage};
    use std::thread;

    #[test]
    fn test_concurrent_upgrades_never_double_spend() {
        let catalog = Arc::new(Catalog::builtin());
        let config = Arc::new(RulesConfig::default());
        let mut cultivator = Cultivator::new(RealmStage::FIRST);
        cultivator.learn_skill("yu_feng_shu", &catalog).unwrap();
        cultivator.learn_skill("chang_chun_gong", &catalog).unwrap();
        // Enough for exactly one first-level upgrade of a mortal skill.
        cultivator.award(40);
        let shared = SharedCultivator::new(cultivator);

        let handles: Vec<_> = ["yu_feng_shu", "chang_chun_gong"]
            .into_iter()
            .cycle()
            .take(8)
            .map(|skill| {
                let shared = shared.clone();
                let catalog = Arc::clone(&catalog);
                let config = Arc::clone(&config);
                thread::spawn(move || shared.upgrade_skill(skill, &catalog, &config).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        let state = shared.snapshot();
        assert_eq!(state.cultivation(), 0);
        let raised = state
            .skills
            .values()
            .filter(|s| s.level == MasteryLevel::Apprentice)
            .count();
        assert_eq!(raised, 1);
    }

    #[test]
    fn test_award_and_advance_through_handle() {
        let config = RulesConfig::default();
        let shared = SharedCultivator::default();
        let other = shared.clone();
        other.award(100);
        let result = shared.advance_realm(&config).unwrap();
        assert_eq!(result.to, RealmStage::new(0, 1).unwrap());
        assert_eq!(other.cultivation(), 0);
    }
}
