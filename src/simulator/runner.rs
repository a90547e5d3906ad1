//! Monte Carlo runner driving the real `Cultivator` automata.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::catalog::Catalog;
use crate::core::constants::NUM_MAJOR_REALMS;
use crate::core::RulesConfig;
use crate::error::RulesError;
use crate::progression::Cultivator;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Run every configured simulation and aggregate a report.
pub fn run_simulation(
    config: &SimConfig,
    rules: &RulesConfig,
    catalog: &Catalog,
) -> Result<SimReport, RulesError> {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, rules, catalog, &mut rng)?;
        debug!(
            run = run_idx + 1,
            stage = %run.final_stage,
            ticks = run.total_ticks,
            breakthroughs = run.breakthroughs,
            upgrades = run.upgrades,
            "run finished"
        );
        all_runs.push(run);
    }

    Ok(SimReport::from_runs(all_runs, config.max_ticks_per_run))
}

/// One character from its starting realm until the peak or the tick limit.
pub fn simulate_single_run<R: Rng>(
    config: &SimConfig,
    rules: &RulesConfig,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<RunStats, RulesError> {
    let mut cultivator = Cultivator::new(config.background.starting_stage());
    if let Some(skill) = &config.train_skill {
        cultivator.learn_skill(skill, catalog)?;
    }

    let (min_award, max_award) = config.award_range();
    let mut major_reached = vec![None; NUM_MAJOR_REALMS];
    major_reached[cultivator.stage().major as usize] = Some(0);
    let mut stats = RunStats {
        final_stage: cultivator.stage(),
        ..RunStats::default()
    };

    let mut tick = 0;
    while tick < config.max_ticks_per_run && !cultivator.stage().is_terminal() {
        tick += 1;
        cultivator.award(rng.gen_range(min_award..=max_award));

        if let Some(skill) = &config.train_skill {
            if rng.gen_bool(config.skill_focus.clamp(0.0, 1.0)) {
                match cultivator.upgrade_skill(skill, catalog, rules) {
                    Ok(_) => stats.upgrades += 1,
                    Err(RulesError::InsufficientCultivation { .. })
                    | Err(RulesError::TerminalMastery(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        while let Ok(result) = cultivator.advance_realm(rules) {
            stats.breakthroughs += 1;
            let major = result.to.major as usize;
            if major_reached[major].is_none() {
                major_reached[major] = Some(tick);
                debug!(tick, realm = %result.to, "entered major realm");
            }
        }
    }

    stats.total_ticks = tick;
    stats.final_stage = cultivator.stage();
    stats.reached_peak = cultivator.stage().is_terminal();
    stats.leftover_cultivation = cultivator.cultivation();
    stats.final_mastery = config
        .train_skill
        .as_deref()
        .and_then(|skill| cultivator.mastery(skill))
        .map(|m| m.level);
    stats.major_reached_tick = major_reached;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Background;
    use crate::progression::{MasteryLevel, RealmStage};

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SimConfig {
            num_runs: 3,
            seed: Some(42),
            verbosity: 0,
            ..SimConfig::realm_pacing_test()
        };
        let rules = RulesConfig::default();
        let catalog = Catalog::builtin();

        let a = run_simulation(&config, &rules, &catalog).unwrap();
        let b = run_simulation(&config, &rules, &catalog).unwrap();
        let ticks_a: Vec<_> = a.run_stats.iter().map(|r| r.total_ticks).collect();
        let ticks_b: Vec<_> = b.run_stats.iter().map(|r| r.total_ticks).collect();
        assert_eq!(ticks_a, ticks_b);
    }

    #[test]
    fn test_verbose_runs_are_returned_not_printed() {
        let config = SimConfig {
            num_runs: 4,
            seed: Some(3),
            max_ticks_per_run: 50,
            verbosity: 2,
            ..SimConfig::default()
        };
        let report = run_simulation(&config, &RulesConfig::default(), &Catalog::builtin()).unwrap();
        assert_eq!(report.run_stats.len(), 4);
        assert!(report.run_stats.iter().all(|r| r.total_ticks <= 50));
    }

    #[test]
    fn test_generous_awards_reach_the_peak() {
        let config = SimConfig {
            min_award: 200_000,
            max_award: 200_000,
            max_ticks_per_run: 1_000,
            ..SimConfig::default()
        };
        let rules = RulesConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let run = simulate_single_run(&config, &rules, &Catalog::builtin(), &mut rng).unwrap();

        assert!(run.reached_peak);
        assert_eq!(run.final_stage, RealmStage::PEAK);
        assert_eq!(run.breakthroughs, 27);
        assert!(run.major_reached_tick.iter().all(Option::is_some));
    }

    #[test]
    fn test_tick_limit_stops_the_run() {
        let config = SimConfig {
            min_award: 1,
            max_award: 1,
            max_ticks_per_run: 10,
            background: Background::Sect,
            ..SimConfig::default()
        };
        let rules = RulesConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let run = simulate_single_run(&config, &rules, &Catalog::builtin(), &mut rng).unwrap();

        assert!(!run.reached_peak);
        assert_eq!(run.total_ticks, 10);
        assert_eq!(run.final_stage, Background::Sect.starting_stage());
        assert_eq!(run.leftover_cultivation, 10);
    }

    #[test]
    fn test_training_a_skill_raises_mastery() {
        let config = SimConfig {
            skill_focus: 1.0,
            max_ticks_per_run: 500,
            ..SimConfig::mastery_split_test("yu_feng_shu")
        };
        let rules = RulesConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let run = simulate_single_run(&config, &rules, &Catalog::builtin(), &mut rng).unwrap();

        assert!(run.upgrades > 0);
        assert!(run.final_mastery.unwrap() > MasteryLevel::Novice);
    }

    #[test]
    fn test_unknown_training_skill_is_an_error() {
        let config = SimConfig::mastery_split_test("no_such_skill");
        let rules = RulesConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            simulate_single_run(&config, &rules, &Catalog::builtin(), &mut rng).unwrap_err(),
            RulesError::UnknownEntry("no_such_skill".to_string())
        );
    }
}
