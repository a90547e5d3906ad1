//! Integration test: from finalized build to cultivation progress
//!
//! Tests the full flow: create build → finalize → start cultivator → break
//! through realms → raise skill mastery.

use xiuxian::build::{Background, BuildSession, CharacterBuild};
use xiuxian::catalog::Catalog;
use xiuxian::character::AttributeType;
use xiuxian::core::RulesConfig;
use xiuxian::progression::{parse_realm, Cultivator, MasteryLevel, RealmStage, SharedCultivator};
use xiuxian::RulesError;

fn finalized_sect_disciple(catalog: &Catalog, config: &RulesConfig) -> CharacterBuild {
    let mut session = BuildSession::new(catalog, config, "tian_ming").unwrap();
    session.set_name("Han Li").unwrap();
    session.set_background(Background::Sect);
    assert!(session.set_attribute(AttributeType::Luck, 12).unwrap());
    session.select("chang_chun_gong").unwrap();
    session.finalize().unwrap()
}

/// A finalized build starts at its background's realm and knows its skills
#[test]
fn test_cultivator_from_finalized_build() {
    let catalog = Catalog::builtin();
    let config = RulesConfig::default();
    let build = finalized_sect_disciple(&catalog, &config);

    let cultivator = Cultivator::from_build(&build, &catalog).unwrap();
    assert_eq!(cultivator.build_id, build.id);
    assert_eq!(cultivator.stage(), parse_realm("炼气巅峰").unwrap());
    assert_eq!(cultivator.cultivation(), 0);

    // Chosen skill plus the one luck 12 grants.
    assert_eq!(
        cultivator.mastery("chang_chun_gong").unwrap().level,
        MasteryLevel::Novice
    );
    assert!(cultivator.mastery("lei_ling_gen").is_some());
    assert!(cultivator.mastery("da_yan_jue").is_none());
}

/// Breakthrough pricing: one short fails untouched, exact cost leaves zero
#[test]
fn test_breakthrough_shortfall_then_exact_payment() {
    let catalog = Catalog::builtin();
    let config = RulesConfig::default();
    let build = finalized_sect_disciple(&catalog, &config);
    let mut cultivator = Cultivator::from_build(&build, &catalog).unwrap();

    let into_foundation = parse_realm("筑基初期").unwrap();
    let cost = config.realm_cost(into_foundation);
    assert!(cost > 0);

    cultivator.award(cost - 1);
    let before = cultivator.clone();
    assert_eq!(
        cultivator.advance_realm(&config).unwrap_err(),
        RulesError::InsufficientCultivation {
            required: cost,
            available: cost - 1,
            shortfall: 1,
        }
    );
    assert_eq!(cultivator, before);

    cultivator.award(1);
    let result = cultivator.advance_realm(&config).unwrap();
    assert_eq!(result.from, parse_realm("炼气巅峰").unwrap());
    assert_eq!(result.to, into_foundation);
    assert_eq!(result.spent, cost);
    assert_eq!(cultivator.cultivation(), 0);
    assert_eq!(cultivator.stage().to_string(), "筑基初期");
}

/// Realm and mastery draw on the same pool
#[test]
fn test_mastery_and_realm_share_cultivation() {
    let catalog = Catalog::builtin();
    let config = RulesConfig::default();
    let build = finalized_sect_disciple(&catalog, &config);
    let mut cultivator = Cultivator::from_build(&build, &catalog).unwrap();

    let realm_cost = config.realm_cost(parse_realm("筑基").unwrap());
    let skill = catalog.get("chang_chun_gong").unwrap();
    let mastery_cost = cultivator
        .mastery("chang_chun_gong")
        .unwrap()
        .next_cost(skill, &config)
        .unwrap();

    cultivator.award(realm_cost);
    cultivator
        .upgrade_skill("chang_chun_gong", &catalog, &config)
        .unwrap();
    assert_eq!(cultivator.cultivation(), realm_cost - mastery_cost);
    assert!(matches!(
        cultivator.advance_realm(&config),
        Err(RulesError::InsufficientCultivation { shortfall, .. }) if shortfall == mastery_cost
    ));
}

/// Mastery climbs to its last level and then reports terminal
#[test]
fn test_mastery_climbs_to_terminal() {
    let catalog = Catalog::builtin();
    let config = RulesConfig::default();
    let mut cultivator = Cultivator::new(RealmStage::FIRST);
    assert!(cultivator.learn_skill("qing_yuan_jian_jue", &catalog).unwrap());
    assert!(!cultivator.learn_skill("qing_yuan_jian_jue", &catalog).unwrap());

    cultivator.award(1_000_000);
    let mut unlocked = Vec::new();
    for _ in 1..MasteryLevel::ALL.len() {
        let gain = cultivator
            .upgrade_skill("qing_yuan_jian_jue", &catalog, &config)
            .unwrap();
        assert_eq!(gain.from.next(), Some(gain.to));
        unlocked.extend(gain.unlocked);
    }

    let state = cultivator.mastery("qing_yuan_jian_jue").unwrap();
    assert!(state.level.is_terminal());
    assert!(unlocked.iter().any(|f| f == "万剑归宗"));
    assert!(state.is_unlocked("万剑归宗"));

    let left = cultivator.cultivation();
    assert_eq!(
        cultivator.upgrade_skill("qing_yuan_jian_jue", &catalog, &config),
        Err(RulesError::TerminalMastery("qing_yuan_jian_jue".to_string()))
    );
    assert_eq!(cultivator.cultivation(), left);

    assert_eq!(
        cultivator.upgrade_skill("da_yan_jue", &catalog, &config),
        Err(RulesError::SkillNotLearned("da_yan_jue".to_string()))
    );
}

/// Climbing all 28 stages ends in the terminal state
#[test]
fn test_full_climb_ends_at_peak() {
    let config = RulesConfig::default();
    let mut cultivator = Cultivator::new(RealmStage::FIRST);
    let total: u64 = RealmStage::all()
        .skip(1)
        .map(|stage| config.realm_cost(stage))
        .sum();
    cultivator.award(total);

    let mut breakthroughs = 0;
    while cultivator.advance_realm(&config).is_ok() {
        breakthroughs += 1;
    }
    assert_eq!(breakthroughs, 27);
    assert_eq!(cultivator.stage(), RealmStage::PEAK);
    assert_eq!(cultivator.stage().to_string(), "大乘巅峰");
    assert_eq!(cultivator.cultivation(), 0);

    cultivator.award(1_000);
    assert_eq!(
        cultivator.advance_realm(&config),
        Err(RulesError::TerminalState)
    );
    assert_eq!(cultivator.cultivation(), 1_000);
}

#[test]
fn test_realm_labels_parse_and_reject() {
    assert_eq!(parse_realm("金丹后期").unwrap(), RealmStage::new(2, 2).unwrap());
    assert_eq!(parse_realm("元婴").unwrap(), RealmStage::new(3, 0).unwrap());
    for stage in RealmStage::all() {
        assert_eq!(parse_realm(&stage.label()).unwrap(), stage);
    }
    assert_eq!(
        parse_realm("渡劫初期"),
        Err(RulesError::UnrecognizedRealm("渡劫初期".to_string()))
    );
    assert!(parse_realm("筑基大圆满").is_err());
}

/// Concurrent awards and breakthroughs through the shared handle
#[test]
fn test_shared_cultivator_serializes_breakthroughs() {
    let config = RulesConfig::default();
    let shared = SharedCultivator::new(Cultivator::new(RealmStage::FIRST));
    let cost = config.realm_cost(RealmStage::new(0, 1).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let config = config.clone();
            std::thread::spawn(move || {
                shared.award(cost / 4);
                shared.advance_realm(&config).is_ok()
            })
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert!(successes <= 1);
    let snapshot = shared.snapshot();
    if successes == 1 {
        assert_eq!(snapshot.stage(), RealmStage::new(0, 1).unwrap());
        assert_eq!(snapshot.cultivation(), (cost / 4) * 4 - cost);
    } else {
        assert_eq!(snapshot.stage(), RealmStage::FIRST);
        assert_eq!(snapshot.cultivation(), (cost / 4) * 4);
    }
}
