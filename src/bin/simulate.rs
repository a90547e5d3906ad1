//! Cultivation balance simulator CLI.
//!
//! Runs Monte Carlo simulations of realm and mastery pacing.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # 1000 runs, realm only
//!   cargo run --bin simulate -- -n 100 --skill da_yan_jue
//!   cargo run --bin simulate -- --seed 42 --json      # Reproducible, JSON saved
//!   RUST_LOG=xiuxian=debug cargo run --bin simulate -- -n 1

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use xiuxian::build::Background;
use xiuxian::build_info;
use xiuxian::catalog::Catalog;
use xiuxian::core::RulesConfig;
use xiuxian::simulator::{run_simulation, SimConfig};

struct Options {
    sim: SimConfig,
    rules_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    let config = &options.sim;

    let rules = match &options.rules_path {
        Some(path) => match RulesConfig::load(path) {
            Ok(rules) => rules,
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not load rules");
                return ExitCode::FAILURE;
            }
        },
        None => RulesConfig::default(),
    };
    let catalog = match &options.catalog_path {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not load catalog");
                return ExitCode::FAILURE;
            }
        },
        None => Catalog::builtin(),
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              修仙 CULTIVATION PACING SIMULATOR                ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("{}", build_info::banner());
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Background:     {}", config.background.name());
    println!("  Award / tick:   {}..={}", config.min_award, config.max_award);
    println!("  Max Ticks:      {}", config.max_ticks_per_run);
    if let Some(skill) = &config.train_skill {
        println!(
            "  Training:       {} ({:.0}% focus)",
            skill,
            config.skill_focus * 100.0
        );
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    info!(runs = config.num_runs, "starting simulation");
    let report = match run_simulation(config, &rules, &catalog) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "simulation aborted");
            return ExitCode::FAILURE;
        }
    };

    if config.verbosity >= 2 {
        for (idx, run) in report.run_stats.iter().enumerate() {
            println!(
                "Run {}/{} - {} after {} ticks, {} breakthroughs, {} upgrades",
                idx + 1,
                config.num_runs,
                run.final_stage,
                run.total_ticks,
                run.breakthroughs,
                run.upgrades
            );
        }
    }
    if config.verbosity >= 1 {
        println!("{}", report.to_text());
    }

    if options.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        if let Err(e) = fs::write(&filename, report.to_json()) {
            error!(file = %filename, error = %e, "could not write JSON report");
            return ExitCode::FAILURE;
        }
        println!("JSON report saved to: {}", filename);
    }

    ExitCode::SUCCESS
}

fn parse_background(value: &str) -> Option<Background> {
    Background::ALL.into_iter().find(|b| {
        b.name() == value || format!("{b:?}").eq_ignore_ascii_case(value)
    })
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        sim: SimConfig::default(),
        rules_path: None,
        catalog_path: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let next = args.get(i + 1);
        let config = &mut options.sim;
        match args[i].as_str() {
            "-n" | "--runs" => {
                if let Some(v) = next {
                    config.num_runs = v.parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if let Some(v) = next {
                    config.seed = v.parse().ok();
                    i += 1;
                }
            }
            "-t" | "--ticks" => {
                if let Some(v) = next {
                    config.max_ticks_per_run = v.parse().unwrap_or(100_000);
                    i += 1;
                }
            }
            "--award" => {
                // MIN..MAX or a single fixed amount
                if let Some(v) = next {
                    let (lo, hi) = v.split_once("..").unwrap_or((v.as_str(), v.as_str()));
                    let hi = hi.trim_start_matches('=');
                    if let (Ok(lo), Ok(hi)) = (lo.parse::<u64>(), hi.parse::<u64>()) {
                        config.min_award = lo;
                        config.max_award = hi;
                    }
                    i += 1;
                }
            }
            "-b" | "--background" => {
                if let Some(background) = next.and_then(|v| parse_background(v)) {
                    config.background = background;
                    i += 1;
                }
            }
            "--skill" => {
                if let Some(v) = next {
                    config.train_skill = Some(v.clone());
                    i += 1;
                }
            }
            "--focus" => {
                if let Some(v) = next {
                    config.skill_focus = v.parse::<f64>().unwrap_or(0.25).clamp(0.0, 1.0);
                    i += 1;
                }
            }
            "--rules" => {
                if let Some(v) = next {
                    options.rules_path = Some(PathBuf::from(v));
                    i += 1;
                }
            }
            "--catalog" => {
                if let Some(v) = next {
                    options.catalog_path = Some(PathBuf::from(v));
                    i += 1;
                }
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--json" => {
                options.json = true;
            }
            "--quick" => {
                options.sim = SimConfig::realm_pacing_test();
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    options
}

fn print_help() {
    println!("{}", build_info::banner());
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>          Number of simulated characters (default: 1000)");
    println!("    -s, --seed <S>          Random seed for reproducibility");
    println!("    -t, --ticks <T>         Max ticks per run (default: 100,000)");
    println!("    --award <MIN..MAX>      Cultivation per tick (default: 50..150)");
    println!("    -b, --background <B>    凡人/散修/世家/宗门 or mortal/rogue/clan/sect");
    println!("    --skill <ID>            Train this skill alongside the realm");
    println!("    --focus <P>             Chance per tick to spend on the skill first");
    println!("    --rules <FILE>          Load balance tables from JSON");
    println!("    --catalog <FILE>        Load traits and skills from JSON");
    println!("    --json                  Save JSON report");
    println!("    --quick                 100 runs, realm only");
    println!("    -q, --quiet             No text report");
    println!("    -v, --verbose           Print every run");
    println!("    -h, --help              Show this help");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=xiuxian=debug) for engine logs.");
}
