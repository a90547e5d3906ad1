//! Simulation report generation.

use crate::core::constants::{MAJOR_REALM_NAMES, NUM_MAJOR_REALMS};
use crate::progression::{MasteryLevel, RealmStage};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one simulated character.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub total_ticks: u64,
    pub final_stage: RealmStage,
    pub reached_peak: bool,
    pub breakthroughs: u32,
    pub upgrades: u32,
    pub leftover_cultivation: u64,
    pub final_mastery: Option<MasteryLevel>,
    /// Tick each major realm was first entered, if ever.
    pub major_reached_tick: Vec<Option<u64>>,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            total_ticks: 0,
            final_stage: RealmStage::FIRST,
            reached_peak: false,
            breakthroughs: 0,
            upgrades: 0,
            leftover_cultivation: 0,
            final_mastery: None,
            major_reached_tick: vec![None; NUM_MAJOR_REALMS],
        }
    }
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_completed: u32,
    pub runs_timed_out: u32,

    pub avg_ticks_to_complete: f64,
    pub avg_breakthroughs: f64,
    pub avg_upgrades: f64,
    pub avg_leftover_cultivation: f64,

    /// Per major realm: share of runs that got there, and mean entry tick
    /// among those that did.
    pub major_reach_rate: Vec<f64>,
    pub avg_ticks_to_major: Vec<f64>,

    pub final_stage_distribution: BTreeMap<String, u32>,
    pub mastery_distribution: BTreeMap<String, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    pub fn from_runs(runs: Vec<RunStats>, max_ticks: u64) -> Self {
        let num_runs = runs.len() as u32;
        let denom = num_runs.max(1) as f64;
        let runs_completed = runs.iter().filter(|r| r.reached_peak).count() as u32;
        let runs_timed_out = runs
            .iter()
            .filter(|r| !r.reached_peak && r.total_ticks >= max_ticks)
            .count() as u32;

        let avg_ticks_to_complete = runs
            .iter()
            .filter(|r| r.reached_peak)
            .map(|r| r.total_ticks as f64)
            .sum::<f64>()
            / runs_completed.max(1) as f64;
        let avg_breakthroughs =
            runs.iter().map(|r| r.breakthroughs as f64).sum::<f64>() / denom;
        let avg_upgrades = runs.iter().map(|r| r.upgrades as f64).sum::<f64>() / denom;
        let avg_leftover_cultivation = runs
            .iter()
            .map(|r| r.leftover_cultivation as f64)
            .sum::<f64>()
            / denom;

        let mut major_reach_rate = vec![0.0; NUM_MAJOR_REALMS];
        let mut avg_ticks_to_major = vec![0.0; NUM_MAJOR_REALMS];
        for major in 0..NUM_MAJOR_REALMS {
            let reached: Vec<u64> = runs
                .iter()
                .filter_map(|r| r.major_reached_tick.get(major).copied().flatten())
                .collect();
            major_reach_rate[major] = reached.len() as f64 / denom;
            if !reached.is_empty() {
                avg_ticks_to_major[major] =
                    reached.iter().sum::<u64>() as f64 / reached.len() as f64;
            }
        }

        let mut final_stage_distribution = BTreeMap::new();
        let mut mastery_distribution = BTreeMap::new();
        for run in &runs {
            *final_stage_distribution
                .entry(run.final_stage.label())
                .or_insert(0) += 1;
            if let Some(level) = run.final_mastery {
                *mastery_distribution
                    .entry(level.name().to_string())
                    .or_insert(0) += 1;
            }
        }

        Self {
            num_runs,
            runs_completed,
            runs_timed_out,
            avg_ticks_to_complete,
            avg_breakthroughs,
            avg_upgrades,
            avg_leftover_cultivation,
            major_reach_rate,
            avg_ticks_to_major,
            final_stage_distribution,
            mastery_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                 CULTIVATION PACING REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached 大乘巅峰, {} timed out\n\n",
            self.num_runs, self.runs_completed, self.runs_timed_out
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Ticks to Peak:      {:.0}\n",
            self.avg_ticks_to_complete
        ));
        report.push_str(&format!(
            "  Avg Breakthroughs:      {:.1}\n",
            self.avg_breakthroughs
        ));
        report.push_str(&format!(
            "  Avg Mastery Upgrades:   {:.1}\n",
            self.avg_upgrades
        ));
        report.push_str(&format!(
            "  Avg Leftover Cultivation: {:.0}\n\n",
            self.avg_leftover_cultivation
        ));

        report.push_str("── MAJOR REALMS ─────────────────────────────────────────────────\n");
        report.push_str("  Realm   Reached   Avg Tick\n");
        for (major, name) in MAJOR_REALM_NAMES.iter().enumerate() {
            let pct = self.major_reach_rate[major] * 100.0;
            let bar = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!(
                "  {}    {:>5.1}%   {:>8.0}  {}\n",
                name, pct, self.avg_ticks_to_major[major], bar
            ));
        }
        report.push('\n');

        if !self.mastery_distribution.is_empty() {
            report.push_str("── FINAL MASTERY ────────────────────────────────────────────────\n");
            for level in MasteryLevel::ALL {
                if let Some(count) = self.mastery_distribution.get(level.name()) {
                    report.push_str(&format!("  {}: {}\n", level.name(), count));
                }
            }
            report.push('\n');
        }

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let completion_rate = self.runs_completed as f64 / self.num_runs.max(1) as f64 * 100.0;
        report.push_str(&format!("  Completion Rate: {:.1}%\n", completion_rate));
        for major in 1..NUM_MAJOR_REALMS {
            let before = self.avg_ticks_to_major[major - 1];
            let after = self.avg_ticks_to_major[major];
            if before > 0.0 && after > 0.0 && after - before > before * 4.0 {
                report.push_str(&format!(
                    "  ⚠️  {} takes over 4x longer to reach than {}\n",
                    MAJOR_REALM_NAMES[major],
                    MAJOR_REALM_NAMES[major - 1]
                ));
            }
        }
        if self.runs_timed_out > self.num_runs / 2 {
            report.push_str("  ⚠️  Most runs never reach the peak - late realms too costly?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ticks: u64, peak: bool, reached: &[u64]) -> RunStats {
        let mut major_reached_tick = vec![None; NUM_MAJOR_REALMS];
        for (major, tick) in reached.iter().enumerate() {
            major_reached_tick[major] = Some(*tick);
        }
        RunStats {
            total_ticks: ticks,
            final_stage: if peak {
                RealmStage::PEAK
            } else {
                RealmStage::new(reached.len() as u8 - 1, 0).unwrap()
            },
            reached_peak: peak,
            breakthroughs: 4,
            major_reached_tick,
            ..RunStats::default()
        }
    }

    #[test]
    fn test_report_generation() {
        let runs = vec![
            run(100, true, &[0, 10, 20, 30, 40, 50, 60]),
            run(1_000, false, &[0, 30]),
        ];
        let report = SimReport::from_runs(runs, 1_000);

        assert_eq!(report.num_runs, 2);
        assert_eq!(report.runs_completed, 1);
        assert_eq!(report.runs_timed_out, 1);
        assert!((report.avg_ticks_to_complete - 100.0).abs() < f64::EPSILON);
        assert!((report.major_reach_rate[1] - 1.0).abs() < f64::EPSILON);
        assert!((report.major_reach_rate[2] - 0.5).abs() < f64::EPSILON);
        assert!((report.avg_ticks_to_major[1] - 20.0).abs() < f64::EPSILON);
        assert_eq!(report.final_stage_distribution.get("大乘巅峰"), Some(&1));
    }

    #[test]
    fn test_text_and_json_output() {
        let report = SimReport::from_runs(vec![run(50, true, &[0, 5, 10, 15, 20, 25, 30])], 100);
        let text = report.to_text();
        assert!(text.contains("Completion Rate: 100.0%"));
        assert!(text.contains("筑基"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["runs_completed"], 1);
        assert!(json.get("run_stats").is_none());
    }
}
