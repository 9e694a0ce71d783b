//! Statistical summary of a run.
//!
//! `RunStats` counts how each candidate mode ended and how much of the input
//! was recovered during this run.
use std::collections::HashSet;

use crate::engine::{ModeResult, RunReport};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total_hashes: usize,
    pub candidate_modes: usize,
    pub attempted_modes: usize,
    pub skipped_modes: usize,
    pub failed_modes: usize,
    pub cracking_modes: usize,
    pub attempts_recorded: usize,
    pub unique_cracked: usize,
    pub cracked_percentage: String,
}

fn pct(n: usize, d: usize) -> String {
    if d == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", (n as f64) / (d as f64) * 100.0)
}

pub fn calculate_statistics(report: &RunReport) -> RunStats {
    let mut stats = RunStats {
        total_hashes: report.total_hashes,
        candidate_modes: report.candidate_modes,
        attempts_recorded: report.recorded,
        ..RunStats::default()
    };
    for m in &report.modes {
        match m.result {
            ModeResult::Skipped => stats.skipped_modes += 1,
            ModeResult::Failed(_) => {
                stats.attempted_modes += 1;
                stats.failed_modes += 1;
            }
            ModeResult::Found(_) => {
                stats.attempted_modes += 1;
                stats.cracking_modes += 1;
            }
            ModeResult::NotFound | ModeResult::Interrupted => stats.attempted_modes += 1,
        }
    }
    let unique: HashSet<&str> = report.newly_cracked().map(|(_, h, _)| h).collect();
    stats.unique_cracked = unique.len();
    stats.cracked_percentage = pct(stats.unique_cracked, stats.total_hashes);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ModeReport;
    use crate::modes::ModeInfo;

    fn mode_report(id: u32, result: ModeResult) -> ModeReport {
        ModeReport {
            mode: ModeInfo::new(id, "", ""),
            pending: 1,
            result,
        }
    }

    #[test]
    fn counts_mode_outcomes_and_unique_hashes() {
        let pair = |h: &str| (h.to_string(), "pw".to_string());
        let report = RunReport {
            total_hashes: 3,
            candidate_modes: 4,
            modes: vec![
                mode_report(0, ModeResult::Found(vec![pair("a"), pair("b")])),
                mode_report(10, ModeResult::Found(vec![pair("a")])),
                mode_report(20, ModeResult::Skipped),
                mode_report(30, ModeResult::Failed("x".into())),
            ],
            recorded: 5,
            interrupted: false,
        };
        let s = calculate_statistics(&report);
        assert_eq!(s.attempted_modes, 3);
        assert_eq!(s.skipped_modes, 1);
        assert_eq!(s.failed_modes, 1);
        assert_eq!(s.cracking_modes, 2);
        assert_eq!(s.unique_cracked, 2);
        assert_eq!(s.cracked_percentage, "66.67%");
    }

    #[test]
    fn empty_report_has_zero_percent() {
        let s = calculate_statistics(&RunReport::default());
        assert_eq!(s.cracked_percentage, "0.00%");
    }
}
