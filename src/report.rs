//! Human-readable progress and summary rendering for terminal output.
//!
//! Progress lines are printed by the engine as each mode finishes; the summary
//! lists every mode that cracked something during this run, then run
//! statistics.
use colored::*;

use crate::{
    engine::{ModeResult, RunReport},
    modes::{Candidates, ModeInfo},
    stats::calculate_statistics,
};

fn visible_len(s: &str) -> usize {
    // Strip ANSI escape sequences (\x1b[ ... m) to compute printable width
    let mut len = 0;
    let mut iter = s.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\u{1b}' {
            if let Some('[') = iter.peek().cloned() {
                let _ = iter.next();
            }
            for c in iter.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

fn section_header(title: &str) -> String {
    let len = visible_len(title);
    let mut s = String::new();
    s.push('\n');
    s.push_str(title);
    s.push('\n');
    s.push_str(&"─".repeat(len));
    s.push_str("\n\n");
    s
}

fn mode_label(mode: &ModeInfo) -> String {
    if mode.name.is_empty() {
        format!("{:<6}", mode.id)
    } else {
        format!("{:<6} ({})", mode.id, mode.name)
    }
}

fn pair_line(hash: &str, clear: &str) -> String {
    format!("    {} → '{}'", hash, clear)
}

pub fn render_candidates(candidates: &Candidates) -> String {
    let mut out = format!("→ Found {} candidate mode(s):", candidates.len());
    for (mode, hashes) in candidates.iter() {
        out.push_str(&format!(
            "\n   • {} [{} hash(es)]",
            mode_label(mode),
            hashes.len()
        ));
    }
    out
}

pub fn render_mode_start(mode: &ModeInfo, pending: usize) -> String {
    format!("→ Mode {} … trying {} hash(es)", mode_label(mode), pending)
}

pub fn render_mode_line(mode: &ModeInfo, result: &ModeResult) -> String {
    let prefix = format!("→ Mode {} … ", mode_label(mode));
    match result {
        ModeResult::Skipped => format!(
            "{}{} no new hashes for this mode (remove them from the ledger to retry)",
            prefix,
            "[SKIPPED]".dimmed()
        ),
        ModeResult::NotFound => format!("{}{}", prefix, "[NOT FOUND]".yellow()),
        ModeResult::Failed(e) => format!("{}{} {}", prefix, "[FAILED]".red(), e),
        ModeResult::Interrupted => format!("{}{}", prefix, "[INTERRUPTED]".red()),
        ModeResult::Found(pairs) => {
            let mut s = format!("{}{}", prefix, "[FOUND]".green().bold());
            for (h, p) in pairs {
                s.push('\n');
                s.push_str(&pair_line(h, p));
            }
            s
        }
    }
}

pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        "AutoCrack: Run Summary".bold().cyan()
    ));

    // Modes that cracked something
    let mut cracked_lines: Vec<String> = Vec::new();
    for m in &report.modes {
        if let ModeResult::Found(pairs) = &m.result {
            cracked_lines.push(format!(
                "{} cracked {} hash(es):",
                format!("Mode {}", m.mode).bold().green(),
                pairs.len()
            ));
            for (h, p) in pairs {
                cracked_lines.push(pair_line(h, &p.red().to_string()));
            }
        }
    }
    if cracked_lines.is_empty() {
        cracked_lines.push("No modes cracked any new hashes. Check your wordlist and/or hash file.".to_string());
    }
    out.push_str(&section_header(
        &"Modes That Cracked Something".bold().yellow().to_string(),
    ));
    for line in cracked_lines {
        out.push_str(&line);
        out.push('\n');
    }

    // Run statistics
    let s = calculate_statistics(report);
    let stats_lines = [
        format!("Input Hashes: {}", s.total_hashes),
        format!("Candidate Modes: {}", s.candidate_modes),
        format!("  Attempted: {}", s.attempted_modes),
        format!("  Skipped: {}", s.skipped_modes),
        format!("  Failed: {}", s.failed_modes),
        format!("  Cracked Something: {}", s.cracking_modes),
        format!("Attempts Recorded: {}", s.attempts_recorded),
        format!("Hashes Cracked This Run: {}", s.unique_cracked),
        format!("Cracked Percentage: {}", s.cracked_percentage),
    ];
    out.push_str(&section_header(
        &"Run Statistics".bold().blue().to_string(),
    ));
    for line in stats_lines {
        out.push_str(&line);
        out.push('\n');
    }
    if report.interrupted {
        out.push_str(&format!("\n{}\n", "(Run interrupted before all modes finished)".dimmed()));
    }

    out
}
