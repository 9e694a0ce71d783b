//! Engine: detects candidate modes, builds per-mode subsets of hashes that the
//! ledger has not seen for that mode, drives one crack invocation per mode
//! with an isolated potfile, and merges the results back into the ledger.
//!
//! Typical usage:
//!
//! ```no_run
//! use autocrack::{engine::{Engine, RunConfig}, hashcat::Hashcat, ledger::Ledger};
//! # fn main() -> anyhow::Result<()> {
//! let cfg = RunConfig::new("hashes.txt", "rockyou.txt");
//! let hashes = autocrack::hashes::load_hash_file(&cfg.hash_file, cfg.mmap_threshold)?;
//! let mut ledger = Ledger::load(&cfg.ledger_path)?;
//! let hashcat = Hashcat::default();
//! let report = Engine::new(&hashcat).run(&cfg, &hashes, &mut ledger)?;
//! println!("{}", autocrack::report::render_summary(&report));
//! # Ok(())
//! # }
//! ```
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;

use crate::attempt::ModeId;
use crate::error::AutoCrackError;
use crate::hashcat::{CrackJob, CrackStatus, Cracker, ToolError};
use crate::io::DEFAULT_MMAP_THRESHOLD_BYTES;
use crate::ledger::{DEFAULT_LEDGER_FILE, Ledger};
use crate::modes::{Candidates, ModeInfo};
use crate::report::{render_candidates, render_mode_line, render_mode_start};
use crate::scratch::ScratchSpace;
use crate::signal::ShutdownHandler;

/// How candidate modes are assigned to hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectStrategy {
    /// Identify each hash on its own; a mode only sees hashes valid for it.
    #[default]
    PerHash,
    /// Identify the whole file once; every hash goes to every mode.
    File,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub hash_file: PathBuf,
    pub wordlist: PathBuf,
    pub ledger_path: PathBuf,
    pub detect: DetectStrategy,
    /// Restrict candidates to these ids; empty means no restriction.
    pub modes: Vec<ModeId>,
    pub scratch_dir: Option<PathBuf>,
    pub mmap_threshold: u64,
}

impl RunConfig {
    pub fn new<P: Into<PathBuf>, W: Into<PathBuf>>(hash_file: P, wordlist: W) -> Self {
        Self {
            hash_file: hash_file.into(),
            wordlist: wordlist.into(),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
            detect: DetectStrategy::default(),
            modes: Vec::new(),
            scratch_dir: None,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeResult {
    /// Every compatible hash already has an attempt for this mode.
    Skipped,
    Found(Vec<(String, String)>),
    NotFound,
    /// The invocation failed; nothing was recorded.
    Failed(String),
    /// Ctrl+C arrived while the mode ran; nothing was recorded.
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct ModeReport {
    pub mode: ModeInfo,
    /// Hashes sent to hashcat (0 when skipped).
    pub pending: usize,
    pub result: ModeResult,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub total_hashes: usize,
    pub candidate_modes: usize,
    pub modes: Vec<ModeReport>,
    /// New ledger records written during this run.
    pub recorded: usize,
    pub interrupted: bool,
}

impl RunReport {
    /// Pairs cracked during this run, grouped by mode in run order.
    pub fn newly_cracked(&self) -> impl Iterator<Item = (&ModeInfo, &str, &str)> {
        self.modes.iter().flat_map(|m| {
            let pairs: &[(String, String)] = match &m.result {
                ModeResult::Found(p) => p,
                _ => &[],
            };
            pairs
                .iter()
                .map(move |(h, p)| (&m.mode, h.as_str(), p.as_str()))
        })
    }
}

/// Hashes from `compatible`, in order, with no attempt recorded for `mode`.
pub fn build_subset(compatible: &[String], mode: ModeId, ledger: &Ledger) -> Vec<String> {
    compatible
        .iter()
        .filter(|h| !ledger.has_attempt(h, mode))
        .cloned()
        .collect()
}

pub struct Engine<'a, C: Cracker> {
    cracker: &'a C,
    shutdown: ShutdownHandler,
    progress: bool,
}

impl<'a, C: Cracker> Engine<'a, C> {
    pub fn new(cracker: &'a C) -> Self {
        Self {
            cracker,
            shutdown: ShutdownHandler::new(),
            progress: false,
        }
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownHandler) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Print per-mode progress lines to stdout while running.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn print(&self, s: &str) {
        if self.progress {
            println!("{}", s);
        }
    }

    /// Enumerate candidate modes for `hashes`. Spawn failures are fatal; a
    /// per-hash probe that exits non-zero only means that hash has no modes.
    pub fn detect(
        &self,
        scratch: &ScratchSpace,
        cfg: &RunConfig,
        hashes: &[String],
    ) -> Result<Candidates, AutoCrackError> {
        let mut candidates = Candidates::new();
        match cfg.detect {
            DetectStrategy::File => {
                let probe = scratch.probe_file(hashes).map_err(AutoCrackError::Scratch)?;
                let modes = match self.cracker.identify(probe.path()) {
                    Ok(m) => m,
                    Err(_) if self.shutdown.is_shutdown_requested() => {
                        return Err(AutoCrackError::Interrupted);
                    }
                    Err(e) => return Err(e.into()),
                };
                for mode in &modes {
                    for h in hashes {
                        candidates.add(mode, h);
                    }
                }
            }
            DetectStrategy::PerHash => {
                for h in hashes {
                    if self.shutdown.is_shutdown_requested() {
                        return Err(AutoCrackError::Interrupted);
                    }
                    let probe = scratch
                        .probe_file(std::slice::from_ref(h))
                        .map_err(AutoCrackError::Scratch)?;
                    match self.cracker.identify(probe.path()) {
                        Ok(modes) if modes.is_empty() => {
                            log::warn!("no candidate modes for hash {}", h);
                        }
                        Ok(modes) => {
                            for mode in &modes {
                                candidates.add(mode, h);
                            }
                        }
                        Err(e @ ToolError::Failed { .. }) => {
                            log::warn!("no candidate modes for hash {}: {}", h, e);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
        if self.shutdown.is_shutdown_requested() {
            return Err(AutoCrackError::Interrupted);
        }
        candidates.retain_ids(&cfg.modes);
        if candidates.is_empty() {
            return Err(AutoCrackError::NoCandidates);
        }
        Ok(candidates)
    }

    fn run_mode(
        &self,
        scratch: &ScratchSpace,
        cfg: &RunConfig,
        mode: &ModeInfo,
        pending: &[String],
        ledger: &mut Ledger,
        recorded: &mut usize,
    ) -> Result<ModeResult, AutoCrackError> {
        let subset = scratch
            .subset_file(mode.id, pending)
            .map_err(AutoCrackError::Scratch)?;
        let pot = scratch
            .result_store(mode.id)
            .map_err(AutoCrackError::Scratch)?;
        let job = CrackJob {
            mode: mode.id,
            subset: subset.path(),
            subset_hashes: pending,
            wordlist: &cfg.wordlist,
            potfile: pot.path(),
        };
        let outcome = self.cracker.crack(&job);
        if self.shutdown.is_shutdown_requested() {
            return Ok(ModeResult::Interrupted);
        }
        let outcome = match outcome {
            Ok(o) => o,
            Err(e @ (ToolError::NotFound(_) | ToolError::Spawn { .. })) => return Err(e.into()),
            Err(e) => {
                log::warn!("mode {}: {}", mode.id, e);
                return Ok(ModeResult::Failed(e.to_string()));
            }
        };
        if outcome.status == CrackStatus::Cracked && outcome.pairs.is_empty() {
            log::warn!("mode {}: hashcat reported a crack but --show returned nothing", mode.id);
        }
        let now = Utc::now();
        let recovered: HashMap<&str, &str> = outcome
            .pairs
            .iter()
            .map(|(h, p)| (h.as_str(), p.as_str()))
            .collect();
        for h in pending {
            let clear = recovered.get(h.as_str()).copied();
            if ledger.record(h, mode.id, clear, now) {
                *recorded += 1;
            }
        }
        ledger.save()?;
        if outcome.pairs.is_empty() {
            Ok(ModeResult::NotFound)
        } else {
            Ok(ModeResult::Found(outcome.pairs))
        }
    }

    /// Process every candidate mode once, serially.
    pub fn run(
        &self,
        cfg: &RunConfig,
        hashes: &[String],
        ledger: &mut Ledger,
    ) -> Result<RunReport, AutoCrackError> {
        let scratch =
            ScratchSpace::new(cfg.scratch_dir.as_deref()).map_err(AutoCrackError::Scratch)?;
        let candidates = self.detect(&scratch, cfg, hashes)?;
        self.print(&render_candidates(&candidates));

        let mut report = RunReport {
            total_hashes: hashes.len(),
            candidate_modes: candidates.len(),
            ..RunReport::default()
        };
        for (mode, compatible) in candidates.iter() {
            if self.shutdown.is_shutdown_requested() {
                report.interrupted = true;
                break;
            }
            let pending = build_subset(compatible, mode.id, ledger);
            let result = if pending.is_empty() {
                ModeResult::Skipped
            } else {
                self.print(&render_mode_start(mode, pending.len()));
                self.run_mode(&scratch, cfg, mode, &pending, ledger, &mut report.recorded)?
            };
            self.print(&render_mode_line(mode, &result));
            let interrupted = result == ModeResult::Interrupted;
            report.modes.push(ModeReport {
                mode: mode.clone(),
                pending: pending.len(),
                result,
            });
            if interrupted {
                report.interrupted = true;
                break;
            }
        }

        if let Err(e) = scratch.close() {
            log::warn!("{:#}", e);
        }
        Ok(report)
    }
}
