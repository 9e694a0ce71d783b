//! The external cracking tool.
//!
//! [`Cracker`] is the seam between the engine and the process that actually
//! recovers passwords. [`Hashcat`] implements it by spawning the hashcat
//! binary; tests substitute in-memory implementations.
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::attempt::ModeId;
use crate::modes::{ModeInfo, parse_mode_table};
use crate::pot::parse_pot_contents;

pub const DEFAULT_HASHCAT_BIN: &str = "hashcat";

/// Straight wordlist attack (`-a 0`).
pub const ATTACK_MODE_STRAIGHT: &str = "0";

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("`{0}` not found; install hashcat or pass --hashcat <path>")]
    NotFound(String),
    #[error("failed to run `{bin}`: {source}")]
    Spawn { bin: String, source: io::Error },
    #[error("`{bin}` exited with {status}: {stderr}")]
    Failed {
        bin: String,
        status: String,
        stderr: String,
    },
}

/// How a completed crack invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrackStatus {
    /// Exit 0: at least one hash was recovered.
    Cracked,
    /// Exit 1: the wordlist ran out.
    Exhausted,
}

/// Inputs of one crack invocation.
#[derive(Debug, Clone, Copy)]
pub struct CrackJob<'a> {
    pub mode: ModeId,
    pub subset: &'a Path,
    pub subset_hashes: &'a [String],
    pub wordlist: &'a Path,
    pub potfile: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackOutcome {
    pub status: CrackStatus,
    /// Recovered (hash, plaintext) pairs, limited to the job's subset.
    pub pairs: Vec<(String, String)>,
}

pub trait Cracker {
    /// Candidate modes for the hashes in `hash_file`.
    fn identify(&self, hash_file: &Path) -> Result<Vec<ModeInfo>, ToolError>;

    /// Run one attack and report what it recovered. An `Err` means the
    /// invocation itself failed and nothing about the subset is known.
    fn crack(&self, job: &CrackJob<'_>) -> Result<CrackOutcome, ToolError>;
}

#[derive(Debug, Clone)]
pub struct Hashcat {
    bin: PathBuf,
}

impl Default for Hashcat {
    fn default() -> Self {
        Self::new(DEFAULT_HASHCAT_BIN)
    }
}

impl Hashcat {
    pub fn new<P: Into<PathBuf>>(bin: P) -> Self {
        Self { bin: bin.into() }
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    fn bin_name(&self) -> String {
        self.bin.display().to_string()
    }

    fn run(&self, args: &[OsString]) -> Result<Output, ToolError> {
        log::debug!(
            "running {} {}",
            self.bin.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ToolError::NotFound(self.bin_name()),
                _ => ToolError::Spawn {
                    bin: self.bin_name(),
                    source,
                },
            })
    }

    fn failed(&self, out: &Output) -> ToolError {
        ToolError::Failed {
            bin: self.bin_name(),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        }
    }

    fn attack_args(job: &CrackJob<'_>, show: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-m".into(),
            job.mode.to_string().into(),
            "-a".into(),
            ATTACK_MODE_STRAIGHT.into(),
            "--quiet".into(),
            "--potfile-path".into(),
            job.potfile.into(),
        ];
        if show {
            args.push("--show".into());
        }
        args.push(job.subset.into());
        args.push(job.wordlist.into());
        args
    }

    /// Check that the binary can be spawned at all.
    pub fn probe_version(&self) -> Result<String, ToolError> {
        let out = self.run(&["--version".into()])?;
        if !out.status.success() {
            return Err(self.failed(&out));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}

impl Cracker for Hashcat {
    fn identify(&self, hash_file: &Path) -> Result<Vec<ModeInfo>, ToolError> {
        let out = self.run(&["--identify".into(), hash_file.into()])?;
        if !out.status.success() {
            return Err(self.failed(&out));
        }
        Ok(parse_mode_table(&String::from_utf8_lossy(&out.stdout)))
    }

    fn crack(&self, job: &CrackJob<'_>) -> Result<CrackOutcome, ToolError> {
        let out = self.run(&Self::attack_args(job, false))?;
        let status = match out.status.code() {
            Some(0) => CrackStatus::Cracked,
            Some(1) => CrackStatus::Exhausted,
            _ => return Err(self.failed(&out)),
        };
        let shown = self.run(&Self::attack_args(job, true))?;
        if !shown.status.success() {
            return Err(self.failed(&shown));
        }
        let pairs = parse_pot_contents(&String::from_utf8_lossy(&shown.stdout), job.subset_hashes);
        Ok(CrackOutcome { status, pairs })
    }
}
