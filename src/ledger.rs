//! Persistent attempt ledger.
//!
//! Holds every [`AttemptRecord`] in insertion order plus a `(hash, mode)`
//! index. The on-disk form is a pretty-printed JSON array. Saves go through a
//! sibling temp file that is renamed over the ledger, and are skipped entirely
//! when nothing was recorded since the last load or save.
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::attempt::{AttemptRecord, ModeId};

/// Default ledger file name, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "crack_log.json";

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("failed to read ledger {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse ledger {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write ledger {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    records: Vec<AttemptRecord>,
    index: HashSet<(String, ModeId)>,
    dirty: bool,
}

impl Ledger {
    /// An empty ledger that will be saved to `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            index: HashSet::new(),
            dirty: false,
        }
    }

    /// Load the ledger at `path`. A missing file yields an empty ledger; any
    /// other read or parse failure is returned.
    pub fn load<P: Into<PathBuf>>(path: P) -> Result<Self, LedgerError> {
        let mut ledger = Self::new(path);
        let contents = match std::fs::read_to_string(&ledger.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no ledger at {}, starting fresh", ledger.path.display());
                return Ok(ledger);
            }
            Err(source) => {
                return Err(LedgerError::Read {
                    path: ledger.path,
                    source,
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(ledger);
        }
        let records: Vec<AttemptRecord> =
            serde_json::from_str(&contents).map_err(|source| LedgerError::Parse {
                path: ledger.path.clone(),
                source,
            })?;
        let total = records.len();
        for r in records {
            if !ledger.index.insert(r.key()) {
                log::warn!(
                    "ledger {}: duplicate entry for hash {} mode {} ignored",
                    ledger.path.display(),
                    r.hash,
                    r.mode_id
                );
                continue;
            }
            ledger.records.push(r);
        }
        // Dropping duplicates changes the file, so the next save must rewrite it.
        ledger.dirty = ledger.records.len() != total;
        log::info!(
            "loaded {} attempt record(s), {} cracked, from {}",
            ledger.records.len(),
            ledger.cracked().count(),
            ledger.path.display()
        );
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    pub fn has_attempt(&self, hash: &str, mode: ModeId) -> bool {
        self.index.contains(&(hash.to_string(), mode))
    }

    /// Record an attempt. Returns `false` (and changes nothing) when the pair
    /// is already present.
    pub fn record(
        &mut self,
        hash: &str,
        mode: ModeId,
        clear: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> bool {
        if !self.index.insert((hash.to_string(), mode)) {
            return false;
        }
        let rec = AttemptRecord::new(hash, mode, clear, timestamp);
        log::debug!("ledger: {} mode {} {}", rec.hash, rec.mode_id, rec.outcome);
        self.records.push(rec);
        self.dirty = true;
        true
    }

    /// Cracked records, in the order they were recorded.
    pub fn cracked(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.records.iter().filter(|r| r.is_cracked())
    }

    pub fn to_json(&self) -> Result<String, LedgerError> {
        let mut json = serde_json::to_string_pretty(&self.records)?;
        json.push('\n');
        Ok(json)
    }

    /// Persist pending records. A no-op when nothing changed.
    pub fn save(&mut self) -> Result<(), LedgerError> {
        if !self.is_dirty() {
            return Ok(());
        }
        let json = self.to_json()?;
        let write_err = |source| LedgerError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".crack_log_")
            .tempfile_in(&dir)
            .map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        self.dirty = false;
        log::info!(
            "saved {} attempt record(s) to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}
