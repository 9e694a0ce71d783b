use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::attempt::ModeId;

#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    #[error("not a mode table row: {0}")]
    NotAModeRow(String),
}

/// One row of hashcat's identify table, e.g. `1400 | SHA2-256 | Raw Hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeInfo {
    pub id: ModeId,
    pub name: String,
    pub category: String,
}

impl ModeInfo {
    pub fn new(id: ModeId, name: &str, category: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

impl fmt::Display for ModeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.id, self.name)
        }
    }
}

fn row_pattern() -> &'static Regex {
    static ROW: OnceLock<Regex> = OnceLock::new();
    ROW.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*\|\s*(.+?)\s*\|\s*(.+)$").expect("mode row pattern is valid")
    })
}

pub fn parse_mode_line(line: &str) -> Result<ModeInfo, ModeError> {
    let caps = row_pattern()
        .captures(line)
        .ok_or_else(|| ModeError::NotAModeRow(line.to_string()))?;
    let id = caps[1]
        .parse()
        .map_err(|_| ModeError::NotAModeRow(line.to_string()))?;
    Ok(ModeInfo::new(id, caps[2].trim(), caps[3].trim()))
}

/// Parse every mode row in an identify listing, skipping headers, separators,
/// and repeated ids.
pub fn parse_mode_table(output: &str) -> Vec<ModeInfo> {
    let mut modes: Vec<ModeInfo> = Vec::new();
    let mut seen: HashSet<ModeId> = HashSet::new();
    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Ok(m) = parse_mode_line(trimmed) {
            if seen.insert(m.id) {
                modes.push(m);
            }
        }
    }
    modes
}

/// Candidate modes together with the hashes each mode may be tried against.
#[derive(Debug, Default, Clone)]
pub struct Candidates {
    modes: BTreeMap<ModeId, ModeHashes>,
}

#[derive(Debug, Clone)]
struct ModeHashes {
    info: ModeInfo,
    hashes: Vec<String>,
    seen: HashSet<String>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `hash` to `mode`. Hashes keep the order they were added in.
    pub fn add(&mut self, mode: &ModeInfo, hash: &str) {
        let entry = self.modes.entry(mode.id).or_insert_with(|| ModeHashes {
            info: mode.clone(),
            hashes: Vec::new(),
            seen: HashSet::new(),
        });
        if entry.info.name.is_empty() && !mode.name.is_empty() {
            entry.info = mode.clone();
        }
        if entry.seen.insert(hash.to_string()) {
            entry.hashes.push(hash.to_string());
        }
    }

    /// Keep only the listed mode ids; an empty filter keeps everything.
    pub fn retain_ids(&mut self, ids: &[ModeId]) {
        if ids.is_empty() {
            return;
        }
        self.modes.retain(|id, _| ids.contains(id));
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Modes in ascending id order with their compatible hashes.
    pub fn iter(&self) -> impl Iterator<Item = (&ModeInfo, &[String])> {
        self.modes
            .values()
            .map(|e| (&e.info, e.hashes.as_slice()))
    }
}
