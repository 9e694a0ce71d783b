//! Attempt records: one per (hash, mode) pair that was handed to hashcat.
//!
//! The serialized shape is also what the ledger file contains. Older logs
//! stored `mode_id` as a string and only kept cracked entries without an
//! `outcome`; both forms are still accepted on read.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Numeric hashcat mode (`-m`).
pub type ModeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Cracked,
    Exhausted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Cracked => f.write_str("cracked"),
            Outcome::Exhausted => f.write_str("exhausted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub hash: String,
    pub mode_id: ModeId,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AttemptRecord {
    /// Build a record; the outcome follows from whether a plaintext exists.
    pub fn new(hash: &str, mode_id: ModeId, clear: Option<&str>, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: hash.to_string(),
            mode_id,
            outcome: if clear.is_some() {
                Outcome::Cracked
            } else {
                Outcome::Exhausted
            },
            clear: clear.map(str::to_string),
            timestamp,
        }
    }

    pub fn is_cracked(&self) -> bool {
        self.outcome == Outcome::Cracked
    }

    pub fn key(&self) -> (String, ModeId) {
        (self.hash.clone(), self.mode_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModeRepr {
    Number(ModeId),
    Text(String),
}

#[derive(Deserialize)]
struct RawRecord {
    hash: String,
    mode_id: ModeRepr,
    #[serde(default)]
    outcome: Option<Outcome>,
    #[serde(default)]
    clear: Option<String>,
    timestamp: DateTime<Utc>,
}

impl<'de> Deserialize<'de> for AttemptRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRecord::deserialize(deserializer)?;
        let mode_id = match raw.mode_id {
            ModeRepr::Number(n) => n,
            ModeRepr::Text(s) => s.trim().parse::<ModeId>().map_err(|_| {
                <D::Error as serde::de::Error>::custom(format!("invalid mode_id {s:?}"))
            })?,
        };
        let implied = if raw.clear.is_some() {
            Outcome::Cracked
        } else {
            Outcome::Exhausted
        };
        let outcome = raw.outcome.unwrap_or(implied);
        if outcome != implied {
            return Err(<D::Error as serde::de::Error>::custom(format!(
                "record for hash {:?} mode {} is {} but {} a plaintext",
                raw.hash,
                mode_id,
                outcome,
                if raw.clear.is_some() { "has" } else { "lacks" }
            )));
        }
        Ok(Self {
            hash: raw.hash,
            mode_id,
            outcome,
            clear: raw.clear,
            timestamp: raw.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_follows_plaintext() {
        let now = Utc::now();
        assert!(AttemptRecord::new("h", 0, Some(""), now).is_cracked());
        assert!(!AttemptRecord::new("h", 0, None, now).is_cracked());
    }

    #[test]
    fn reads_legacy_string_mode_and_python_timestamp() {
        let json = r#"{"hash":"abc","mode_id":"1400","clear":"pw","timestamp":"2024-05-01T12:30:00.123456+00:00"}"#;
        let r: AttemptRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.mode_id, 1400);
        assert_eq!(r.outcome, Outcome::Cracked);
        assert_eq!(r.clear.as_deref(), Some("pw"));
    }

    #[test]
    fn rejects_non_numeric_mode() {
        let json = r#"{"hash":"abc","mode_id":"md5","timestamp":"2024-05-01T12:30:00Z"}"#;
        assert!(serde_json::from_str::<AttemptRecord>(json).is_err());
    }

    #[test]
    fn outcome_must_agree_with_plaintext() {
        let cracked_without = r#"{"hash":"abc","mode_id":0,"outcome":"cracked","timestamp":"2024-05-01T12:30:00Z"}"#;
        let err = serde_json::from_str::<AttemptRecord>(cracked_without).unwrap_err();
        assert!(err.to_string().contains("is cracked but lacks a plaintext"));

        let exhausted_with = r#"{"hash":"abc","mode_id":0,"outcome":"exhausted","clear":"pw","timestamp":"2024-05-01T12:30:00Z"}"#;
        assert!(serde_json::from_str::<AttemptRecord>(exhausted_with).is_err());

        let cracked_empty = r#"{"hash":"abc","mode_id":0,"outcome":"cracked","clear":"","timestamp":"2024-05-01T12:30:00Z"}"#;
        assert!(serde_json::from_str::<AttemptRecord>(cracked_empty).unwrap().is_cracked());
    }

    #[test]
    fn exhausted_records_omit_clear() {
        let ts = "2024-05-01T12:30:00Z".parse().unwrap();
        let s = serde_json::to_string(&AttemptRecord::new("abc", 0, None, ts)).unwrap();
        assert!(s.contains(r#""outcome":"exhausted""#));
        assert!(!s.contains("clear"));
    }
}
