//! Export helpers for writing this run's results to CSV and plain text files.
//!
//! - `save_cracked_csv` writes (hash, mode, mode name, plaintext) rows.
//! - `save_hash_pass_txt` writes potfile-style `hash:plaintext` lines.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::Writer;

use crate::engine::RunReport;

pub fn save_cracked_csv<P: AsRef<Path>>(report: &RunReport, path: P) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["Hash", "Mode", "Name", "Plaintext"])?;
    for (mode, hash, clear) in report.newly_cracked() {
        let id = mode.id.to_string();
        wtr.write_record([hash, id.as_str(), mode.name.as_str(), clear])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_hash_pass_txt<P: AsRef<Path>>(report: &RunReport, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    for (_, hash, clear) in report.newly_cracked() {
        writeln!(f, "{}:{}", hash, clear)?;
    }
    Ok(())
}
