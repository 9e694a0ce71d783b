//! Scratch files for a single run.
//!
//! A [`ScratchSpace`] owns a private temp directory; every subset file and
//! per-invocation potfile is a [`ScratchFile`] inside it. Dropping a handle
//! deletes its file, and dropping the space removes the directory along with
//! anything hashcat left next to those files.
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::{Builder, TempDir, TempPath};

use crate::attempt::ModeId;

pub const SUBSET_PREFIX: &str = "hc_subset_";
pub const POT_PREFIX: &str = "hc_pot_";
pub const PROBE_PREFIX: &str = "hc_probe_";

#[derive(Debug)]
pub struct ScratchSpace {
    dir: TempDir,
}

/// A uniquely named file that is deleted when dropped.
#[derive(Debug)]
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScratchSpace {
    /// Create a fresh scratch directory under `base`, or the system temp dir.
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("autocrack_");
        let dir = match base {
            Some(b) => builder
                .tempdir_in(b)
                .with_context(|| format!("create scratch dir in {}", b.display()))?,
            None => builder.tempdir().context("create scratch dir")?,
        };
        log::debug!("scratch dir {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn create(&self, prefix: &str, mode: Option<ModeId>, lines: &[String]) -> Result<ScratchFile> {
        let prefix = match mode {
            Some(m) => format!("{prefix}{m}_"),
            None => prefix.to_string(),
        };
        let mut file = Builder::new()
            .prefix(&prefix)
            .tempfile_in(self.dir.path())
            .with_context(|| format!("create scratch file in {}", self.dir.path().display()))?;
        for line in lines {
            writeln!(file, "{}", line)
                .with_context(|| format!("write {}", file.path().display()))?;
        }
        file.flush()
            .with_context(|| format!("flush {}", file.path().display()))?;
        let path = file.into_temp_path();
        log::info!("created scratch file {}", path.display());
        Ok(ScratchFile { path })
    }

    /// Subset input for one mode: one hash per line.
    pub fn subset_file(&self, mode: ModeId, hashes: &[String]) -> Result<ScratchFile> {
        self.create(SUBSET_PREFIX, Some(mode), hashes)
    }

    /// Empty potfile used as the isolated result store of one invocation.
    pub fn result_store(&self, mode: ModeId) -> Result<ScratchFile> {
        self.create(POT_PREFIX, Some(mode), &[])
    }

    /// Input for a detection probe.
    pub fn probe_file(&self, hashes: &[String]) -> Result<ScratchFile> {
        self.create(PROBE_PREFIX, None, hashes)
    }

    /// Remove the directory now and surface any error, instead of on drop.
    pub fn close(self) -> Result<()> {
        let path: PathBuf = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("remove scratch dir {}", path.display()))
    }
}
