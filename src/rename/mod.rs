//! Batch renaming of directory contents
//!
//! Two strategies share the plan type below: [`RandomRenamer`] gives every
//! entry a random name, [`CleanupRenamer`] strips platform title noise with an
//! ordered list of regex rules.

pub mod cleanup;
pub mod random;

pub use cleanup::{run_batch, CleanupOutcome, CleanupRenamer, CleanupRule};
pub use random::RandomRenamer;

use crate::error::{Result, ToolError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A proposed rename, committed only after confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlanEntry {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenamePlanEntry {
    pub fn new(from: PathBuf, to: PathBuf) -> Self {
        Self { from, to }
    }

    pub fn from_name(&self) -> String {
        file_name_of(&self.from)
    }

    pub fn to_name(&self) -> String {
        file_name_of(&self.to)
    }

    /// Perform the rename, refusing to overwrite an existing path
    pub fn apply(&self) -> Result<()> {
        if self.to.exists() {
            return Err(ToolError::Conflict(self.to.clone()));
        }
        std::fs::rename(&self.from, &self.to)?;
        debug!("Renamed {} -> {}", self.from.display(), self.to.display());
        Ok(())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Immediate children of `dir`, in the order the platform lists them
pub fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        entries.push(entry.into_path());
    }
    Ok(entries)
}
