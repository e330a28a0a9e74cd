/// File and directory level chapter checking
use super::scanner::{scan, ScanReport};
use crate::config::ChapterConfig;
use crate::ui::{Cell, Confirm, Decision, Palette, Table, Tone};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// What happened to one manuscript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Renumbered headings were written back
    Rewritten,
    /// Nothing was written (no headings, already canonical, or declined)
    Unchanged,
    /// The user asked to stop the session
    Quit,
}

/// Checks manuscripts and optionally rewrites them in place
pub struct ChapterChecker {
    config: ChapterConfig,
    palette: Palette,
    delimiter: String,
}

impl ChapterChecker {
    pub fn new(config: ChapterConfig, palette: Palette, delimiter: impl Into<String>) -> Self {
        Self {
            config,
            palette,
            delimiter: delimiter.into(),
        }
    }

    /// Read and scan one manuscript without touching it
    pub fn scan_file(&self, path: &Path) -> Result<(String, ScanReport)> {
        let original = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manuscript {}", path.display()))?;
        let report = scan(&original);
        debug!("Scanned {}: {} chapters", path.display(), report.records.len());
        Ok((original, report))
    }

    /// Build the per-chapter report table
    pub fn report_table(&self, path: &Path, report: &ScanReport) -> Table {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut table = Table::new(["Mark", "New Title", "Counts", "Lines"]).with_title(title);

        for record in &report.records {
            let counts_tone = if record.chars < self.config.counts_warning {
                Tone::Warning
            } else {
                Tone::Success
            };
            let lines_tone = if record.lines < self.config.lines_warning {
                Tone::Warning
            } else {
                Tone::Success
            };
            table.add_row(vec![
                Cell::plain(record.marker.trim_end()),
                Cell::plain(record.title.as_str()),
                Cell::toned(record.chars.to_string(), counts_tone),
                Cell::toned(record.lines.to_string(), lines_tone),
            ]);
        }
        table
    }

    /// Scan, report and (after confirmation) rewrite one manuscript
    pub fn check_file(&self, path: &Path, confirm: &mut dyn Confirm) -> Result<FileOutcome> {
        let (original, report) = self.scan_file(path)?;

        if report.records.is_empty() {
            self.palette.say(
                Tone::Warning,
                format!("{}: no chapter headings found", path.display()),
            );
            return Ok(FileOutcome::Unchanged);
        }

        println!("{}", self.report_table(path, &report).render(&self.palette));

        if !report.changes(&original) {
            self.palette.say(Tone::Success, "Chapter numbering is already canonical");
            return Ok(FileOutcome::Unchanged);
        }

        match confirm.decide("Rewrite file?")? {
            Decision::Apply => {
                std::fs::write(path, &report.content)
                    .with_context(|| format!("Failed to rewrite {}", path.display()))?;
                info!("✏️ Rewrote {} ({} chapters)", path.display(), report.records.len());
                self.palette.say(Tone::Success, format!("{} updated", path.display()));
                Ok(FileOutcome::Rewritten)
            }
            Decision::Skip => Ok(FileOutcome::Unchanged),
            Decision::Quit => Ok(FileOutcome::Quit),
        }
    }

    /// Check every file directly inside `dir`
    ///
    /// The first failing file aborts the batch with its error.
    pub fn check_dir(&self, dir: &Path, confirm: &mut dyn Confirm) -> Result<Vec<(PathBuf, FileOutcome)>> {
        let mut outcomes = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let outcome = self.check_file(&path, confirm)?;
            println!("\n{}\n", self.delimiter);
            outcomes.push((path, outcome));

            if outcome == FileOutcome::Quit {
                break;
            }
        }

        Ok(outcomes)
    }
}
