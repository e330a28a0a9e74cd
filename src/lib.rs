/// chore-kit - small personal command-line tools
///
/// Three independent tools share one package: a video fetch-and-merge
/// downloader, a manuscript chapter checker and two batch renamers.

pub mod chapters;
pub mod config;
pub mod error;
pub mod filename;
pub mod rename;
pub mod ui;
pub mod video;

// Re-export main types for easy access
pub use crate::chapters::{scan, ChapterChecker, ChapterRecord, FileOutcome, ScanReport};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Result, ToolError};
pub use crate::rename::{run_batch, CleanupOutcome, CleanupRenamer, RandomRenamer, RenamePlanEntry};
pub use crate::ui::{AutoConfirm, Confirm, Decision, Palette, TerminalConfirm};
pub use crate::video::{FetchOutcome, StreamDescriptor, StreamOutcome, StreamPair, VideoFetcher};
