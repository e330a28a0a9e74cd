/// Manuscript chapter checking
///
/// Detects chapter headings in a novel manuscript, renumbers them in file
/// order and reports how long each chapter is.

pub mod checker;
pub mod scanner;

// Re-export main types
pub use checker::{ChapterChecker, FileOutcome};
pub use scanner::{scan, ScanReport};

use serde::{Deserialize, Serialize};

/// One chapter found during a scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChapterRecord {
    /// Position in the file, starting at 1
    pub ordinal: usize,
    /// Heading marker as it appeared in the file
    pub marker: String,
    /// Heading line after renumbering
    pub title: String,
    /// Characters in the chapter body (trimmed lines)
    pub chars: usize,
    /// Non-empty body lines
    pub lines: usize,
}
