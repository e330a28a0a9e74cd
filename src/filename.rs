//! Filename helpers shared by the downloader and the renamers

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Characters that may not appear in an output filename
const ILLEGAL_CHARS: &[char] = &['/', '\\', '|', '<', '>', '\'', '"', '?', ':', '*', '\0'];

static DISAMBIGUATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \(\d+\)$").expect("static disambiguator pattern"));

/// Replace characters that are illegal in filenames with spaces
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { ' ' } else { c })
        .collect();
    replaced.trim().to_string()
}

/// File stem as a `String` (`""` when the path has none)
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension including the leading dot (`""` when the path has none)
pub fn suffix_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Remove a trailing ` (N)` collision suffix
pub fn strip_disambiguator(stem: &str) -> &str {
    match DISAMBIGUATOR_RE.find(stem) {
        Some(found) => &stem[..found.start()],
        None => stem,
    }
}
