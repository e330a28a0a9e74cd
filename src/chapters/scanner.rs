/// Chapter heading detection and renumbering
use super::ChapterRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Prefixes that make a line worth testing against [`HEADING_RE`]
const MARKER_PREFIXES: [&str; 2] = ["第", "##"];

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:第[\d零一二三四五六七八九十百千]+章|## .*?章 ?)").expect("static heading pattern")
});

/// Result of scanning one manuscript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Chapters in file order
    pub records: Vec<ChapterRecord>,
    /// Manuscript text with renumbered headings
    pub content: String,
}

impl ScanReport {
    /// Whether rewriting would change the manuscript
    pub fn changes(&self, original: &str) -> bool {
        self.content != original
    }
}

/// Canonical heading marker for chapter `ordinal`
pub fn canonical_marker(ordinal: usize) -> String {
    format!("第{ordinal}章")
}

/// Heading marker of `line`, if it is a chapter heading
pub fn heading_marker(line: &str) -> Option<&str> {
    if !MARKER_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return None;
    }
    HEADING_RE.find(line).map(|m| m.as_str())
}

fn renumbered_heading(ordinal: usize, rest: &str) -> String {
    let rest = rest.trim_start();
    if rest.is_empty() {
        canonical_marker(ordinal)
    } else {
        format!("{} {}", canonical_marker(ordinal), rest)
    }
}

/// Scan manuscript text line by line
///
/// Lines before the first heading belong to no chapter. Line endings are kept
/// as they are, so a manuscript without headings comes back unchanged.
pub fn scan(content: &str) -> ScanReport {
    let mut records = Vec::new();
    let mut output = String::with_capacity(content.len());
    let mut open: Option<ChapterRecord> = None;
    let mut ordinal = 0;

    for line in content.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        let ending = &line[body.len()..];

        if let Some(marker) = heading_marker(body) {
            if let Some(done) = open.take() {
                records.push(done);
            }
            ordinal += 1;

            let title = renumbered_heading(ordinal, &body[marker.len()..]);
            output.push_str(&title);
            output.push_str(ending);

            open = Some(ChapterRecord {
                ordinal,
                marker: marker.to_string(),
                title,
                chars: 0,
                lines: 0,
            });
            continue;
        }

        let text = body.trim();
        if !text.is_empty() {
            if let Some(chapter) = open.as_mut() {
                chapter.chars += text.chars().count();
                chapter.lines += 1;
            }
        }
        output.push_str(line);
    }

    // No headings means no records at all
    if let Some(done) = open {
        records.push(done);
    }

    ScanReport {
        records,
        content: output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_marker_detection() {
        assert_eq!(heading_marker("第一百零三章 回家"), Some("第一百零三章"));
        assert_eq!(heading_marker("第12章"), Some("第12章"));
        assert_eq!(heading_marker("## 第五章 标题"), Some("## 第五章 "));
        assert_eq!(heading_marker("第二天，他出门了"), None);
        assert_eq!(heading_marker("## Notes"), None);
        assert_eq!(heading_marker("  第一章"), None);
    }

    #[test]
    fn test_scan_renumbers_and_counts() {
        let text = "序\n第一章 开始\n他走了。\n\n她来了！\n第三章 继续\n好。\n";
        let report = scan(text);

        assert_eq!(report.records.len(), 2);
        let first = &report.records[0];
        assert_eq!(first.ordinal, 1);
        assert_eq!(first.marker, "第一章");
        assert_eq!(first.title, "第1章 开始");
        assert_eq!(first.chars, 8);
        assert_eq!(first.lines, 2);

        let second = &report.records[1];
        assert_eq!(second.ordinal, 2);
        assert_eq!(second.title, "第2章 继续");
        assert_eq!(second.chars, 2);
        assert_eq!(second.lines, 1);

        assert_eq!(report.content, "序\n第1章 开始\n他走了。\n\n她来了！\n第2章 继续\n好。\n");
    }

    #[test]
    fn test_failed_candidates_are_body_lines() {
        let report = scan("第一章\n第二天早上\n");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].title, "第1章");
        assert_eq!(report.records[0].lines, 1);
        assert_eq!(report.content, "第1章\n第二天早上\n");
    }

    #[test]
    fn test_markdown_heading_loses_hashes() {
        let report = scan("## 第五章 标题\r\n正文\r\n");
        assert_eq!(report.records[0].marker, "## 第五章 ");
        assert_eq!(report.content, "第1章 标题\r\n正文\r\n");
    }

    #[test]
    fn test_no_headings_gives_empty_report() {
        let text = "just some text\nwithout chapters";
        let report = scan(text);
        assert!(report.records.is_empty());
        assert_eq!(report.content, text);
        assert!(!report.changes(text));
    }

    #[test]
    fn test_rescan_is_identical() {
        let text = "第九章  A\nx\n## 终章 B\ny\nzz\n第十章\n";
        let first = scan(text);
        let second = scan(&first.content);

        let summary = |report: &ScanReport| -> Vec<(usize, String, usize, usize)> {
            report
                .records
                .iter()
                .map(|r| (r.ordinal, r.title.clone(), r.chars, r.lines))
                .collect()
        };
        assert_eq!(summary(&first), summary(&second));
        assert_eq!(first.content, second.content);
        assert_eq!(second.records[1].marker, "第2章");
    }
}
