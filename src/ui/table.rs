//! Boxed console tables used for chapter reports and rename plans

use super::{Palette, Tone};
use console::measure_text_width;

/// A single table cell with an optional tone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Option<Tone>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone: Some(tone),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::plain(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::plain(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Render the table; every row is separated by a rule line
    pub fn render(&self, palette: &Palette) -> String {
        let columns = self
            .headers
            .len()
            .max(self.rows.iter().map(Vec::len).max().unwrap_or(0));
        let empty = Cell::plain("");

        let widths: Vec<usize> = (0..columns)
            .map(|col| {
                let header = self.headers.get(col).map_or(0, |h| measure_text_width(h));
                let body = self
                    .rows
                    .iter()
                    .map(|row| row.get(col).map_or(0, |c| measure_text_width(&c.text)))
                    .max()
                    .unwrap_or(0);
                header.max(body)
            })
            .collect();

        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&palette.paint(Tone::Accent, title).to_string());
            out.push('\n');
        }

        out.push_str(&rule('┌', '┬', '┐', &widths));
        let header_cells: Vec<Cell> = (0..columns)
            .map(|col| Cell::plain(self.headers.get(col).cloned().unwrap_or_default()))
            .collect();
        out.push_str(&line(&header_cells, &widths, palette));

        for row in &self.rows {
            out.push_str(&rule('├', '┼', '┤', &widths));
            let cells: Vec<Cell> = (0..columns)
                .map(|col| row.get(col).unwrap_or(&empty).clone())
                .collect();
            out.push_str(&line(&cells, &widths, palette));
        }
        out.push_str(&rule('└', '┴', '┘', &widths));
        out
    }
}

fn rule(left: char, middle: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&middle.to_string()))
}

fn line(cells: &[Cell], widths: &[usize], palette: &Palette) -> String {
    let mut out = String::from("│");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = " ".repeat(width.saturating_sub(measure_text_width(&cell.text)));
        let text = match cell.tone {
            Some(tone) => palette.paint(tone, &cell.text).to_string(),
            None => cell.text.clone(),
        };
        out.push_str(&format!(" {text}{padding} │"));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_wide_characters() {
        console::set_colors_enabled(false);
        let mut table = Table::new(["Old", "New"]);
        table.add_row(vec![Cell::plain("你好.mp4"), Cell::plain("a.mp4")]);
        table.add_row(vec![Cell::plain("b"), Cell::plain("c")]);

        let rendered = table.render(&Palette::default());
        let widths: Vec<usize> = rendered.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{rendered}");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_short_rows_are_padded() {
        console::set_colors_enabled(false);
        let mut table = Table::new(["A", "B", "C"]).with_title("t");
        table.add_row(vec![Cell::plain("x")]);
        let rendered = table.render(&Palette::default());
        assert!(rendered.starts_with("t\n"));
        assert_eq!(rendered.lines().nth(4).map(|l| l.matches('│').count()), Some(4));
    }
}
