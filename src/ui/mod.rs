//! Console output helpers: palette, tables, progress bars and prompts
//!
//! Colours are carried by a [`Palette`] value taken from the configuration
//! and handed to each tool when it is built.

pub mod progress;
pub mod prompt;
pub mod table;

pub use progress::{download_bar, merge_spinner};
pub use prompt::{prompt_targets, AutoConfirm, Confirm, Decision, TerminalConfirm};
pub use table::{Cell, Table};

use console::{Color, Style, StyledObject};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Terminal colour names accepted in the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl ColorName {
    /// Name as understood by indicatif templates
    pub fn as_str(self) -> &'static str {
        match self {
            ColorName::Black => "black",
            ColorName::Red => "red",
            ColorName::Green => "green",
            ColorName::Yellow => "yellow",
            ColorName::Blue => "blue",
            ColorName::Magenta => "magenta",
            ColorName::Cyan => "cyan",
            ColorName::White => "white",
        }
    }
}

impl From<ColorName> for Color {
    fn from(name: ColorName) -> Self {
        match name {
            ColorName::Black => Color::Black,
            ColorName::Red => Color::Red,
            ColorName::Green => Color::Green,
            ColorName::Yellow => Color::Yellow,
            ColorName::Blue => Color::Blue,
            ColorName::Magenta => Color::Magenta,
            ColorName::Cyan => Color::Cyan,
            ColorName::White => Color::White,
        }
    }
}

/// Semantic role of a piece of console output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Accent,
    Success,
    Warning,
    Error,
    Plain,
}

/// Colour assignment for each [`Tone`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub accent: ColorName,
    pub success: ColorName,
    pub warning: ColorName,
    pub error: ColorName,
    pub plain: ColorName,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: ColorName::Cyan,
            success: ColorName::Green,
            warning: ColorName::Yellow,
            error: ColorName::Red,
            plain: ColorName::White,
        }
    }
}

impl Palette {
    pub fn color(&self, tone: Tone) -> ColorName {
        match tone {
            Tone::Accent => self.accent,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
            Tone::Error => self.error,
            Tone::Plain => self.plain,
        }
    }

    pub fn style(&self, tone: Tone) -> Style {
        Style::new().fg(self.color(tone).into())
    }

    pub fn paint<D: Display>(&self, tone: Tone, value: D) -> StyledObject<D> {
        self.style(tone).apply_to(value)
    }

    /// Print one line in the given tone to stdout
    pub fn say<D: Display>(&self, tone: Tone, value: D) {
        println!("{}", self.paint(tone, value));
    }
}
