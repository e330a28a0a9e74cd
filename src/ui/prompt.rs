//! Thin interactive front end: confirmations and the target prompt loop
//!
//! The tools never read the terminal themselves; they receive a [`Confirm`]
//! implementation and the binary decides whether that is the terminal or a
//! fixed answer from the command line.

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use std::ops::ControlFlow;

use super::{Palette, Tone};

/// Token that ends a prompt loop
pub const QUIT_TOKEN: &str = "q";

/// Answer to a confirmation question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Go ahead with the proposed change
    Apply,
    /// Leave this item alone
    Skip,
    /// Stop the whole session
    Quit,
}

/// Source of confirmation answers
pub trait Confirm {
    fn decide(&mut self, question: &str) -> Result<Decision>;
}

/// Always answers with the same decision (`--yes` / `--dry-run`)
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub Decision);

impl Confirm for AutoConfirm {
    fn decide(&mut self, question: &str) -> Result<Decision> {
        tracing::debug!("Auto-answering {:?} to: {}", self.0, question);
        Ok(self.0)
    }
}

/// Asks on the terminal; Enter confirms, `n` skips, `q` quits
pub struct TerminalConfirm {
    palette: Palette,
    allow_quit: bool,
}

impl TerminalConfirm {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            allow_quit: true,
        }
    }

    /// Disable the quit answer for questions where it makes no sense
    pub fn without_quit(mut self) -> Self {
        self.allow_quit = false;
        self
    }
}

impl Confirm for TerminalConfirm {
    fn decide(&mut self, question: &str) -> Result<Decision> {
        let choices = if self.allow_quit { "[Enter/n/q]" } else { "[Enter/n]" };
        let prompt = format!("{} {}", self.palette.paint(Tone::Accent, question), choices);

        loop {
            let answer: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt.as_str())
                .allow_empty(true)
                .interact_text()?;

            match parse_decision(&answer, self.allow_quit) {
                Some(decision) => return Ok(decision),
                None => self.palette.say(Tone::Warning, format!("Please answer with {choices}")),
            }
        }
    }
}

/// Map a typed answer to a decision; `None` means ask again
pub fn parse_decision(answer: &str, allow_quit: bool) -> Option<Decision> {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(Decision::Apply),
        "n" | "no" => Some(Decision::Skip),
        QUIT_TOKEN if allow_quit => Some(Decision::Quit),
        _ => None,
    }
}

/// Classification of one line typed at the target prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Quit,
    Retry,
    Target(String),
}

pub fn classify_input(raw: &str) -> PromptInput {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(QUIT_TOKEN) {
        PromptInput::Quit
    } else if trimmed.is_empty() {
        PromptInput::Retry
    } else {
        PromptInput::Target(trimmed.to_string())
    }
}

/// Ask for targets until the quit token is typed; empty input asks again
pub fn prompt_targets<F>(palette: &Palette, prompt: &str, mut handle: F) -> Result<()>
where
    F: FnMut(&str) -> ControlFlow<()>,
{
    let prompt = palette.paint(Tone::Accent, prompt).to_string();
    loop {
        let raw: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.as_str())
            .allow_empty(true)
            .interact_text()?;

        match classify_input(&raw) {
            PromptInput::Quit => return Ok(()),
            PromptInput::Retry => continue,
            PromptInput::Target(target) => {
                if handle(&target).is_break() {
                    return Ok(());
                }
            }
        }
    }
}
