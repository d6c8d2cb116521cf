//! Interactive confirmation checkpoints
//!
//! Rendered with `dialoguer`. When stdin is not a terminal nothing is
//! rendered: confirmations answer "no" and text prompts answer nothing, so
//! unattended runs stop at the first checkpoint instead of hanging.

use crate::core::error::TagyResult;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::io::IsTerminal;

/// Source of answers for the release checkpoints
pub trait Prompter {
  /// Yes/no question, `false` means decline
  fn confirm(&self, question: &str) -> TagyResult<bool>;

  /// Free-text question, `None` when nothing was entered
  fn prompt_text(&self, question: &str) -> TagyResult<Option<String>>;
}

/// Prompter backed by the user's terminal
pub struct TerminalPrompter {
  interactive: bool,
  theme: ColorfulTheme,
}

impl TerminalPrompter {
  pub fn new() -> Self {
    Self {
      interactive: std::io::stdin().is_terminal(),
      theme: ColorfulTheme::default(),
    }
  }
}

impl Default for TerminalPrompter {
  fn default() -> Self {
    Self::new()
  }
}

impl Prompter for TerminalPrompter {
  fn confirm(&self, question: &str) -> TagyResult<bool> {
    if !self.interactive {
      eprintln!("⚠️  {} (stdin is not a terminal, answering no)", question);
      tracing::warn!(question, "non-interactive confirm declined");
      return Ok(false);
    }

    let answer = Confirm::with_theme(&self.theme)
      .with_prompt(question)
      .default(false)
      .interact()?;
    Ok(answer)
  }

  fn prompt_text(&self, question: &str) -> TagyResult<Option<String>> {
    if !self.interactive {
      eprintln!("⚠️  {} (stdin is not a terminal, no answer)", question);
      tracing::warn!(question, "non-interactive prompt left empty");
      return Ok(None);
    }

    let answer: String = Input::with_theme(&self.theme)
      .with_prompt(question)
      .allow_empty(true)
      .interact_text()?;

    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
  }
}
