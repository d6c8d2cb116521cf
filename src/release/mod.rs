//! Release orchestration
//!
//! # Workflows
//!
//! Exactly one runs per invocation:
//!
//! - **info**: report the latest release tag
//! - **reverse**: delete the latest release tag locally and on `origin`
//! - **patch / minor / major / custom**: bump the version, rewrite files,
//!   commit, tag and push (or, in soft mode, only rewrite the manifest)
//!
//! # Components
//!
//! - **version**: latest-tag resolution and semver bumps
//! - **replace**: placeholder-driven find/replace across project files
//! - **hook**: optional project executable run during a release
//! - **github**: hosted release creation via `gh`
//! - **orchestrator**: the state machine tying them together

pub mod github;
pub mod hook;
pub mod orchestrator;
pub mod replace;
pub mod version;

pub use orchestrator::Orchestrator;

use crate::core::error::ExitCode;
use semver::Version;

/// How a run ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// Latest release tag, `None` when nothing was released yet
  ///
  /// Soft runs report the manifest version instead of a tag.
  Info {
    tag: Option<String>,
    version: Version,
    soft: bool,
  },

  /// Reverse requested but there is no tag
  NothingToReverse,

  Reversed { tag: String },

  /// Release done; `soft` releases only rewrote files
  Released { tag: String, version: Version, soft: bool },

  /// A confirmation was declined or left unanswered
  Aborted { reason: String },
}

impl Outcome {
  pub fn exit_code(&self) -> ExitCode {
    match self {
      Outcome::Aborted { .. } => ExitCode::User,
      _ => ExitCode::Success,
    }
  }
}
