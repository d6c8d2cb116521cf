//! Release command implementation
//!
//! Wires the production collaborators (system git, the project manifest,
//! the terminal, `gh`, the project hook) into one orchestrator run.

use crate::adapters;
use crate::core::config::{CliFlags, ReleaseConfig};
use crate::core::error::TagyResult;
use crate::core::vcs::SystemGit;
use crate::release::github::GhCli;
use crate::release::hook::ExecutableHook;
use crate::release::{Orchestrator, Outcome};
use crate::ui::TerminalPrompter;
use std::env;

/// Run one release workflow in the current directory
///
/// `raw_args` are the process arguments, forwarded to the project hook.
pub fn run_release(flags: &CliFlags, raw_args: &[String]) -> TagyResult<Outcome> {
  // Flag errors win over manifest errors
  flags.increment()?;

  let cwd = env::current_dir()?;

  let mut manifest = adapters::detect_manifest(&cwd)?;
  let settings = match manifest.as_ref() {
    Some(m) => {
      tracing::debug!(path = %m.path().display(), "using manifest");
      m.settings()?
    }
    None => None,
  };

  let config = ReleaseConfig::resolve(flags, settings.as_ref())?;
  tracing::debug!(?config, "resolved release config");

  // Soft releases never touch git, so they work outside a repository
  let git = if config.soft {
    None
  } else {
    let git = SystemGit::open(&cwd)?;
    tracing::debug!(work_tree = %git.work_tree().display(), "opened repository");
    Some(git)
  };

  let hook = ExecutableHook::discover(&cwd, &config.hook);
  let prompter = TerminalPrompter::new();
  let host = GhCli::new(&cwd);

  let mut orchestrator = Orchestrator::new(&config, &cwd, &prompter, &host).with_args(raw_args);
  if let Some(git) = git.as_ref() {
    orchestrator = orchestrator.with_vcs(git);
  }
  if let Some(manifest) = manifest.as_deref_mut() {
    orchestrator = orchestrator.with_manifest(manifest);
  }
  if let Some(hook) = hook.as_ref() {
    orchestrator = orchestrator.with_hook(hook);
  }

  let result = orchestrator.run();
  tracing::debug!(states = ?orchestrator.transitions(), "release run finished");
  result
}
