//! The release state machine
//!
//! ```text
//! Start → ConfigResolved → BranchChecked → VersionResolved → {Info | Reverse | Release} → Done
//! ```
//!
//! plus the terminals `Aborted` (a declined checkpoint) and `Failed` (any
//! error). `BranchChecked` is skipped in soft mode. Every collaborator is a
//! trait object so the whole flow runs against fakes in tests.

use super::Outcome;
use super::github::{self, ReleaseHost};
use super::hook::ProjectHook;
use super::replace::{self, VersionTemplate};
use super::version::{self, Bump, ResolvedTag};
use crate::adapters::Manifest;
use crate::core::config::{IncrementKind, ReleaseConfig};
use crate::core::error::{ConfigError, GitError, TagyResult};
use crate::core::vcs::VersionControl;
use crate::ui::Prompter;
use semver::Version;
use std::path::Path;

/// Branches releases are expected to come from
pub const TRUNK_BRANCHES: [&str; 2] = ["main", "master"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Start,
  ConfigResolved,
  BranchChecked,
  VersionResolved,
  Info,
  Reverse,
  Release,
  Done,
  Aborted,
  Failed,
}

/// One release run
pub struct Orchestrator<'a> {
  config: &'a ReleaseConfig,
  cwd: &'a Path,
  prompter: &'a dyn Prompter,
  host: &'a dyn ReleaseHost,
  vcs: Option<&'a dyn VersionControl>,
  manifest: Option<&'a mut dyn Manifest>,
  hook: Option<&'a dyn ProjectHook>,
  raw_args: &'a [String],
  transitions: Vec<State>,
}

impl<'a> Orchestrator<'a> {
  pub fn new(config: &'a ReleaseConfig, cwd: &'a Path, prompter: &'a dyn Prompter, host: &'a dyn ReleaseHost) -> Self {
    Self {
      config,
      cwd,
      prompter,
      host,
      vcs: None,
      manifest: None,
      hook: None,
      raw_args: &[],
      transitions: vec![State::Start],
    }
  }

  /// Repository to tag; required unless the release is soft
  pub fn with_vcs(mut self, vcs: &'a dyn VersionControl) -> Self {
    self.vcs = Some(vcs);
    self
  }

  pub fn with_manifest(mut self, manifest: &'a mut dyn Manifest) -> Self {
    self.manifest = Some(manifest);
    self
  }

  pub fn with_hook(mut self, hook: &'a dyn ProjectHook) -> Self {
    self.hook = Some(hook);
    self
  }

  /// Command-line arguments forwarded to the hook
  pub fn with_args(mut self, raw_args: &'a [String]) -> Self {
    self.raw_args = raw_args;
    self
  }

  /// States visited so far, `Start` first
  pub fn transitions(&self) -> &[State] {
    &self.transitions
  }

  pub fn run(&mut self) -> TagyResult<Outcome> {
    // The config was resolved before we were built
    self.transition(State::ConfigResolved);

    match self.drive() {
      Ok(outcome) => {
        let terminal = match outcome {
          Outcome::Aborted { .. } => State::Aborted,
          _ => State::Done,
        };
        self.transition(terminal);
        Ok(outcome)
      }
      Err(err) => {
        self.transition(State::Failed);
        Err(err)
      }
    }
  }

  fn transition(&mut self, next: State) {
    tracing::debug!(from = ?self.transitions.last(), to = ?next, "state transition");
    self.transitions.push(next);
  }

  fn git(&self) -> TagyResult<&'a dyn VersionControl> {
    self.vcs.ok_or_else(|| {
      GitError::RepoNotFound {
        path: self.cwd.to_path_buf(),
      }
      .into()
    })
  }

  fn drive(&mut self) -> TagyResult<Outcome> {
    let config = self.config;

    if config.soft {
      if config.increment == IncrementKind::Reverse {
        return Err(ConfigError::ReverseInSoftMode.into());
      }
      if self.manifest.is_none() {
        return Err(
          ConfigError::ManifestNotFound {
            root: self.cwd.to_path_buf(),
          }
          .into(),
        );
      }
    }

    let branch = if config.soft {
      None
    } else {
      let name = self.git()?.current_branch()?.ok_or(GitError::NoBranch)?;
      if !TRUNK_BRANCHES.contains(&name.as_str()) {
        let question = format!("You are on \"{}\", not main or master. Release from this branch anyway?", name);
        if !self.prompter.confirm(&question)? {
          return Ok(Outcome::Aborted {
            reason: format!("not on a trunk branch ({})", name),
          });
        }
      }
      self.transition(State::BranchChecked);
      Some(name)
    };

    let current = self.current_version()?;
    self.transition(State::VersionResolved);
    tracing::debug!(tag = ?current.name, version = %current.version, "current version");

    let next = match config.increment {
      IncrementKind::Info => {
        self.transition(State::Info);
        return Ok(Outcome::Info {
          tag: current.name,
          version: current.version,
          soft: config.soft,
        });
      }
      IncrementKind::Reverse => {
        self.transition(State::Reverse);
        return self.reverse(current);
      }
      IncrementKind::Custom => {
        let question = format!("Current version is {}. Enter the next version (MAJOR.MINOR.PATCH):", current.version);
        match self.prompter.prompt_text(&question)? {
          Some(input) => version::parse_custom(&input)?,
          None => {
            return Ok(Outcome::Aborted {
              reason: "no version entered".to_string(),
            });
          }
        }
      }
      IncrementKind::Patch => version::increment(&current.version, Bump::Patch),
      IncrementKind::Minor => version::increment(&current.version, Bump::Minor),
      IncrementKind::Major => {
        let next = version::increment(&current.version, Bump::Major);
        let question = format!(
          "Are you sure that you want to create a major release? Current version is \"{}\" and the next will be \"{}\"",
          current.version, next
        );
        if !self.prompter.confirm(&question)? {
          return Ok(Outcome::Aborted {
            reason: "major release declined".to_string(),
          });
        }
        next
      }
    };

    self.transition(State::Release);
    self.release(&current, next, branch)
  }

  /// Tag history when tagging, the manifest's version field when soft
  fn current_version(&self) -> TagyResult<ResolvedTag> {
    let config = self.config;

    if config.soft {
      let raw = self.manifest.as_ref().and_then(|m| m.version());
      let version = raw.as_deref().map(version::normalize).unwrap_or_else(|| Version::new(0, 0, 0));
      return Ok(ResolvedTag { name: raw, version });
    }

    let vcs = self.git()?;
    if let Err(e) = vcs.fetch_tags() {
      eprintln!("⚠️  Could not fetch tags, using local tags only");
      tracing::warn!(error = %e, "fetching tags failed");
    }
    let tags = vcs.list_tags(&config.tag_prefix)?;
    Ok(version::resolve(&tags, &config.tag_prefix))
  }

  fn reverse(&mut self, current: ResolvedTag) -> TagyResult<Outcome> {
    let Some(tag) = current.name else {
      return Ok(Outcome::NothingToReverse);
    };

    let question = format!("Are you sure that you want to remove this tag? ({})", tag);
    if !self.prompter.confirm(&question)? {
      return Ok(Outcome::Aborted {
        reason: format!("kept tag {}", tag),
      });
    }

    let vcs = self.git()?;
    vcs.delete_tag(&tag)?;
    vcs.delete_remote_tag(&tag)?;

    Ok(Outcome::Reversed { tag })
  }

  fn release(&mut self, current: &ResolvedTag, next: Version, branch: Option<String>) -> TagyResult<Outcome> {
    let config = self.config;
    let tag = config.tag_name(&next);
    let next_str = next.to_string();
    let current_str = current.version.to_string();

    println!("📦 Releasing {} (current: {})", tag, current_str);

    // A failed manifest write stops the run before git is touched
    match self.manifest.as_deref_mut() {
      Some(manifest) => {
        manifest.write_version(&next_str)?;
        println!("   Updated version in {}", manifest.filename());
      }
      None => println!("   No manifest found, skipping version bump"),
    }

    if let Some(hook) = self.hook {
      println!("   Running hook {}", hook.path().display());
      if let Err(e) = hook.run(&next_str, &current_str, self.raw_args) {
        eprintln!("⚠️  {}", e);
        tracing::warn!(error = %e, "project hook failed, continuing");
      }
    }

    if !config.replacements.is_empty() {
      let template = VersionTemplate::new(&current_str, &next_str);
      match replace::apply(&config.replacements, &template, self.cwd) {
        Ok(report) => {
          tracing::debug!(
            rules = report.rules_applied,
            files = report.changed_files.len(),
            "replacement pass finished"
          );
          if !report.changed_files.is_empty() {
            println!("   Rewrote {} file(s)", report.changed_files.len());
          }
        }
        Err(e) => {
          eprintln!("⚠️  Replacement pass stopped: {}", e);
          tracing::warn!(error = %e, "replacement pass failed, continuing");
        }
      }
    }

    if config.soft {
      return Ok(Outcome::Released {
        tag,
        version: next,
        soft: true,
      });
    }

    let vcs = self.git()?;
    let branch = branch.ok_or(GitError::NoBranch)?;
    let message = format!("Release {}", tag);

    vcs.normalize_line_endings()?;
    if vcs.has_pending_changes()? {
      vcs.commit_all(&message)?;
    }
    vcs.push_branch(&branch)?;
    vcs.create_tag(&tag, &message)?;
    vcs.push_tag(&tag)?;

    self.publish(&tag)?;

    Ok(Outcome::Released {
      tag,
      version: next,
      soft: false,
    })
  }

  /// Hosting-platform release for a pushed tag
  fn publish(&self, tag: &str) -> TagyResult<()> {
    if !self.host.is_available() {
      tracing::debug!("release CLI not installed, skipping hosted release");
      return Ok(());
    }

    let wanted = self.config.auto_release || self.prompter.confirm(&format!("Create a GitHub release for {}?", tag))?;
    if !wanted {
      println!("   Skipping GitHub release");
      return Ok(());
    }

    let notes = github::release_notes(tag, chrono::Local::now().date_naive());
    self.host.create_release(tag, tag, &notes)?;
    println!("   🚀 GitHub release {} created", tag);

    Ok(())
  }
}
