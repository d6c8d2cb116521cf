//! GitHub release creation via gh CLI

use crate::core::error::{TagyError, TagyResult};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Hosting platform that can publish a release for a pushed tag
pub trait ReleaseHost {
  /// Whether the platform tooling is installed
  fn is_available(&self) -> bool;

  fn create_release(&self, tag: &str, title: &str, notes: &str) -> TagyResult<()>;
}

/// Release notes body for `tag` released on `date`
pub fn release_notes(tag: &str, date: NaiveDate) -> String {
  format!("Release {} ({})", tag, date.format("%Y-%m-%d"))
}

/// The GitHub CLI (`gh`)
pub struct GhCli {
  cwd: PathBuf,
}

impl GhCli {
  pub fn new(cwd: &Path) -> Self {
    Self { cwd: cwd.to_path_buf() }
  }
}

impl ReleaseHost for GhCli {
  fn is_available(&self) -> bool {
    Command::new("gh")
      .arg("--version")
      .output()
      .map(|o| o.status.success())
      .unwrap_or(false)
  }

  fn create_release(&self, tag: &str, title: &str, notes: &str) -> TagyResult<()> {
    tracing::debug!(tag, "gh release create");

    let output = Command::new("gh")
      .current_dir(&self.cwd)
      .args(["release", "create", tag, "--title", title, "--notes", notes])
      .output()
      .map_err(|e| TagyError::message(format!("Failed to execute gh: {}", e)))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(TagyError::with_help(
        format!("GitHub release for {} failed: {}", tag, stderr.trim_end()),
        format!(
          "The tag {} is already pushed. Create the release by hand with `gh release create {}`, \
           or check whether one already exists.",
          tag, tag
        ),
      ));
    }

    Ok(())
  }
}
