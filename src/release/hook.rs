//! Project hook: an executable the project ships to take part in releases
//!
//! The hook runs after the manifest is bumped and before the replacement
//! pass, as `<hook> <next-version> <current-tag> <tagy args...>`, with
//! `TAGY_NEXT_VERSION` and `TAGY_CURRENT_TAG` in its environment.

use crate::core::error::HookError;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const NEXT_VERSION_ENV: &str = "TAGY_NEXT_VERSION";
pub const CURRENT_TAG_ENV: &str = "TAGY_CURRENT_TAG";

/// Something the release runs between the manifest bump and tagging
pub trait ProjectHook {
  fn path(&self) -> &Path;

  fn run(&self, next_version: &str, current_tag: &str, args: &[String]) -> Result<(), HookError>;
}

/// Hook implemented as a file in the project
#[derive(Debug, Clone)]
pub struct ExecutableHook {
  path: PathBuf,
  cwd: PathBuf,
}

impl ExecutableHook {
  /// Locate the hook relative to `cwd`, `None` when the file does not exist
  pub fn discover(cwd: &Path, hook: &Path) -> Option<Self> {
    let path = cwd.join(hook);
    if !path.is_file() {
      tracing::debug!(path = %path.display(), "no project hook");
      return None;
    }

    Some(Self {
      path,
      cwd: cwd.to_path_buf(),
    })
  }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;
  std::fs::metadata(path)
    .map(|m| m.permissions().mode() & 0o111 != 0)
    .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
  true
}

impl ProjectHook for ExecutableHook {
  fn path(&self) -> &Path {
    &self.path
  }

  fn run(&self, next_version: &str, current_tag: &str, args: &[String]) -> Result<(), HookError> {
    if !is_executable(&self.path) {
      return Err(HookError::NotExecutable {
        path: self.path.clone(),
      });
    }

    tracing::debug!(path = %self.path.display(), next_version, current_tag, "running project hook");

    let status = Command::new(&self.path)
      .current_dir(&self.cwd)
      .arg(next_version)
      .arg(current_tag)
      .args(args)
      .env(NEXT_VERSION_ENV, next_version)
      .env(CURRENT_TAG_ENV, current_tag)
      .status()
      .map_err(|e| HookError::Spawn {
        path: self.path.clone(),
        reason: e.to_string(),
      })?;

    if !status.success() {
      return Err(HookError::Failed {
        path: self.path.clone(),
        status: status.to_string(),
      });
    }

    Ok(())
  }
}
