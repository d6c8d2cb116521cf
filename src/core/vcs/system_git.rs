//! System git backend
//!
//! Every operation is one `git` subprocess with an isolated environment.
//! Non-zero exits are turned into [`GitError`]s.

use crate::core::error::{GitError, TagyError, TagyResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment passed through to git: search path, home, identity, config
/// location, SSH/credential helpers and proxies
const INHERITED_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "USERPROFILE",
  "XDG_CONFIG_HOME",
  "GIT_CONFIG_GLOBAL",
  "GIT_CONFIG_SYSTEM",
  "GIT_CONFIG_NOSYSTEM",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_AUTHOR_DATE",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
  "GIT_COMMITTER_DATE",
  "EMAIL",
  "GNUPGHOME",
  "SSH_AUTH_SOCK",
  "GIT_SSH",
  "GIT_SSH_COMMAND",
  "GIT_ASKPASS",
  "SSH_ASKPASS",
  "HTTP_PROXY",
  "HTTPS_PROXY",
  "ALL_PROXY",
  "NO_PROXY",
  "http_proxy",
  "https_proxy",
  "all_proxy",
  "no_proxy",
];

/// Git backend using the system `git` binary
pub struct SystemGit {
  /// Directory commands run in
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the repository containing `path`
  ///
  /// This performs ONE subprocess call to locate the working tree.
  pub fn open(path: &Path) -> TagyResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(TagyError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(TagyError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get current branch name
  pub fn branch_name(&self) -> TagyResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok(None); // Unborn HEAD
    }

    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() || name == "HEAD" {
      return Ok(None); // Detached HEAD
    }

    Ok(Some(name))
  }

  /// Run git and fail on non-zero exit, returning stdout
  pub(crate) fn run(&self, args: &[&str]) -> TagyResult<String> {
    let output = self.output(args)?;

    if !output.status.success() {
      return Err(TagyError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Run git and hand back the raw output, whatever the exit status
  pub(crate) fn output(&self, args: &[&str]) -> TagyResult<Output> {
    tracing::debug!(args = ?args, "git");
    self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists the variables in `INHERITED_ENV`, so commits and pushes
  ///   happen as the user
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    for &var in INHERITED_ENV {
      if let Ok(value) = std::env::var(var) {
        cmd.env(var, value);
      }
    }
    // Never block on a credential prompt
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}
