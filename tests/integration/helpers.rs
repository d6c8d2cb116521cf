//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A git repository on `main` with one commit, pushed to a bare `origin`
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
  pub origin: PathBuf,
}

impl TestRepo {
  /// Create a repository whose package.json has the given content
  pub fn with_package_json(package_json: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("work");
    let origin = root.path().join("origin.git");
    std::fs::create_dir_all(&path)?;

    git(
      root.path(),
      &["init", "--bare", "--initial-branch=main", origin.to_str().context("non-UTF-8 temp path")?],
    )?;

    // Initialize git repo with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "tag.gpgsign", "false"])?;
    git(&path, &["remote", "add", "origin", origin.to_str().context("non-UTF-8 temp path")?])?;

    std::fs::write(path.join("package.json"), package_json)?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;
    git(&path, &["push", "origin", "main"])?;

    Ok(Self {
      _root: root,
      path,
      origin,
    })
  }

  /// Create a repository with a plain `demo` package.json at 0.0.0
  pub fn new() -> Result<Self> {
    Self::with_package_json("{\n  \"name\": \"demo\",\n  \"version\": \"0.0.0\"\n}\n")
  }

  /// Write a file relative to the repository root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<()> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    Ok(())
  }

  /// Create a lightweight tag at HEAD
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name])?;
    Ok(())
  }

  /// Version of the `version` field in package.json
  pub fn package_version(&self) -> Result<String> {
    let json: serde_json::Value = serde_json::from_str(&self.read_file("package.json")?)?;
    json["version"]
      .as_str()
      .map(String::from)
      .context("package.json has no version")
  }

  pub fn local_tags(&self) -> Result<Vec<String>> {
    list_tags(&self.path)
  }

  pub fn remote_tags(&self) -> Result<Vec<String>> {
    list_tags(&self.origin)
  }

  /// Subject of the latest commit
  pub fn last_commit_message(&self) -> Result<String> {
    let output = git(&self.path, &["log", "-1", "--format=%s"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

fn list_tags(repo: &Path) -> Result<Vec<String>> {
  let output = git(repo, &["tag", "--list"])?;
  Ok(
    String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(String::from)
      .collect(),
  )
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run tagy, whatever its exit status
///
/// stdin is null, so every confirmation answers "no".
pub fn run_tagy(cwd: &Path, args: &[&str]) -> Result<Output> {
  run_tagy_with_env(cwd, args, &[])
}

/// Run tagy with extra environment variables
pub fn run_tagy_with_env(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let tagy_bin = env!("CARGO_BIN_EXE_tagy");

  Command::new(tagy_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("TAGY_LOG")
    .envs(envs.iter().copied())
    .output()
    .context("Failed to run tagy")
}

/// Run tagy and fail unless it exits successfully
pub fn run_tagy_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_tagy(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "tagy command failed: tagy {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
