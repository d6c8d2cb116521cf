//! Integration tests for flag validation

use crate::helpers::{TestRepo, run_tagy, run_tagy_ok, stderr, stdout};
use anyhow::Result;

#[test]
fn test_missing_increment_flag() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_tagy(&repo.path, &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Please specify the increment type"));
  Ok(())
}

#[test]
fn test_too_many_increment_flags() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_tagy(&repo.path, &["--patch", "--major"])?;

  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("Too many arguments"));
  assert!(err.contains("--patch") && err.contains("--major"));
  assert!(repo.local_tags()?.is_empty());
  assert_eq!(repo.package_version()?, "0.0.0");
  Ok(())
}

#[test]
fn test_flag_errors_win_over_broken_manifest() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("package.json"), "{ broken")?;

  let output = run_tagy(dir.path(), &["--info", "--reverse"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Too many arguments"));
  Ok(())
}

#[test]
fn test_broken_manifest_is_reported() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("package.json"), "{ broken")?;

  let output = run_tagy(dir.path(), &["--info", "--soft"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Failed to read manifest"));
  Ok(())
}

#[test]
fn test_version_flag() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_tagy_ok(&repo.path, &["--version"])?;

  assert!(stdout(&output).starts_with("tagy "));
  Ok(())
}
