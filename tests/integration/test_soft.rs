//! Integration tests for soft releases (manifest and files only)

use crate::helpers::{TestRepo, run_tagy, run_tagy_ok, stderr, stdout};
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_soft_flag_only_updates_manifest() -> Result<()> {
  let repo = TestRepo::with_package_json("{\n  \"name\": \"demo\",\n  \"version\": \"1.4.2\"\n}\n")?;
  repo.tag("9.0.0")?;

  let output = run_tagy_ok(&repo.path, &["--patch", "--soft"])?;

  assert!(stdout(&output).contains("Version 1.4.3 --> updated!"));
  assert_eq!(repo.package_version()?, "1.4.3");
  assert_eq!(repo.local_tags()?, vec!["9.0.0"]);
  assert_eq!(repo.last_commit_message()?, "Initial commit");

  Ok(())
}

#[test]
fn test_soft_from_manifest_outside_git() -> Result<()> {
  let dir = TempDir::new()?;
  std::fs::write(
    dir.path().join("package.json"),
    r#"{
  "version": "0.9.0",
  "tagy": {
    "soft": true,
    "replace": [{ "files": "VERSION", "from": ".*", "to": "__VERSION__", "flags": false }]
  }
}
"#,
  )?;
  std::fs::write(dir.path().join("VERSION"), "0.9.0")?;

  run_tagy_ok(dir.path(), &["--minor"])?;

  let manifest: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(dir.path().join("package.json"))?)?;
  assert_eq!(manifest["version"], "0.10.0");
  assert_eq!(std::fs::read_to_string(dir.path().join("VERSION"))?, "0.10.0");

  Ok(())
}

#[test]
fn test_deprecated_method_key_still_works() -> Result<()> {
  let dir = TempDir::new()?;
  std::fs::write(
    dir.path().join("package.json"),
    r#"{ "version": "2.0.0", "tagy": { "method": "soft" } }"#,
  )?;

  let output = run_tagy_ok(dir.path(), &["--patch"])?;

  assert!(stderr(&output).contains("deprecated"));
  let manifest = std::fs::read_to_string(dir.path().join("package.json"))?;
  assert!(manifest.contains("\"2.0.1\""));

  Ok(())
}

#[test]
fn test_soft_info_reads_manifest_version() -> Result<()> {
  let dir = TempDir::new()?;
  std::fs::write(dir.path().join("package.json"), r#"{ "version": "3.1.4" }"#)?;

  let output = run_tagy_ok(dir.path(), &["--info", "--soft"])?;

  let out = stdout(&output);
  assert!(out.contains("Current version is: 3.1.4"));
  assert!(!out.contains("tag"));
  Ok(())
}

#[test]
fn test_reverse_is_rejected_in_soft_mode() -> Result<()> {
  let repo = TestRepo::with_package_json(r#"{ "version": "1.0.0", "tagy": { "soft": true } }"#)?;
  repo.tag("1.0.0")?;

  let output = run_tagy(&repo.path, &["--reverse"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("unsupported in soft mode"));
  assert_eq!(repo.local_tags()?, vec!["1.0.0"]);

  Ok(())
}

#[test]
fn test_soft_without_manifest_fails() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_tagy(dir.path(), &["--patch", "--soft"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No project manifest found"));
  Ok(())
}
