//! Integration tests for tagging releases

use crate::helpers::{TestRepo, git, run_tagy, run_tagy_ok, run_tagy_with_env, stderr, stdout};
use anyhow::Result;

#[test]
fn test_first_patch_release() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_tagy_ok(&repo.path, &["--patch"])?;

  assert!(stdout(&output).contains("Tag 0.0.1 --> created!"));
  assert_eq!(repo.package_version()?, "0.0.1");
  assert_eq!(repo.local_tags()?, vec!["0.0.1"]);
  assert_eq!(repo.remote_tags()?, vec!["0.0.1"]);
  assert_eq!(repo.last_commit_message()?, "Release 0.0.1");

  // The release commit reached origin too
  let local_head = git(&repo.path, &["rev-parse", "HEAD"])?;
  let remote_head = git(&repo.origin, &["rev-parse", "main"])?;
  assert_eq!(local_head.stdout, remote_head.stdout);

  Ok(())
}

#[test]
fn test_minor_release_with_manifest_prefix() -> Result<()> {
  let repo = TestRepo::with_package_json(
    r#"{
  "name": "demo",
  "version": "1.2.3",
  "tagy": { "tagPrefix": "v" }
}
"#,
  )?;
  repo.tag("v1.2.2")?;
  repo.tag("v1.2.3")?;
  repo.tag("4.0.0")?;

  let output = run_tagy_ok(&repo.path, &["--minor"])?;

  assert!(stdout(&output).contains("Tag v1.3.0 --> created!"));
  assert_eq!(repo.package_version()?, "1.3.0");
  assert_eq!(repo.remote_tags()?, vec!["v1.3.0"]);
  assert_eq!(repo.last_commit_message()?, "Release v1.3.0");

  // The tag is annotated
  let kind = git(&repo.path, &["cat-file", "-t", "v1.3.0"])?;
  assert_eq!(String::from_utf8_lossy(&kind.stdout).trim(), "tag");

  Ok(())
}

#[test]
fn test_cli_prefix_overrides_manifest() -> Result<()> {
  let repo = TestRepo::with_package_json(r#"{ "version": "0.1.0", "tagy": { "tagPrefix": "v" } }"#)?;
  repo.tag("release-0.1.0")?;

  run_tagy_ok(&repo.path, &["-p", "--tag-prefix", "release-"])?;

  assert!(repo.local_tags()?.contains(&"release-0.1.1".to_string()));
  Ok(())
}

#[test]
fn test_replacements_are_committed() -> Result<()> {
  let repo = TestRepo::with_package_json(
    r#"{
  "version": "1.0.0",
  "tagy": {
    "replace": [
      { "files": ["README.md"], "from": "__CURRENT_TAG__", "to": "__VERSION__" }
    ]
  }
}
"#,
  )?;
  repo.write_file("README.md", "npm install demo@1.0.0\n")?;
  repo.commit("Add readme")?;
  repo.tag("1.0.0")?;

  run_tagy_ok(&repo.path, &["--minor"])?;

  assert_eq!(repo.read_file("README.md")?, "npm install demo@1.1.0\n");
  let changed = git(&repo.path, &["show", "--name-only", "--format=", "HEAD"])?;
  let changed = String::from_utf8_lossy(&changed.stdout);
  assert!(changed.contains("README.md"));
  assert!(changed.contains("package.json"));

  Ok(())
}

#[test]
fn test_cargo_manifest_is_bumped() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::remove_file(repo.path.join("package.json"))?;
  repo.write_file(
    "Cargo.toml",
    "[package]\nname = \"demo\"\nversion = \"0.4.1\" # released by tagy\nedition = \"2024\"\n",
  )?;
  repo.commit("Switch to Cargo")?;
  repo.tag("0.4.1")?;

  run_tagy_ok(&repo.path, &["--patch"])?;

  assert_eq!(
    repo.read_file("Cargo.toml")?,
    "[package]\nname = \"demo\"\nversion = \"0.4.2\" # released by tagy\nedition = \"2024\"\n"
  );
  assert_eq!(repo.remote_tags()?, vec!["0.4.2"]);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_project_hook_runs() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let repo = TestRepo::new()?;
  repo.write_file("tagy-hook", "#!/bin/sh\necho \"$1 $2\" > hook.out\n")?;
  std::fs::set_permissions(repo.path.join("tagy-hook"), std::fs::Permissions::from_mode(0o755))?;
  repo.commit("Add hook")?;

  run_tagy_ok(&repo.path, &["--patch"])?;

  assert_eq!(repo.read_file("hook.out")?.trim(), "0.0.1 0.0.0");
  Ok(())
}

#[test]
fn test_major_aborts_without_terminal() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.tag("2.0.0")?;

  let output = run_tagy(&repo.path, &["--major"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Aborted!"));
  assert_eq!(repo.package_version()?, "0.0.0");
  assert_eq!(repo.local_tags()?, vec!["2.0.0"]);
  assert!(repo.remote_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_custom_aborts_without_terminal() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_tagy(&repo.path, &["--custom"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Aborted!"));
  assert!(repo.local_tags()?.is_empty());

  Ok(())
}

#[test]
fn test_info_reports_latest_tag() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.tag("0.9.0")?;
  repo.tag("0.10.0")?;
  repo.tag("nightly")?;

  let output = run_tagy_ok(&repo.path, &["--info"])?;

  assert!(stdout(&output).contains("Last created tag is: 0.10.0"));
  assert_eq!(repo.local_tags()?.len(), 3);
  assert_eq!(repo.last_commit_message()?, "Initial commit");

  Ok(())
}

#[test]
fn test_info_without_tags() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_tagy_ok(&repo.path, &["--info"])?;

  assert!(stdout(&output).contains("no tags were created"));
  Ok(())
}

#[test]
fn test_reverse_without_tags() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_tagy_ok(&repo.path, &["--reverse"])?;

  assert!(stdout(&output).contains("Nothing to delete"));
  Ok(())
}

#[test]
fn test_reverse_keeps_tag_without_terminal() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.tag("0.3.0")?;

  let output = run_tagy(&repo.path, &["--reverse"])?;

  assert_eq!(output.status.code(), Some(1));
  assert_eq!(repo.local_tags()?, vec!["0.3.0"]);
  Ok(())
}

#[test]
fn test_feature_branch_aborts_without_terminal() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["checkout", "-b", "feature/x"])?;

  let output = run_tagy(&repo.path, &["--patch"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Aborted!"));
  assert_eq!(repo.package_version()?, "0.0.0");
  Ok(())
}

#[test]
fn test_outside_repository_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("package.json"), r#"{ "version": "1.0.0" }"#)?;

  let output = run_tagy(dir.path(), &["--patch"])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("Git repository not found"));
  let manifest = std::fs::read_to_string(dir.path().join("package.json"))?;
  assert!(manifest.contains("1.0.0"));
  Ok(())
}

#[test]
fn test_commit_identity_from_environment() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["config", "--unset", "user.name"])?;
  git(&repo.path, &["config", "--unset", "user.email"])?;
  let home = tempfile::TempDir::new()?;
  let home_path = home.path().to_str().unwrap();

  run_tagy_with_env(
    &repo.path,
    &["--patch"],
    &[
      ("HOME", home_path),
      ("XDG_CONFIG_HOME", home_path),
      ("GIT_CONFIG_NOSYSTEM", "1"),
      ("GIT_AUTHOR_NAME", "Env Releaser"),
      ("GIT_AUTHOR_EMAIL", "releaser@example.com"),
      ("GIT_COMMITTER_NAME", "Env Releaser"),
      ("GIT_COMMITTER_EMAIL", "releaser@example.com"),
    ],
  )
  .and_then(|output| {
    anyhow::ensure!(output.status.success(), "tagy failed: {}", stderr(&output));
    Ok(output)
  })?;

  let log = git(&repo.path, &["log", "-1", "--format=%an <%ae>|%cn <%ce>"])?;
  assert_eq!(
    String::from_utf8_lossy(&log.stdout).trim(),
    "Env Releaser <releaser@example.com>|Env Releaser <releaser@example.com>"
  );
  assert_eq!(repo.last_commit_message()?, "Release 0.0.1");
  assert_eq!(repo.remote_tags()?, vec!["0.0.1"]);
  Ok(())
}
