//! Release operations for SystemGit (tags, commits, pushes)

use super::system_git::SystemGit;
use super::{REMOTE, VersionControl};
use crate::core::error::{GitError, TagyError, TagyResult};

impl SystemGit {
    /// Push a refspec to the release remote
    fn push(&self, refspec: &str) -> TagyResult<()> {
        println!("   📤 Pushing {} to {}...", refspec, REMOTE);

        let output = self.output(&["push", REMOTE, refspec])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TagyError::Git(GitError::PushFailed {
                remote: REMOTE.to_string(),
                refspec: refspec.to_string(),
                reason: stderr.to_string(),
            }));
        }

        Ok(())
    }
}

impl VersionControl for SystemGit {
    fn current_branch(&self) -> TagyResult<Option<String>> {
        self.branch_name()
    }

    fn fetch_tags(&self) -> TagyResult<()> {
        self.run(&["fetch", "--tags", REMOTE])?;
        Ok(())
    }

    /// Uses `--sort=v:refname` so the order is version-aware, not lexical
    fn list_tags(&self, prefix: &str) -> TagyResult<Vec<String>> {
        let stdout = self.run(&["tag", "--list", "--sort=v:refname"])?;

        let tags = stdout
            .lines()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && s.starts_with(prefix))
            .map(String::from)
            .collect();

        Ok(tags)
    }

    fn normalize_line_endings(&self) -> TagyResult<()> {
        self.run(&["config", "core.autocrlf", "false"])?;
        Ok(())
    }

    fn has_pending_changes(&self) -> TagyResult<bool> {
        let stdout = self.run(&["status", "--porcelain"])?;
        Ok(stdout.lines().any(|l| !l.trim().is_empty()))
    }

    fn commit_all(&self, message: &str) -> TagyResult<()> {
        self.run(&["add", "--all"])?;
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    fn push_branch(&self, branch: &str) -> TagyResult<()> {
        self.push(branch)
    }

    fn create_tag(&self, name: &str, message: &str) -> TagyResult<()> {
        self.run(&["tag", "-a", name, "-m", message])?;
        Ok(())
    }

    fn push_tag(&self, name: &str) -> TagyResult<()> {
        self.push(&format!("refs/tags/{}", name))
    }

    fn delete_tag(&self, name: &str) -> TagyResult<()> {
        self.run(&["tag", "-d", name])?;
        Ok(())
    }

    fn delete_remote_tag(&self, name: &str) -> TagyResult<()> {
        self.push(&format!(":refs/tags/{}", name))
    }
}
