pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::TagyResult;

/// Remote every push and tag deletion goes to
pub const REMOTE: &str = "origin";

/// Version-control operations the release workflow depends on
///
/// Every method returns an error when the underlying command fails, except
/// `fetch_tags`, whose failure callers are expected to tolerate.
pub trait VersionControl {
  /// Current branch name, `None` for a detached or unborn HEAD
  fn current_branch(&self) -> TagyResult<Option<String>>;

  /// Fetch tags from the remote
  fn fetch_tags(&self) -> TagyResult<()>;

  /// Tags starting with `prefix`, oldest version first
  fn list_tags(&self, prefix: &str) -> TagyResult<Vec<String>>;

  /// Pin line-ending conversion so the release commit is byte-exact
  fn normalize_line_endings(&self) -> TagyResult<()>;

  /// Whether the working tree has anything to commit
  fn has_pending_changes(&self) -> TagyResult<bool>;

  /// Stage everything and commit
  fn commit_all(&self, message: &str) -> TagyResult<()>;

  fn push_branch(&self, branch: &str) -> TagyResult<()>;

  /// Create an annotated tag at HEAD
  fn create_tag(&self, name: &str, message: &str) -> TagyResult<()>;

  fn push_tag(&self, name: &str) -> TagyResult<()>;

  fn delete_tag(&self, name: &str) -> TagyResult<()>;

  fn delete_remote_tag(&self, name: &str) -> TagyResult<()>;
}
