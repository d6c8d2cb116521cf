//! Error types for tagy with contextual messages and exit codes
//!
//! Every failure the release workflow can hit is categorized here so the
//! binary can pick an exit code and, where it helps, print a suggestion.
//! Declined confirmations are NOT errors: they surface as
//! [`Outcome::Aborted`](crate::release::Outcome::Aborted).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for tagy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Success, info query, nothing to do
  Success = 0,
  /// User error (flags, manifest, custom version) or an aborted run
  User = 1,
  /// System error (git, I/O, file rewriting, hooks)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for tagy
#[derive(Debug)]
pub enum TagyError {
  /// Invalid flags or manifest problems
  Config(ConfigError),

  /// Malformed user input (custom version)
  Validation(ValidationError),

  /// Git operation errors
  Git(GitError),

  /// Replacement pass failures
  Replacement(ReplacementError),

  /// Project hook failures
  Hook(HookError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl TagyError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    TagyError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    TagyError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      TagyError::Message { message, context, help } => TagyError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      TagyError::Io(e) => TagyError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      TagyError::Config(_) => ExitCode::User,
      TagyError::Validation(_) => ExitCode::User,
      TagyError::Git(_) => ExitCode::System,
      TagyError::Replacement(_) => ExitCode::System,
      TagyError::Hook(_) => ExitCode::System,
      TagyError::Io(_) => ExitCode::System,
      TagyError::Message { .. } => ExitCode::System,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      TagyError::Config(e) => e.help_message(),
      TagyError::Validation(e) => e.help_message(),
      TagyError::Git(e) => e.help_message(),
      TagyError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for TagyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TagyError::Config(e) => write!(f, "{}", e),
      TagyError::Validation(e) => write!(f, "{}", e),
      TagyError::Git(e) => write!(f, "{}", e),
      TagyError::Replacement(e) => write!(f, "{}", e),
      TagyError::Hook(e) => write!(f, "{}", e),
      TagyError::Io(e) => write!(f, "I/O error: {}", e),
      TagyError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for TagyError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      TagyError::Io(e) => Some(e),
      TagyError::Replacement(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for TagyError {
  fn from(err: io::Error) -> Self {
    TagyError::Io(err)
  }
}

impl From<ConfigError> for TagyError {
  fn from(err: ConfigError) -> Self {
    TagyError::Config(err)
  }
}

impl From<ValidationError> for TagyError {
  fn from(err: ValidationError) -> Self {
    TagyError::Validation(err)
  }
}

impl From<GitError> for TagyError {
  fn from(err: GitError) -> Self {
    TagyError::Git(err)
  }
}

impl From<ReplacementError> for TagyError {
  fn from(err: ReplacementError) -> Self {
    TagyError::Replacement(err)
  }
}

impl From<HookError> for TagyError {
  fn from(err: HookError) -> Self {
    TagyError::Hook(err)
  }
}

impl From<dialoguer::Error> for TagyError {
  fn from(err: dialoguer::Error) -> Self {
    TagyError::message(format!("Prompt failed: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// No increment flag given
  MissingIncrement,

  /// More than one increment flag given
  TooManyIncrements { flags: Vec<&'static str> },

  /// A manifest is required but none was found
  ManifestNotFound { root: PathBuf },

  /// Manifest exists but cannot be read or parsed
  ManifestUnreadable { path: PathBuf, reason: String },

  /// Manifest could not be written back
  ManifestUnwritable { path: PathBuf, reason: String },

  /// `--reverse` combined with soft mode
  ReverseInSoftMode,
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingIncrement => Some(
        "Pass one of: -p/--patch, -m/--minor, --major, --custom, --reverse, --info. Example: `tagy --patch`".to_string(),
      ),
      ConfigError::TooManyIncrements { .. } => Some("Pick exactly one increment flag per run.".to_string()),
      ConfigError::ManifestNotFound { .. } => {
        Some("Soft releases record the version in package.json or Cargo.toml; create one first.".to_string())
      }
      ConfigError::ReverseInSoftMode => {
        Some("Soft releases never create tags. Drop --soft (and `soft`/`method` in the manifest) to delete a tag.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingIncrement => write!(f, "Please specify the increment type"),
      ConfigError::TooManyIncrements { flags } => {
        write!(f, "Too many arguments: {}", flags.join(", "))
      }
      ConfigError::ManifestNotFound { root } => {
        write!(
          f,
          "No project manifest found in {} (expected Cargo.toml or package.json)",
          root.display()
        )
      }
      ConfigError::ManifestUnreadable { path, reason } => {
        write!(f, "Failed to read manifest {}: {}", path.display(), reason)
      }
      ConfigError::ManifestUnwritable { path, reason } => {
        write!(f, "Failed to write manifest {}: {}", path.display(), reason)
      }
      ConfigError::ReverseInSoftMode => write!(f, "--reverse is unsupported in soft mode"),
    }
  }
}

/// Validation errors for user-supplied values
#[derive(Debug)]
pub enum ValidationError {
  /// Custom version did not match MAJOR.MINOR.PATCH
  InvalidCustomVersion { input: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::InvalidCustomVersion { .. } => {
        Some("Enter a plain version such as 1.4.0 (no prefix, no pre-release).".to_string())
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::InvalidCustomVersion { input } => {
        write!(f, "Invalid version '{}': expected MAJOR.MINOR.PATCH", input)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Current branch could not be determined
  NoBranch,

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote has commits you don't have. Pull first, then re-run tagy.".to_string())
        } else if reason.contains("Permission denied") || reason.contains("403") {
          Some("Check your SSH key or credentials for the remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run tagy from inside a git repository or use --soft: {}",
        path.display()
      )),
      GitError::NoBranch => Some("Check out a branch (HEAD is detached or has no commits yet).".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::NoBranch => write!(f, "Could not determine the current branch"),
      GitError::PushFailed {
        remote,
        refspec,
        reason,
      } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason.trim_end())
      }
    }
  }
}

/// Replacement pass errors
#[derive(Debug)]
pub enum ReplacementError {
  /// `from` did not compile as a regular expression
  InvalidPattern { pattern: String, reason: String },

  /// Unsupported letter in `flags`
  InvalidFlags { flags: String },

  /// File pattern is not a valid glob
  InvalidGlob { pattern: String, reason: String },

  /// File could not be read
  Read { path: PathBuf, source: io::Error },

  /// File could not be written
  Write { path: PathBuf, source: io::Error },
}

impl std::error::Error for ReplacementError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReplacementError::Read { source, .. } | ReplacementError::Write { source, .. } => Some(source),
      _ => None,
    }
  }
}

impl fmt::Display for ReplacementError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReplacementError::InvalidPattern { pattern, reason } => {
        write!(f, "Invalid replacement pattern '{}': {}", pattern, reason)
      }
      ReplacementError::InvalidFlags { flags } => {
        write!(f, "Unsupported replacement flags '{}' (allowed: g, i, m, s, u)", flags)
      }
      ReplacementError::InvalidGlob { pattern, reason } => {
        write!(f, "Invalid file pattern '{}': {}", pattern, reason)
      }
      ReplacementError::Read { path, source } => {
        write!(f, "Failed to read {}: {}", path.display(), source)
      }
      ReplacementError::Write { path, source } => {
        write!(f, "Failed to write {}: {}", path.display(), source)
      }
    }
  }
}

/// Project hook errors
#[derive(Debug)]
pub enum HookError {
  /// Hook file exists but is not executable
  NotExecutable { path: PathBuf },

  /// Hook could not be started
  Spawn { path: PathBuf, reason: String },

  /// Hook exited unsuccessfully
  Failed { path: PathBuf, status: String },
}

impl fmt::Display for HookError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HookError::NotExecutable { path } => {
        write!(f, "Hook {} is not executable", path.display())
      }
      HookError::Spawn { path, reason } => {
        write!(f, "Failed to run hook {}: {}", path.display(), reason)
      }
      HookError::Failed { path, status } => {
        write!(f, "Hook {} failed ({})", path.display(), status)
      }
    }
  }
}

/// Result type alias for tagy
pub type TagyResult<T> = Result<T, TagyError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> TagyResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> TagyResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<TagyError>,
{
  fn context(self, ctx: impl Into<String>) -> TagyResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> TagyResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &TagyError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
