//! Release configuration: CLI flags merged with the manifest's `tagy` block
//!
//! The manifest block looks the same in both supported manifests:
//!
//! ```json
//! "tagy": {
//!   "tagPrefix": "v",
//!   "soft": false,
//!   "auto-release": true,
//!   "replace": [
//!     { "files": ["README.md"], "from": "__CURRENT_TAG__", "to": "__VERSION__" }
//!   ]
//! }
//! ```
//!
//! ```toml
//! [package.metadata.tagy]
//! tagPrefix = "v"
//! replace = [{ files = "README.md", from = "__CURRENT_TAG__", to = "__VERSION__" }]
//! ```

use crate::core::error::{ConfigError, TagyResult};
use crate::release::replace::{FlagSpec, ReplacementRule};
use semver::Version;
use serde::Deserialize;
use std::path::PathBuf;

/// Hook executable looked up in the working directory when the manifest names none
pub const DEFAULT_HOOK: &str = "tagy-hook";

/// What a single run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementKind {
  Patch,
  Minor,
  Major,
  Custom,
  Reverse,
  Info,
}

impl IncrementKind {
  /// CLI spelling, used in error messages
  pub fn flag(self) -> &'static str {
    match self {
      IncrementKind::Patch => "--patch",
      IncrementKind::Minor => "--minor",
      IncrementKind::Major => "--major",
      IncrementKind::Custom => "--custom",
      IncrementKind::Reverse => "--reverse",
      IncrementKind::Info => "--info",
    }
  }
}

/// Flags as given on the command line, before validation
#[derive(Debug, Clone, Default)]
pub struct CliFlags {
  pub patch: bool,
  pub minor: bool,
  pub major: bool,
  pub custom: bool,
  pub reverse: bool,
  pub info: bool,
  pub soft: bool,
  pub auto_release: bool,
  pub tag_prefix: Option<String>,
}

impl CliFlags {
  /// The single selected increment kind
  ///
  /// Zero or several selected kinds are both configuration errors.
  pub fn increment(&self) -> TagyResult<IncrementKind> {
    let selected: Vec<IncrementKind> = [
      (self.patch, IncrementKind::Patch),
      (self.minor, IncrementKind::Minor),
      (self.major, IncrementKind::Major),
      (self.custom, IncrementKind::Custom),
      (self.reverse, IncrementKind::Reverse),
      (self.info, IncrementKind::Info),
    ]
    .into_iter()
    .filter_map(|(set, kind)| set.then_some(kind))
    .collect();

    match selected.as_slice() {
      [] => Err(ConfigError::MissingIncrement.into()),
      [kind] => Ok(*kind),
      many => Err(
        ConfigError::TooManyIncrements {
          flags: many.iter().map(|k| k.flag()).collect(),
        }
        .into(),
      ),
    }
  }
}

/// The `tagy` block of a project manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestSettings {
  #[serde(default, rename = "tagPrefix", alias = "tag-prefix")]
  pub tag_prefix: Option<String>,

  #[serde(default)]
  pub soft: bool,

  /// Deprecated: `method = "soft"` means `soft = true`
  #[serde(default)]
  pub method: Option<String>,

  #[serde(default, rename = "auto-release", alias = "autoRelease")]
  pub auto_release: bool,

  #[serde(default)]
  pub replace: Vec<RawReplacementRule>,

  /// Hook executable, relative to the working directory
  #[serde(default)]
  pub hook: Option<PathBuf>,
}

impl ManifestSettings {
  /// Soft mode requested by either the current or the deprecated key
  pub fn is_soft(&self) -> bool {
    self.soft || self.method.as_deref() == Some("soft")
  }
}

/// A replacement rule exactly as written in the manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReplacementRule {
  #[serde(default)]
  pub files: Option<FilePatterns>,
  #[serde(default)]
  pub from: Option<String>,
  #[serde(default)]
  pub to: Option<String>,
  #[serde(default)]
  pub flags: Option<FlagSpec>,
}

/// `files` may be a single pattern or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FilePatterns {
  One(String),
  Many(Vec<String>),
}

impl FilePatterns {
  pub fn into_vec(self) -> Vec<String> {
    match self {
      FilePatterns::One(pattern) => vec![pattern],
      FilePatterns::Many(patterns) => patterns,
    }
  }
}

impl RawReplacementRule {
  /// Validated rule, or `None` when a required field is missing
  pub fn into_rule(self) -> Option<ReplacementRule> {
    let files: Vec<String> = self
      .files?
      .into_vec()
      .into_iter()
      .filter(|f| !f.trim().is_empty())
      .collect();
    let from = self.from.filter(|f| !f.is_empty())?;
    let to = self.to?;

    if files.is_empty() {
      return None;
    }

    Some(ReplacementRule {
      files,
      from,
      to,
      flags: self.flags,
    })
  }
}

/// Immutable snapshot of everything a run needs to know
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
  pub increment: IncrementKind,
  pub tag_prefix: String,
  pub soft: bool,
  pub auto_release: bool,
  pub replacements: Vec<ReplacementRule>,
  pub hook: PathBuf,
}

impl ReleaseConfig {
  /// Merge CLI flags with manifest settings
  ///
  /// | field          | rule                                      |
  /// |----------------|-------------------------------------------|
  /// | `increment`    | CLI, exactly one                          |
  /// | `tag_prefix`   | CLI > manifest > `""`                     |
  /// | `soft`         | CLI OR manifest `soft` OR `method="soft"` |
  /// | `auto_release` | CLI OR manifest                           |
  /// | `replacements` | manifest                                  |
  /// | `hook`         | manifest > `tagy-hook`                    |
  pub fn resolve(flags: &CliFlags, settings: Option<&ManifestSettings>) -> TagyResult<Self> {
    let increment = flags.increment()?;
    let defaults = ManifestSettings::default();
    let settings = settings.unwrap_or(&defaults);

    match settings.method.as_deref() {
      Some("soft") => {
        eprintln!("⚠️  `method: \"soft\"` is deprecated, use `soft: true` instead");
        tracing::warn!("deprecated manifest key `method` used");
      }
      Some(other) => {
        tracing::warn!(method = other, "ignoring unknown manifest `method`");
      }
      None => {}
    }

    let tag_prefix = flags
      .tag_prefix
      .clone()
      .or_else(|| settings.tag_prefix.clone())
      .unwrap_or_default();

    let replacements = settings
      .replace
      .iter()
      .cloned()
      .enumerate()
      .filter_map(|(idx, raw)| {
        let rule = raw.into_rule();
        if rule.is_none() {
          tracing::debug!(index = idx, "skipping replacement rule without files/from/to");
        }
        rule
      })
      .collect();

    Ok(Self {
      increment,
      tag_prefix,
      soft: flags.soft || settings.is_soft(),
      auto_release: flags.auto_release || settings.auto_release,
      replacements,
      hook: settings.hook.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_HOOK)),
    })
  }

  /// Full tag name for a version, prefix included
  pub fn tag_name(&self, version: &Version) -> String {
    format!("{}{}", self.tag_prefix, version)
  }
}
