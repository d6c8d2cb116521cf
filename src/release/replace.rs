//! Version placeholder replacement across project files
//!
//! Rules run in configuration order. Each rule sees the file contents left
//! behind by the rules before it, so one rule may match text another produced.

use crate::core::error::ReplacementError;
use regex::RegexBuilder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder for the version being released from
pub const CURRENT_TAG_TOKEN: &str = "__CURRENT_TAG__";
/// Placeholder for the version being released
pub const VERSION_TOKEN: &str = "__VERSION__";

/// `flags` as written in the manifest: a boolean or JS-style letters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlagSpec {
  Enabled(bool),
  Letters(String),
}

/// A find/replace rule with all required fields present
#[derive(Debug, Clone)]
pub struct ReplacementRule {
  /// Glob patterns relative to the working directory
  pub files: Vec<String>,
  /// Regular expression, may contain placeholders
  pub from: String,
  /// Replacement template, may contain placeholders and `$1` captures
  pub to: String,
  pub flags: Option<FlagSpec>,
}

/// Parsed matching options for one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleFlags {
  pub global: bool,
  pub case_insensitive: bool,
  pub multi_line: bool,
  pub dot_all: bool,
}

impl Default for RuleFlags {
  fn default() -> Self {
    Self {
      global: true,
      case_insensitive: false,
      multi_line: false,
      dot_all: false,
    }
  }
}

impl RuleFlags {
  /// Interpret the manifest value
  ///
  /// Absent or `true` replaces every match, `false` only the first. A
  /// letter string behaves like a JS `RegExp` flag set: without `g` only the
  /// first match is replaced.
  pub fn parse(spec: Option<&FlagSpec>) -> Result<Self, ReplacementError> {
    match spec {
      None | Some(FlagSpec::Enabled(true)) => Ok(Self::default()),
      Some(FlagSpec::Enabled(false)) => Ok(Self {
        global: false,
        ..Self::default()
      }),
      Some(FlagSpec::Letters(letters)) => {
        let mut flags = Self {
          global: false,
          ..Self::default()
        };
        for c in letters.chars() {
          match c {
            'g' => flags.global = true,
            'i' => flags.case_insensitive = true,
            'm' => flags.multi_line = true,
            's' => flags.dot_all = true,
            'u' => {}
            _ => {
              return Err(ReplacementError::InvalidFlags {
                flags: letters.clone(),
              });
            }
          }
        }
        Ok(flags)
      }
    }
  }
}

/// The two values placeholders stand for
#[derive(Debug, Clone, Copy)]
pub struct VersionTemplate<'a> {
  pub current_tag: &'a str,
  pub next_version: &'a str,
}

impl<'a> VersionTemplate<'a> {
  pub fn new(current_tag: &'a str, next_version: &'a str) -> Self {
    Self {
      current_tag,
      next_version,
    }
  }

  /// Substitute both placeholders verbatim
  pub fn render(&self, text: &str) -> String {
    text
      .replace(CURRENT_TAG_TOKEN, self.current_tag)
      .replace(VERSION_TOKEN, self.next_version)
  }

  /// Substitute both placeholders with regex-escaped values
  ///
  /// Used for `from`, so that `1.0.0` only matches the literal text.
  pub fn render_pattern(&self, pattern: &str) -> String {
    pattern
      .replace(CURRENT_TAG_TOKEN, &regex::escape(self.current_tag))
      .replace(VERSION_TOKEN, &regex::escape(self.next_version))
  }
}

/// What a replacement pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementReport {
  /// Files rewritten, in the order they were first changed
  pub changed_files: Vec<PathBuf>,
  /// Rules that matched at least one file
  pub rules_applied: usize,
}

/// Run every rule against the files under `cwd`
///
/// Stops at the first failure. Files rewritten by earlier rules stay
/// rewritten.
pub fn apply(
  rules: &[ReplacementRule],
  template: &VersionTemplate<'_>,
  cwd: &Path,
) -> Result<ReplacementReport, ReplacementError> {
  let mut report = ReplacementReport::default();

  for rule in rules {
    let flags = RuleFlags::parse(rule.flags.as_ref())?;
    let pattern = template.render_pattern(&rule.from);
    let regex = RegexBuilder::new(&pattern)
      .case_insensitive(flags.case_insensitive)
      .multi_line(flags.multi_line)
      .dot_matches_new_line(flags.dot_all)
      .build()
      .map_err(|e| ReplacementError::InvalidPattern {
        pattern: pattern.clone(),
        reason: e.to_string(),
      })?;
    let replacement = expand_references(&template.render(&rule.to), regex.captures_len());

    let files = expand_files(&rule.files, cwd)?;
    if files.is_empty() {
      tracing::debug!(files = ?rule.files, "replacement rule matched no files");
      continue;
    }
    report.rules_applied += 1;

    for path in files {
      let content = fs::read_to_string(&path).map_err(|source| ReplacementError::Read {
        path: path.clone(),
        source,
      })?;

      let updated = if flags.global {
        regex.replace_all(&content, replacement.as_str())
      } else {
        regex.replace(&content, replacement.as_str())
      };

      if updated == content {
        continue;
      }

      fs::write(&path, updated.as_bytes()).map_err(|source| ReplacementError::Write {
        path: path.clone(),
        source,
      })?;
      tracing::debug!(path = %path.display(), "rewrote file");

      if !report.changed_files.contains(&path) {
        report.changed_files.push(path);
      }
    }
  }

  Ok(report)
}

/// Translate a JS-style replacement string into `regex` syntax
///
/// `$1`..`$99`, `$&`, `$<name>` and `$$` are references, as is the
/// `${name}` form. Any other `$` is literal text, so `$PKG_OLD` survives.
fn expand_references(to: &str, captures_len: usize) -> String {
  let mut out = String::with_capacity(to.len());
  let mut rest = to;

  while let Some(pos) = rest.find('$') {
    out.push_str(&rest[..pos]);
    let after = &rest[pos + 1..];
    let digits: String = after.chars().take(2).take_while(char::is_ascii_digit).collect();

    if after.starts_with('$') {
      out.push_str("$$");
      rest = &after[1..];
    } else if after.starts_with('&') {
      out.push_str("${0}");
      rest = &after[1..];
    } else if !digits.is_empty() {
      // Two digits only when that group exists, like JS
      let used = if digits.len() == 2 && digits.parse::<usize>().is_ok_and(|n| n < captures_len) {
        2
      } else {
        1
      };
      out.push_str(&format!("${{{}}}", &digits[..used]));
      rest = &after[used..];
    } else if after.starts_with('{') && after.contains('}') {
      let end = after.find('}').map_or(0, |i| i + 1);
      out.push('$');
      out.push_str(&after[..end]);
      rest = &after[end..];
    } else if let Some(name) = after.strip_prefix('<').and_then(|s| s.split_once('>')).map(|(n, _)| n) {
      out.push_str(&format!("${{{}}}", name));
      rest = &after[name.len() + 2..];
    } else {
      out.push_str("$$");
      rest = after;
    }
  }

  out.push_str(rest);
  out
}

/// Expand glob patterns relative to `cwd` into existing files, deduplicated
///
/// `cwd` is escaped so that brackets or wildcards in the project path are
/// matched literally.
fn expand_files(patterns: &[String], cwd: &Path) -> Result<Vec<PathBuf>, ReplacementError> {
  let mut files = Vec::new();
  let root = PathBuf::from(glob::Pattern::escape(&cwd.to_string_lossy()));

  for pattern in patterns {
    let absolute = root.join(pattern);
    let absolute = absolute.to_string_lossy();
    let matches = glob::glob(&absolute).map_err(|e| ReplacementError::InvalidGlob {
      pattern: pattern.clone(),
      reason: e.to_string(),
    })?;

    for entry in matches {
      let path = entry.map_err(|e| ReplacementError::Read {
        path: e.path().to_path_buf(),
        source: std::io::Error::new(e.error().kind(), e.error().to_string()),
      })?;
      if path.is_file() && !files.contains(&path) {
        files.push(path);
      }
    }
  }

  Ok(files)
}
