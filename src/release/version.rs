//! Current/next version resolution
//!
//! Tags are matched as `<prefix><digit>...`, the prefix is stripped and the
//! remainder parsed as strict semver. Anything unparseable counts as `0.0.0`.

use crate::core::error::{TagyResult, ValidationError};
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use std::sync::LazyLock;

static CUSTOM_VERSION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("static pattern compiles"));

/// Semver component to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
  Major,
  Minor,
  Patch,
}

/// The most recent release tag, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
  /// Raw tag name, prefix included
  pub name: Option<String>,
  /// Parsed version, `0.0.0` when absent or malformed
  pub version: Version,
}

impl ResolvedTag {
  pub fn none() -> Self {
    Self {
      name: None,
      version: zero(),
    }
  }
}

fn zero() -> Version {
  Version::new(0, 0, 0)
}

/// Parse a version string, coercing anything malformed to `0.0.0`
pub fn normalize(raw: &str) -> Version {
  Version::parse(raw.trim()).unwrap_or_else(|_| zero())
}

/// Pick the latest tag carrying `prefix`
///
/// `tags` is history order (oldest first). The semver-greatest parseable tag
/// wins; when matching tags exist but none parse, the last one is reported
/// with version `0.0.0`.
pub fn resolve(tags: &[String], prefix: &str) -> ResolvedTag {
  let candidates: Vec<(&String, &str)> = tags
    .iter()
    .filter_map(|tag| {
      let rest = tag.trim().strip_prefix(prefix)?;
      rest.starts_with(|c: char| c.is_ascii_digit()).then_some((tag, rest))
    })
    .collect();

  let best = candidates
    .iter()
    .filter_map(|(tag, rest)| Version::parse(rest.trim()).ok().map(|v| (*tag, v)))
    .max_by(|(_, a), (_, b)| a.cmp(b));

  match (best, candidates.last()) {
    (Some((tag, version)), _) => ResolvedTag {
      name: Some(tag.trim().to_string()),
      version,
    },
    (None, Some((tag, _))) => ResolvedTag {
      name: Some(tag.trim().to_string()),
      version: zero(),
    },
    (None, None) => ResolvedTag::none(),
  }
}

/// Bump `current` by one component
///
/// A pre-release is first promoted to its release (`1.2.3-rc.1` patch
/// becomes `1.2.3`), matching npm's `semver.inc`. Build metadata is dropped.
pub fn increment(current: &Version, bump: Bump) -> Version {
  let mut next = current.clone();
  let was_prerelease = !next.pre.is_empty();
  next.pre = Prerelease::EMPTY;
  next.build = BuildMetadata::EMPTY;

  match bump {
    Bump::Major => {
      if !(was_prerelease && next.minor == 0 && next.patch == 0) {
        next.major += 1;
      }
      next.minor = 0;
      next.patch = 0;
    }
    Bump::Minor => {
      if !(was_prerelease && next.patch == 0) {
        next.minor += 1;
      }
      next.patch = 0;
    }
    Bump::Patch => {
      if !was_prerelease {
        next.patch += 1;
      }
    }
  }

  next
}

/// Validate a user-entered custom version
pub fn parse_custom(input: &str) -> TagyResult<Version> {
  let trimmed = input.trim();
  if !CUSTOM_VERSION.is_match(trimmed) {
    return Err(
      ValidationError::InvalidCustomVersion {
        input: input.to_string(),
      }
      .into(),
    );
  }

  Version::parse(trimmed).map_err(|_| {
    ValidationError::InvalidCustomVersion {
      input: input.to_string(),
    }
    .into()
  })
}
