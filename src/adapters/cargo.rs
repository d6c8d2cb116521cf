/// Cargo/Rust manifest (`Cargo.toml`)
///
/// Edited through `toml_edit` so comments and formatting survive the
/// version bump.
use super::{Manifest, SETTINGS_KEY};
use crate::core::config::ManifestSettings;
use crate::core::error::{ConfigError, TagyResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Value};

const FILENAME: &str = "Cargo.toml";

pub struct CargoManifest {
  path: PathBuf,
  doc: DocumentMut,
}

/// Just enough of Cargo.toml to reach `[package.metadata.tagy]`
#[derive(Deserialize)]
struct CargoToml {
  package: Option<PackageSection>,
}

#[derive(Deserialize)]
struct PackageSection {
  metadata: Option<MetadataSection>,
}

#[derive(Deserialize)]
struct MetadataSection {
  tagy: Option<ManifestSettings>,
}

impl CargoManifest {
  /// Load `Cargo.toml` from `root`
  ///
  /// Returns `None` when there is no manifest or it has no `[package]`
  /// (virtual workspace roots carry no version of their own).
  pub fn load(root: &Path) -> TagyResult<Option<Self>> {
    let path = root.join(FILENAME);
    if !path.is_file() {
      return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ManifestUnreadable {
      path: path.clone(),
      reason: e.to_string(),
    })?;
    let doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| ConfigError::ManifestUnreadable {
      path: path.clone(),
      reason: e.to_string(),
    })?;

    if !doc.contains_key("package") {
      tracing::debug!(path = %path.display(), "Cargo.toml without [package], skipping");
      return Ok(None);
    }

    Ok(Some(Self { path, doc }))
  }
}

impl Manifest for CargoManifest {
  fn path(&self) -> &Path {
    &self.path
  }

  fn filename(&self) -> &str {
    FILENAME
  }

  fn settings(&self) -> TagyResult<Option<ManifestSettings>> {
    let parsed: CargoToml = toml_edit::de::from_str(&self.doc.to_string()).map_err(|e| ConfigError::ManifestUnreadable {
      path: self.path.clone(),
      reason: format!("invalid [package.metadata.{}]: {}", SETTINGS_KEY, e),
    })?;

    Ok(parsed.package.and_then(|p| p.metadata).and_then(|m| m.tagy))
  }

  fn version(&self) -> Option<String> {
    self
      .doc
      .get("package")
      .and_then(|p| p.get("version"))
      .and_then(Item::as_str)
      .map(String::from)
  }

  fn write_version(&mut self, version: &str) -> TagyResult<()> {
    let unwritable = |reason: &str| ConfigError::ManifestUnwritable {
      path: self.path.clone(),
      reason: reason.to_string(),
    };

    let package = self
      .doc
      .get_mut("package")
      .and_then(Item::as_table_like_mut)
      .ok_or_else(|| unwritable("[package] is not a table"))?;

    match package.get_mut("version") {
      Some(Item::Value(Value::String(current))) => {
        // Keep surrounding whitespace and trailing comments
        let decor = current.decor().clone();
        *current = toml_edit::Formatted::new(version.to_string());
        *current.decor_mut() = decor;
      }
      Some(_) => {
        return Err(unwritable("`package.version` is inherited from the workspace; bump the workspace version instead").into());
      }
      None => {
        package.insert("version", toml_edit::value(version));
      }
    }

    std::fs::write(&self.path, self.doc.to_string()).map_err(|e| unwritable(&e.to_string()))?;
    Ok(())
  }
}
