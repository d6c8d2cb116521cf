/// Node.js/TypeScript manifest (`package.json`)
///
/// The document is kept as a `serde_json::Value` with key order preserved,
/// so writing the version back leaves every other field where it was.
use super::{Manifest, SETTINGS_KEY};
use crate::core::config::ManifestSettings;
use crate::core::error::{ConfigError, TagyResult};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const FILENAME: &str = "package.json";

pub struct NodeManifest {
  path: PathBuf,
  doc: Value,
}

impl NodeManifest {
  /// Load `package.json` from `root`, `None` when there is none
  pub fn load(root: &Path) -> TagyResult<Option<Self>> {
    let path = root.join(FILENAME);
    if !path.is_file() {
      return Ok(None);
    }

    let unreadable = |reason: String| ConfigError::ManifestUnreadable {
      path: path.clone(),
      reason,
    };

    let content = std::fs::read_to_string(&path).map_err(|e| unreadable(e.to_string()))?;
    let doc: Value = serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))?;
    if !doc.is_object() {
      return Err(unreadable("top-level value is not an object".to_string()).into());
    }

    Ok(Some(Self { path, doc }))
  }
}

impl Manifest for NodeManifest {
  fn path(&self) -> &Path {
    &self.path
  }

  fn filename(&self) -> &str {
    FILENAME
  }

  fn settings(&self) -> TagyResult<Option<ManifestSettings>> {
    let Some(block) = self.doc.get(SETTINGS_KEY) else {
      return Ok(None);
    };

    let settings = ManifestSettings::deserialize(block).map_err(|e| ConfigError::ManifestUnreadable {
      path: self.path.clone(),
      reason: format!("invalid `{}` block: {}", SETTINGS_KEY, e),
    })?;
    Ok(Some(settings))
  }

  fn version(&self) -> Option<String> {
    self.doc.get("version").and_then(Value::as_str).map(String::from)
  }

  fn write_version(&mut self, version: &str) -> TagyResult<()> {
    let unwritable = |reason: String| ConfigError::ManifestUnwritable {
      path: self.path.clone(),
      reason,
    };

    let Some(obj) = self.doc.as_object_mut() else {
      return Err(unwritable("top-level value is not an object".to_string()).into());
    };
    obj.insert("version".to_string(), Value::String(version.to_string()));

    let mut rendered = serde_json::to_string_pretty(&self.doc).map_err(|e| unwritable(e.to_string()))?;
    rendered.push('\n');
    std::fs::write(&self.path, rendered).map_err(|e| unwritable(e.to_string()))?;

    Ok(())
  }
}
