//! Project manifest adapters
//!
//! A release records its version in the project manifest and reads its
//! settings from the `tagy` block there. Supported:
//! - Rust (`Cargo.toml`, `[package.metadata.tagy]`)
//! - JavaScript/TypeScript (`package.json`, top-level `"tagy"`)

use crate::core::config::ManifestSettings;
use crate::core::error::TagyResult;
use std::path::Path;

pub mod cargo;
pub mod node;

/// Manifest key holding the release settings
pub const SETTINGS_KEY: &str = "tagy";

/// Manifest reader/writer
///
/// Each ecosystem implements this trait to expose its version field and
/// the `tagy` settings block.
pub trait Manifest {
  /// Path of the manifest file
  fn path(&self) -> &Path;

  /// Get the manifest filename (e.g., "Cargo.toml", "package.json")
  fn filename(&self) -> &str;

  /// Release settings, `None` when the manifest has no `tagy` block
  fn settings(&self) -> TagyResult<Option<ManifestSettings>>;

  /// Version field as written, if any
  fn version(&self) -> Option<String>;

  /// Set the version field and write the manifest back to disk
  fn write_version(&mut self, version: &str) -> TagyResult<()>;
}

/// Detect the project manifest in `root`
///
/// Tries manifests in order: Cargo → Node
pub fn detect_manifest(root: &Path) -> TagyResult<Option<Box<dyn Manifest>>> {
  if let Some(manifest) = cargo::CargoManifest::load(root)? {
    return Ok(Some(Box::new(manifest)));
  }

  if let Some(manifest) = node::NodeManifest::load(root)? {
    return Ok(Some(Box::new(manifest)));
  }

  Ok(None)
}
