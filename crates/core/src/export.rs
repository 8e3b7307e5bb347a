//! Detail-record export to JSON files.
//!
//! The terminal counterpart of a copy-to-clipboard affordance: the open
//! detail record is written as pretty-printed JSON under the configured
//! export directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

/// Directory under the user's config dir used for exports by default.
pub const DEFAULT_EXPORT_DIR: &str = "wmtui/exports";

/// Writes detail records as pretty-printed JSON files.
pub struct ExportManager {
    root: PathBuf,
}

impl ExportManager {
    /// Create a new manager rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user's config directory.
    pub fn default_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_EXPORT_DIR)
    }

    /// Root directory exports are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serialize `record` to `<root>/<kind>_<id>_<timestamp>.json` and
    /// return the resulting path.
    pub fn export<T: Serialize>(&self, kind: &str, id: &str, record: &T) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let file_name = format!(
            "{}_{}_{}.json",
            sanitize_component(kind),
            sanitize_component(id),
            Utc::now().format("%Y%m%d%H%M%S")
        );
        let path = self.root.join(file_name);
        let serialized =
            serde_json::to_vec_pretty(record).context("failed to serialize detail record")?;
        fs::write(&path, serialized)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

fn sanitize_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            result.push(ch);
        }
    }
    if result.is_empty() {
        "export".to_string()
    } else {
        result
    }
}
