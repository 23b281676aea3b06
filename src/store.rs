//! Durable settings store
//!
//! Reads and writes the installation-wide settings document at a fixed path,
//! independent of which session is active. The store is a pure document
//! read/write: it performs no merging and knows nothing about field meanings.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use toml::Table;
use tracing::{error, info};

/// Handle on the durable (installation-wide) settings file
#[derive(Debug, Clone)]
pub struct DurableStore {
    path: PathBuf,
}

impl DurableStore {
    /// Store backed by an explicit path (hosts and tests)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the fixed per-installation location
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Fixed per-installation path under the platform config dir
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the durable file exists. A fresh install has none; callers
    /// fall back to defaults rather than treating this as an error.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the full document. A missing file yields an empty document; an
    /// unparsable file is logged and also yields an empty document so the
    /// caller's defaults apply. Only filesystem read failures are errors.
    pub fn load(&self) -> Result<Table> {
        if !self.path.exists() {
            return Ok(Table::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;

        match contents.parse::<Table>() {
            Ok(table) => Ok(table),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to parse durable settings file, using defaults");
                Ok(Table::new())
            }
        }
    }

    /// Write the full document, replacing any previous content. The write
    /// goes to a temp file in the same directory and is renamed into place,
    /// so a failure cannot corrupt a previously written file.
    pub fn save(&self, table: &Table) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;

        let contents =
            toml::to_string_pretty(table).context("Failed to serialize settings to TOML")?;

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        tmp.write_all(contents.as_bytes())
            .context("Failed to write settings to temp file")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        info!(path = %self.path.display(), "Saved durable settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    fn store_in(dir: &Path) -> DurableStore {
        DurableStore::new(dir.join("global.toml"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut table = Table::new();
        table.insert("log_level".into(), Value::String("debug".into()));
        store.save(&table).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), table);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableStore::new(dir.path().join("nested/deeper/global.toml"));

        store.save(&Table::new()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut first = Table::new();
        first.insert("stale".into(), Value::Boolean(true));
        store.save(&first).unwrap();

        let mut second = Table::new();
        second.insert("fresh".into(), Value::Boolean(true));
        store.save(&second).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.contains_key("fresh"));
        assert!(!loaded.contains_key("stale"));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "not = [valid\ntoml").unwrap();

        // Parse failure resolves to defaults, not an error
        assert!(store.load().unwrap().is_empty());
    }
}
