//! Registration bootstrap against the host's module registry
//!
//! Runs once at startup. Guarantees the coordinator is registered for every
//! context where it must be instantiated, without ever removing contexts
//! some other component already granted it. Registry failures are surfaced;
//! the host then simply proceeds without the coordinator.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::constants::module;
use crate::context::Context;

/// Contexts in which the host must instantiate the coordinator
pub const REQUIRED_CONTEXTS: [Context; 4] = [
    Context::Hub,
    Context::Session,
    Context::Editor,
    Context::Workshop,
];

/// The host's registry of persistent modules, keyed by module identity
pub trait ModuleRegistry {
    /// Contexts the module is currently registered for, or `None` if the
    /// module is unknown to the registry
    fn registered_contexts(&self, module: &str) -> Result<Option<Vec<Context>>>;

    /// Register the module for exactly the given contexts
    fn register(&mut self, module: &str, contexts: &[Context]) -> Result<()>;

    /// Add one context to an existing registration
    fn add_context(&mut self, module: &str, ctx: Context) -> Result<()>;
}

/// Make sure the coordinator is registered for every required context.
///
/// Absent → registered with the full required set. Present → the registered
/// set becomes the union of its previous contexts and the required ones.
/// Idempotent: running this on every startup is safe.
pub fn ensure_registered(registry: &mut dyn ModuleRegistry) -> Result<()> {
    match registry.registered_contexts(module::ID)? {
        None => {
            info!(module = module::ID, "registering coordinator with the host");
            registry.register(module::ID, &REQUIRED_CONTEXTS)?;
        }
        Some(existing) => {
            for ctx in REQUIRED_CONTEXTS {
                if !existing.contains(&ctx) {
                    info!(module = module::ID, context = %ctx, "adding missing context to registration");
                    registry.add_context(module::ID, ctx)?;
                }
            }
        }
    }
    Ok(())
}

/// In-process registry, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: BTreeMap<String, Vec<Context>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModuleRegistry for MemoryRegistry {
    fn registered_contexts(&self, module: &str) -> Result<Option<Vec<Context>>> {
        Ok(self.entries.get(module).cloned())
    }

    fn register(&mut self, module: &str, contexts: &[Context]) -> Result<()> {
        self.entries.insert(module.to_string(), contexts.to_vec());
        Ok(())
    }

    fn add_context(&mut self, module: &str, ctx: Context) -> Result<()> {
        let contexts = self.entries.entry(module.to_string()).or_default();
        if !contexts.contains(&ctx) {
            contexts.push(ctx);
        }
        Ok(())
    }
}

/// On-disk registration manifest
#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    #[serde(default)]
    modules: BTreeMap<String, Vec<Context>>,
}

/// Registry backed by a small TOML manifest next to the durable settings
/// file. Every mutation rewrites the manifest atomically.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    manifest: Manifest,
}

impl FileRegistry {
    /// Manifest location under the platform config dir
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::REGISTRY_FILENAME);
        path
    }

    /// Open the manifest at `path`, starting empty if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let manifest = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read registry from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse registry at {}", path.display()))?
        } else {
            Manifest::default()
        };
        Ok(Self { path, manifest })
    }

    fn persist(&self) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create registry directory {}", parent.display()))?;

        let contents =
            toml::to_string_pretty(&self.manifest).context("Failed to serialize registry")?;
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        tmp.write_all(contents.as_bytes())
            .context("Failed to write registry to temp file")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl ModuleRegistry for FileRegistry {
    fn registered_contexts(&self, module: &str) -> Result<Option<Vec<Context>>> {
        Ok(self.manifest.modules.get(module).cloned())
    }

    fn register(&mut self, module: &str, contexts: &[Context]) -> Result<()> {
        self.manifest
            .modules
            .insert(module.to_string(), contexts.to_vec());
        self.persist()
    }

    fn add_context(&mut self, module: &str, ctx: Context) -> Result<()> {
        let contexts = self.manifest.modules.entry(module.to_string()).or_default();
        if !contexts.contains(&ctx) {
            contexts.push(ctx);
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_registry_gets_full_set() {
        let mut registry = MemoryRegistry::new();
        ensure_registered(&mut registry).unwrap();

        let contexts = registry.registered_contexts(module::ID).unwrap().unwrap();
        for ctx in REQUIRED_CONTEXTS {
            assert!(contexts.contains(&ctx), "missing {ctx}");
        }
    }

    #[test]
    fn test_ensure_registered_is_idempotent() {
        let mut registry = MemoryRegistry::new();
        ensure_registered(&mut registry).unwrap();
        let first = registry.registered_contexts(module::ID).unwrap().unwrap();

        ensure_registered(&mut registry).unwrap();
        let second = registry.registered_contexts(module::ID).unwrap().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_existing_contexts_are_never_removed() {
        let mut registry = MemoryRegistry::new();
        // A host granted the module an extra context on its own
        registry
            .register(module::ID, &[Context::Hub, Context::MainMenu])
            .unwrap();

        ensure_registered(&mut registry).unwrap();

        let contexts = registry.registered_contexts(module::ID).unwrap().unwrap();
        assert!(contexts.contains(&Context::MainMenu));
        for ctx in REQUIRED_CONTEXTS {
            assert!(contexts.contains(&ctx), "missing {ctx}");
        }
    }

    #[test]
    fn test_registry_failure_propagates() {
        struct BrokenRegistry;
        impl ModuleRegistry for BrokenRegistry {
            fn registered_contexts(&self, _module: &str) -> Result<Option<Vec<Context>>> {
                Err(anyhow::anyhow!("registry unavailable"))
            }
            fn register(&mut self, _module: &str, _contexts: &[Context]) -> Result<()> {
                Err(anyhow::anyhow!("registry unavailable"))
            }
            fn add_context(&mut self, _module: &str, _ctx: Context) -> Result<()> {
                Err(anyhow::anyhow!("registry unavailable"))
            }
        }

        assert!(ensure_registered(&mut BrokenRegistry).is_err());
    }

    #[test]
    fn test_file_registry_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules.toml");

        {
            let mut registry = FileRegistry::open(&path).unwrap();
            ensure_registered(&mut registry).unwrap();
        }

        // Re-open from disk and run again: same final set
        let mut registry = FileRegistry::open(&path).unwrap();
        ensure_registered(&mut registry).unwrap();
        let contexts = registry.registered_contexts(module::ID).unwrap().unwrap();
        assert_eq!(contexts.len(), REQUIRED_CONTEXTS.len());
    }

    #[test]
    fn test_file_registry_unknown_module() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FileRegistry::open(dir.path().join("modules.toml")).unwrap();
        assert!(registry.registered_contexts("elsewhere").unwrap().is_none());
    }
}
