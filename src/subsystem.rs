//! Per-context subsystems and the persistable capability
//!
//! The coordinator attaches exactly one subsystem per context. Subsystems
//! are opaque to the coordinator except for two narrow surfaces: teardown,
//! and an optional save/load capability against the durable settings
//! document. The capability is deliberately global-scope only; a subsystem
//! that needs per-session state keeps it out of this interface.

use toml::{Table, Value};
use tracing::info;

use crate::constants::keys;
use crate::context::Context;
use crate::settings::doc;

/// Save/load capability against the shared durable settings document.
///
/// Implementors read and write their own named section and must leave every
/// other part of the document alone.
pub trait Persistable {
    fn load(&mut self, global_doc: &Table);
    fn save(&self, global_doc: &mut Table);
}

/// Which subsystem is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsystemKind {
    Hub,
    SessionController,
    Editor,
}

impl std::fmt::Display for SubsystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubsystemKind::Hub => "hub-manager",
            SubsystemKind::SessionController => "session-controller",
            SubsystemKind::Editor => "editor-mode",
        };
        write!(f, "{s}")
    }
}

/// An auxiliary component activated for exactly one context at a time.
///
/// The capability check is static: a subsystem that participates in the
/// global save/load cycle returns itself from `as_persistable`.
pub trait Subsystem {
    fn kind(&self) -> SubsystemKind;

    fn as_persistable(&mut self) -> Option<&mut dyn Persistable> {
        None
    }

    /// Called once by the coordinator before the subsystem is dropped
    fn shutdown(&mut self) {}
}

/// Maps a context to the subsystem it gets, if any
pub type SubsystemFactory = Box<dyn Fn(Context) -> Option<Box<dyn Subsystem>>>;

/// The built-in context → subsystem mapping:
/// hub → hub manager, session → session controller, editing contexts →
/// editor mode, everything else → none.
pub fn default_factory(ctx: Context) -> Option<Box<dyn Subsystem>> {
    match ctx {
        Context::Hub => Some(Box::new(HubManager::new())),
        Context::Session => Some(Box::new(SessionController::new())),
        ctx if ctx.is_editing() => Some(Box::new(EditorMode::new())),
        _ => None,
    }
}

/// Hub-management subsystem, active on the hub screen
#[derive(Debug, Default)]
pub struct HubManager {
    /// Hub activations across the lifetime of the installation
    visits: u64,
}

impl HubManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn record_visit(&mut self) {
        self.visits += 1;
    }
}

impl Subsystem for HubManager {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Hub
    }

    fn as_persistable(&mut self) -> Option<&mut dyn Persistable> {
        Some(self)
    }

    fn shutdown(&mut self) {
        info!(visits = self.visits, "hub manager shutting down");
    }
}

impl Persistable for HubManager {
    fn load(&mut self, global_doc: &Table) {
        if let Some(Value::Table(section)) = global_doc.get(keys::HUB_SECTION) {
            self.visits = doc::read_u64(section, "visits", 0);
        }
    }

    fn save(&self, global_doc: &mut Table) {
        let mut section = Table::new();
        section.insert("visits".into(), Value::Integer(self.visits as i64));
        global_doc.insert(keys::HUB_SECTION.into(), Value::Table(section));
    }
}

/// Session controller subsystem, active while a session is loaded
#[derive(Debug, Default)]
pub struct SessionController {
    /// Total seconds spent in active sessions on this installation
    runtime_secs: u64,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runtime_secs(&self) -> u64 {
        self.runtime_secs
    }

    pub fn accrue_runtime(&mut self, secs: u64) {
        self.runtime_secs += secs;
    }
}

impl Subsystem for SessionController {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::SessionController
    }

    fn as_persistable(&mut self) -> Option<&mut dyn Persistable> {
        Some(self)
    }

    fn shutdown(&mut self) {
        info!(runtime_secs = self.runtime_secs, "session controller shutting down");
    }
}

impl Persistable for SessionController {
    fn load(&mut self, global_doc: &Table) {
        if let Some(Value::Table(section)) = global_doc.get(keys::SESSION_CONTROLLER_SECTION) {
            self.runtime_secs = doc::read_u64(section, "runtime_secs", 0);
        }
    }

    fn save(&self, global_doc: &mut Table) {
        let mut section = Table::new();
        section.insert("runtime_secs".into(), Value::Integer(self.runtime_secs as i64));
        global_doc.insert(keys::SESSION_CONTROLLER_SECTION.into(), Value::Table(section));
    }
}

/// Editor-mode subsystem, shared by both editing contexts.
/// Keeps no installation-wide state, so it does not declare the persistable
/// capability.
#[derive(Debug, Default)]
pub struct EditorMode;

impl EditorMode {
    pub fn new() -> Self {
        Self
    }
}

impl Subsystem for EditorMode {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factory_mapping() {
        let kind_for = |ctx: Context| default_factory(ctx).map(|s| s.kind());

        assert_eq!(kind_for(Context::Hub), Some(SubsystemKind::Hub));
        assert_eq!(kind_for(Context::Session), Some(SubsystemKind::SessionController));
        assert_eq!(kind_for(Context::Editor), Some(SubsystemKind::Editor));
        assert_eq!(kind_for(Context::Workshop), Some(SubsystemKind::Editor));
        assert_eq!(kind_for(Context::MainMenu), None);
        assert_eq!(kind_for(Context::Loading), None);
    }

    #[test]
    fn test_editor_mode_is_not_persistable() {
        let mut editor = EditorMode::new();
        assert!(editor.as_persistable().is_none());
    }

    #[test]
    fn test_hub_manager_roundtrip() {
        let mut hub = HubManager::new();
        hub.record_visit();
        hub.record_visit();

        let mut table = Table::new();
        hub.save(&mut table);

        let mut restored = HubManager::new();
        restored.load(&table);
        assert_eq!(restored.visits(), 2);
    }

    #[test]
    fn test_session_controller_roundtrip() {
        let mut controller = SessionController::new();
        controller.accrue_runtime(90);

        let mut table = Table::new();
        controller.save(&mut table);

        let mut restored = SessionController::new();
        restored.load(&table);
        assert_eq!(restored.runtime_secs(), 90);
    }

    #[test]
    fn test_load_from_document_without_section_keeps_defaults() {
        let mut hub = HubManager::new();
        hub.load(&Table::new());
        assert_eq!(hub.visits(), 0);
    }

    #[test]
    fn test_save_leaves_other_sections_alone() {
        let mut table: Table = "log_level = \"info\"\n[session_controller]\nruntime_secs = 5"
            .parse()
            .unwrap();

        HubManager::new().save(&mut table);

        assert_eq!(table["log_level"].as_str(), Some("info"));
        assert_eq!(
            table["session_controller"].as_table().unwrap()["runtime_secs"].as_integer(),
            Some(5)
        );
        assert!(table.contains_key("hub"));
    }
}
