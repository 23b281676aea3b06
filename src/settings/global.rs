//! Installation-wide settings
//!
//! These apply to every session of the host and live in the durable settings
//! file, alongside any sections contributed by persistable subsystems.
//! Never written into the host's session document.

use toml::{Table, Value};

use crate::settings::doc;

/// Settings shared by all sessions of one installation
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    /// Log verbosity requested for the host's subsystems
    pub log_level: String,
    /// Seconds between background autosaves (0 disables them)
    pub autosave_interval_secs: u32,
    /// Whether subsystems should surface upkeep warnings
    pub show_warnings: bool,
    /// Rotated save backups kept per session
    pub max_backups: u32,
}

fn default_log_level() -> &'static str {
    "info"
}

const DEFAULT_AUTOSAVE_INTERVAL_SECS: u32 = 300;
const DEFAULT_MAX_BACKUPS: u32 = 3;

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            show_warnings: true,
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl GlobalSettings {
    /// Read settings from the durable document, field by field.
    /// Absent or malformed fields resolve to defaults; this never fails.
    pub fn load_from(table: &Table) -> Self {
        let defaults = Self::default();
        Self {
            log_level: doc::read_string(table, "log_level", &defaults.log_level),
            autosave_interval_secs: doc::read_u32(
                table,
                "autosave_interval_secs",
                defaults.autosave_interval_secs,
            ),
            show_warnings: doc::read_bool(table, "show_warnings", defaults.show_warnings),
            max_backups: doc::read_u32(table, "max_backups", defaults.max_backups),
        }
    }

    /// Insert this record's fields at the top level of the durable document,
    /// replacing previous values. Subsystem sections in the same document are
    /// left untouched.
    pub fn save_into(&self, table: &mut Table) {
        table.insert("log_level".into(), Value::String(self.log_level.clone()));
        table.insert(
            "autosave_interval_secs".into(),
            Value::Integer(i64::from(self.autosave_interval_secs)),
        );
        table.insert("show_warnings".into(), Value::Boolean(self.show_warnings));
        table.insert(
            "max_backups".into(),
            Value::Integer(i64::from(self.max_backups)),
        );
    }
}
