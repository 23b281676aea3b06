//! Per-session settings
//!
//! Scoped to one persisted session. Embedded as a single named sub-section
//! of the host-owned session document; every other key of that document is
//! left untouched. Never written into the durable settings file.

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::constants::keys::SESSION_SECTION;

/// The host's session document: an opaque JSON object we do not own
pub type SessionDoc = Map<String, Value>;

/// Session difficulty preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Parse from string, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings scoped to one saved session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Whether the coordinator's subsystems act on this session at all
    pub enabled: bool,
    /// Difficulty preset for this session
    pub difficulty: Difficulty,
    /// Suspend instead of terminating background work when the session exits
    pub hibernate_on_exit: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            difficulty: Difficulty::Normal,
            hibernate_on_exit: false,
        }
    }
}

fn read_bool(section: &Map<String, Value>, key: &str, default: bool) -> bool {
    match section.get(key) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!(key = key, found = %other, "malformed session field, using default");
            default
        }
    }
}

impl SessionSettings {
    /// Read our sub-section out of the host's session document.
    /// A missing or malformed section resolves to defaults; this never fails
    /// the overall session load.
    pub fn load_from(doc: &SessionDoc) -> Self {
        let defaults = Self::default();
        let section = match doc.get(SESSION_SECTION) {
            None => return defaults,
            Some(Value::Object(section)) => section,
            Some(other) => {
                warn!(section = SESSION_SECTION, found = %other, "session section is not an object, using defaults");
                return defaults;
            }
        };

        let difficulty = match section.get("difficulty") {
            None => defaults.difficulty,
            Some(Value::String(s)) => Difficulty::parse(s).unwrap_or_else(|| {
                warn!(value = %s, "unknown difficulty, using default");
                defaults.difficulty
            }),
            Some(other) => {
                warn!(found = %other, "malformed difficulty field, using default");
                defaults.difficulty
            }
        };

        Self {
            enabled: read_bool(section, "enabled", defaults.enabled),
            difficulty,
            hibernate_on_exit: read_bool(section, "hibernate_on_exit", defaults.hibernate_on_exit),
        }
    }

    /// Insert or replace our sub-section in the host's session document.
    /// All other keys of the document are untouched.
    pub fn save_into(&self, doc: &mut SessionDoc) {
        doc.insert(
            SESSION_SECTION.to_string(),
            json!({
                "enabled": self.enabled,
                "difficulty": self.difficulty.as_str(),
                "hibernate_on_exit": self.hibernate_on_exit,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_empty_doc_is_defaults() {
        let settings = SessionSettings::load_from(&SessionDoc::new());
        assert_eq!(settings, SessionSettings::default());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let settings = SessionSettings {
            enabled: false,
            difficulty: Difficulty::Hard,
            hibernate_on_exit: true,
        };

        let mut doc = SessionDoc::new();
        settings.save_into(&mut doc);
        assert_eq!(SessionSettings::load_from(&doc), settings);
    }

    #[test]
    fn test_other_sections_untouched_by_save() {
        let mut doc = SessionDoc::new();
        doc.insert("host_version".to_string(), json!("2.1"));
        doc.insert("vehicles".to_string(), json!([{"id": 1}]));

        SessionSettings::default().save_into(&mut doc);

        assert_eq!(doc["host_version"], json!("2.1"));
        assert_eq!(doc["vehicles"], json!([{"id": 1}]));
        assert!(doc.contains_key(SESSION_SECTION));
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let mut doc = SessionDoc::new();
        doc.insert(
            SESSION_SECTION.to_string(),
            json!({
                "enabled": "yes",
                "difficulty": "hard",
                "hibernate_on_exit": 1,
            }),
        );

        let settings = SessionSettings::load_from(&doc);
        assert_eq!(settings.enabled, true);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.hibernate_on_exit, false);
    }

    #[test]
    fn test_unknown_difficulty_falls_back() {
        let mut doc = SessionDoc::new();
        doc.insert(SESSION_SECTION.to_string(), json!({"difficulty": "brutal"}));
        assert_eq!(
            SessionSettings::load_from(&doc).difficulty,
            Difficulty::Normal
        );
    }

    #[test]
    fn test_section_not_an_object_falls_back() {
        let mut doc = SessionDoc::new();
        doc.insert(SESSION_SECTION.to_string(), json!("oops"));
        assert_eq!(SessionSettings::load_from(&doc), SessionSettings::default());
    }
}
