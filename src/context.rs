//! Host operational contexts
//!
//! The host moves through distinct operational modes (hub screen, an active
//! session, the two editing modes, plus transient screens). Exactly one
//! context is active at a time; transitions are driven entirely by the host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operational mode of the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Context {
    /// Central hub screen
    Hub,
    /// An active (loaded) session
    Session,
    /// Primary editing mode
    Editor,
    /// Secondary editing mode - same subsystem as Editor
    Workshop,
    /// Main menu, no session loaded
    MainMenu,
    /// Transient loading screen
    Loading,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Hub => "hub",
            Context::Session => "session",
            Context::Editor => "editor",
            Context::Workshop => "workshop",
            Context::MainMenu => "main-menu",
            Context::Loading => "loading",
        }
    }

    /// True for contexts that get the editor-mode subsystem
    pub fn is_editing(&self) -> bool {
        matches!(self, Context::Editor | Context::Workshop)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Context {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hub" => Ok(Context::Hub),
            "session" => Ok(Context::Session),
            "editor" => Ok(Context::Editor),
            "workshop" => Ok(Context::Workshop),
            "main-menu" | "mainmenu" => Ok(Context::MainMenu),
            "loading" => Ok(Context::Loading),
            other => Err(anyhow::anyhow!("unknown context '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_str() {
        for ctx in [
            Context::Hub,
            Context::Session,
            Context::Editor,
            Context::Workshop,
            Context::MainMenu,
            Context::Loading,
        ] {
            assert_eq!(ctx.as_str().parse::<Context>().unwrap(), ctx);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("HUB".parse::<Context>().unwrap(), Context::Hub);
        assert_eq!("MainMenu".parse::<Context>().unwrap(), Context::MainMenu);
    }

    #[test]
    fn test_parse_unknown_context() {
        assert!("orbit".parse::<Context>().is_err());
    }

    #[test]
    fn test_editing_contexts() {
        assert!(Context::Editor.is_editing());
        assert!(Context::Workshop.is_editing());
        assert!(!Context::Hub.is_editing());
        assert!(!Context::Session.is_editing());
    }
}
