//! Settings records for the two persistence scopes
//!
//! This module provides the two statically-typed settings records:
//! - **global**: GlobalSettings, one per installation, kept in the durable
//!   settings file (flattened TOML)
//! - **session**: SessionSettings, one per saved session, embedded in the
//!   host's session document (JSON sub-section)
//!
//! The two scopes are disjoint on disk by construction: each record only
//! knows how to (de)serialize against its own document.

pub mod doc;
pub mod global;
pub mod session;

// Re-export commonly used types
pub use global::GlobalSettings;
pub use session::{Difficulty, SessionDoc, SessionSettings};
