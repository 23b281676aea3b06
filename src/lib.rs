//! savescope: two-tier settings persistence and context lifecycle
//! coordination for long-running hosts.
//!
//! The host owns one [`Coordinator`] per context activation and drives it
//! through four hooks: context entry, load, save, destroy. The coordinator
//! keeps installation-wide settings in a durable TOML file and per-session
//! settings inside the host's own session document, and attaches exactly
//! one subsystem per operational context.

#![forbid(unsafe_code)]

pub mod constants;
pub mod context;
pub mod coordinator;
pub mod registry;
pub mod settings;
pub mod store;
pub mod subsystem;

// Re-export the surface hosts actually touch
pub use context::Context;
pub use coordinator::{Coordinator, Lifecycle};
pub use registry::{ensure_registered, FileRegistry, MemoryRegistry, ModuleRegistry, REQUIRED_CONTEXTS};
pub use settings::{Difficulty, GlobalSettings, SessionDoc, SessionSettings};
pub use store::DurableStore;
pub use subsystem::{Persistable, Subsystem, SubsystemFactory, SubsystemKind};
