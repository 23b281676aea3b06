//! Application-wide constants
//!
//! Single source of truth for file names, document keys, and the module
//! identity used against the host registry.

/// Durable settings file location (relative to the platform config dir)
pub mod config {
    /// Subdirectory under the platform config dir
    pub const APP_DIR: &str = "savescope";

    /// Durable (installation-wide) settings file name
    pub const FILENAME: &str = "global.toml";

    /// Module registration manifest name
    pub const REGISTRY_FILENAME: &str = "modules.toml";
}

/// Keys inside persisted documents
pub mod keys {
    /// Named sub-section we own inside the host's session document
    pub const SESSION_SECTION: &str = "savescope";

    /// Hub manager's section in the durable settings document
    pub const HUB_SECTION: &str = "hub";

    /// Session controller's section in the durable settings document
    pub const SESSION_CONTROLLER_SECTION: &str = "session_controller";
}

/// Identity under which the coordinator registers with the host
pub mod module {
    /// Registry entry name for the coordinator
    pub const ID: &str = "savescope";
}
