//! Smoke harness for the coordinator
//!
//! Exercises a full registration → context → load/save cycle against real
//! files, so a persistence problem shows up without embedding the crate in
//! a host first.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use savescope::constants;
use savescope::{ensure_registered, Context, Coordinator, DurableStore, FileRegistry, SessionDoc};

#[derive(Parser, Debug)]
#[command(name = "savescope", about = "Exercise a full settings save/load cycle")]
struct Args {
    /// Directory for the durable settings file and registry manifest
    /// (default: the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Host session document (JSON). Read if present, written back after
    /// the save hook.
    #[arg(long)]
    session: Option<PathBuf>,

    /// Contexts to enter, in order (hub, session, editor, workshop,
    /// main-menu, loading). Defaults to "hub".
    #[arg(long = "enter", value_name = "CONTEXT")]
    enter: Vec<String>,
}

fn read_session_doc(path: &PathBuf) -> anyhow::Result<SessionDoc> {
    if !path.exists() {
        info!(path = %path.display(), "session file not found, starting from an empty document");
        return Ok(SessionDoc::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse session file {}", path.display()))?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("session file {} is not a JSON object", path.display()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let (store, registry_path) = match &args.config_dir {
        Some(dir) => (
            DurableStore::new(dir.join(constants::config::FILENAME)),
            dir.join(constants::config::REGISTRY_FILENAME),
        ),
        None => (DurableStore::at_default_path(), FileRegistry::default_path()),
    };
    info!(path = %store.path().display(), "durable settings file");

    let mut registry = FileRegistry::open(&registry_path)?;
    ensure_registered(&mut registry)?;

    let mut session_doc = match &args.session {
        Some(path) => read_session_doc(path)?,
        None => SessionDoc::new(),
    };

    let contexts: Vec<Context> = if args.enter.is_empty() {
        vec![Context::Hub]
    } else {
        args.enter
            .iter()
            .map(|s| s.parse())
            .collect::<anyhow::Result<_>>()?
    };

    let mut coordinator = Coordinator::new(store);
    for ctx in contexts {
        coordinator.on_context_enter(ctx);
    }

    coordinator.on_load(&session_doc)?;
    info!(global = ?coordinator.global(), session = ?coordinator.session(), "settings after load");

    coordinator.on_save(&mut session_doc)?;

    if let Some(path) = &args.session {
        let contents = serde_json::to_string_pretty(&session_doc)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write session file {}", path.display()))?;
        info!(path = %path.display(), "wrote session document back");
    }

    coordinator.on_destroy();
    Ok(())
}
