//! Context lifecycle coordinator
//!
//! The central long-lived object. It owns the canonical in-memory settings
//! records for both scopes, drives the two-tier persistence flow when the
//! host asks it to load or save, and keeps exactly the right subsystem
//! attached for the current context.
//!
//! All methods are invoked synchronously by the host on its own control
//! thread; nothing here locks. The host's composition root owns the
//! instance and passes it by reference to whatever needs the current
//! settings.

use anyhow::Result;
use tracing::{info, warn};

use crate::context::Context;
use crate::settings::{GlobalSettings, SessionDoc, SessionSettings};
use crate::store::DurableStore;
use crate::subsystem::{default_factory, Subsystem, SubsystemFactory, SubsystemKind};

/// Coordinator lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, no context entered yet
    Uninitialized,
    /// A context has been entered
    Active(Context),
    /// Torn down; refuses further context entries
    Destroyed,
}

/// Scoped-persistence and context-driven lifecycle coordinator
pub struct Coordinator {
    store: DurableStore,
    factory: SubsystemFactory,

    global: GlobalSettings,
    session: SessionSettings,

    /// Accumulated durable document: settings fields plus any sections
    /// contributed by persistable subsystems. Carried between load and save
    /// so sections from subsystems not currently attached survive.
    global_doc: toml::Table,

    attached: Option<Box<dyn Subsystem>>,
    lifecycle: Lifecycle,
}

impl Coordinator {
    /// Coordinator with the built-in context → subsystem mapping
    pub fn new(store: DurableStore) -> Self {
        Self::with_factory(store, Box::new(default_factory))
    }

    /// Coordinator with a host-supplied subsystem factory
    pub fn with_factory(store: DurableStore, factory: SubsystemFactory) -> Self {
        Self {
            store,
            factory,
            global: GlobalSettings::default(),
            session: SessionSettings::default(),
            global_doc: toml::Table::new(),
            attached: None,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Context currently active, if any
    pub fn context(&self) -> Option<Context> {
        match self.lifecycle {
            Lifecycle::Active(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Kind of the currently attached subsystem, if any
    pub fn attached_kind(&self) -> Option<SubsystemKind> {
        self.attached.as_ref().map(|s| s.kind())
    }

    pub fn global(&self) -> &GlobalSettings {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut GlobalSettings {
        &mut self.global
    }

    pub fn session(&self) -> &SessionSettings {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionSettings {
        &mut self.session
    }

    pub fn store(&self) -> &DurableStore {
        &self.store
    }

    /// Host notification: the application entered `ctx`. The previous
    /// subsystem (if any) is torn down and the one matching the new context
    /// is attached. Contexts outside the mapping attach nothing; that is a
    /// valid state, not an error.
    pub fn on_context_enter(&mut self, ctx: Context) {
        if self.lifecycle == Lifecycle::Destroyed {
            warn!(context = %ctx, "context entered after destroy, ignoring");
            return;
        }

        self.detach();

        match (self.factory)(ctx) {
            Some(subsystem) => {
                info!(context = %ctx, kind = %subsystem.kind(), "attaching subsystem");
                self.attached = Some(subsystem);
            }
            None => info!(context = %ctx, "no subsystem for context"),
        }

        self.lifecycle = Lifecycle::Active(ctx);
    }

    /// Host load hook. Session settings come from the host's session
    /// document. The durable document is read only if the file exists;
    /// otherwise global settings keep their defaults and no subsystem
    /// fan-out happens. Only filesystem read failures are errors.
    pub fn on_load(&mut self, session_doc: &SessionDoc) -> Result<()> {
        self.session = SessionSettings::load_from(session_doc);

        if !self.store.exists() {
            info!(path = %self.store.path().display(), "no durable settings file, keeping defaults");
            return Ok(());
        }

        let table = self.store.load()?;
        self.global = GlobalSettings::load_from(&table);
        if let Some(subsystem) = self.attached.as_mut()
            && let Some(persistable) = subsystem.as_persistable()
        {
            persistable.load(&table);
        }
        self.global_doc = table;

        info!(context = ?self.context(), "loaded settings for both scopes");
        Ok(())
    }

    /// Host save hook. Session settings go into the host's session
    /// document; global settings and every persistable subsystem section go
    /// into the accumulated durable document, which then fully replaces the
    /// file on disk. Write failures propagate to the caller.
    pub fn on_save(&mut self, session_doc: &mut SessionDoc) -> Result<()> {
        self.session.save_into(session_doc);

        self.global.save_into(&mut self.global_doc);
        if let Some(subsystem) = self.attached.as_mut()
            && let Some(persistable) = subsystem.as_persistable()
        {
            persistable.save(&mut self.global_doc);
        }
        self.store.save(&self.global_doc)?;

        info!(context = ?self.context(), "saved settings for both scopes");
        Ok(())
    }

    /// Host teardown hook. Destroys the attached subsystem and refuses
    /// further context entries. Safe to call more than once.
    pub fn on_destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        self.detach();
        self.lifecycle = Lifecycle::Destroyed;
        info!("coordinator destroyed");
    }

    fn detach(&mut self) {
        if let Some(mut subsystem) = self.attached.take() {
            info!(kind = %subsystem.kind(), "detaching subsystem");
            subsystem.shutdown();
        }
    }
}
