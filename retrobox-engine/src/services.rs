//! Handles to the live systems a refresh or execute talks to.

use retrobox_db::Connection;
use retrobox_frontend::Manager;
use retrobox_lib::Registry;

use crate::EngineError;
use crate::web::VersionLookup;

/// Borrowed live-side services.
///
/// The database and the manager are optional: only some categories need
/// them, and asking for a missing one is a [`EngineError::NotConfigured`].
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub registry: &'a dyn Registry,
    pub database: Option<&'a Connection>,
    pub manager: Option<&'a dyn Manager>,
    pub lookup: &'a dyn VersionLookup,
}

impl<'a> Services<'a> {
    pub fn new(registry: &'a dyn Registry, lookup: &'a dyn VersionLookup) -> Self {
        Self {
            registry,
            database: None,
            manager: None,
            lookup,
        }
    }

    pub fn with_database(mut self, database: &'a Connection) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_manager(mut self, manager: &'a dyn Manager) -> Self {
        self.manager = Some(manager);
        self
    }

    pub fn database(&self) -> Result<&'a Connection, EngineError> {
        self.database
            .ok_or_else(|| EngineError::not_configured("PinUP database"))
    }

    pub fn manager(&self) -> Result<&'a dyn Manager, EngineError> {
        self.manager
            .ok_or_else(|| EngineError::not_configured("Front-end software"))
    }
}
