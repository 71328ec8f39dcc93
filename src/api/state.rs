//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::Argon2PasswordHasher;
use crate::infra::{Database, Persistence};
use crate::services::{RegistrationService, RegistrationWorkflow};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration service
    pub registration: Arc<dyn RegistrationService>,
    /// Active deployment profiles
    pub profiles: Arc<[String]>,
}

impl AppState {
    /// Create application state with manually injected services.
    pub fn new(registration: Arc<dyn RegistrationService>, profiles: Vec<String>) -> Self {
        Self {
            registration,
            profiles: profiles.into(),
        }
    }

    /// Wire the production services on top of a database connection.
    pub fn from_database(database: &Database, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let registration = Arc::new(RegistrationWorkflow::new(uow, hasher));

        Self::new(registration, config.profiles.clone())
    }
}
