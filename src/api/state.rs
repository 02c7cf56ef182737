//! Application state - Dependency injection container.
//!
//! Provides centralized access to the repositories behind every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{
    ChatRepository, CupboardFileStore, CupboardRepository, GeminiChat, SessionFileStore,
    SessionRepository, UserFileStore, UserRepository,
};

/// Application state containing all repositories (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Session store and authorization gate
    pub sessions: Arc<dyn SessionRepository>,
    /// User store (and baskets)
    pub users: Arc<dyn UserRepository>,
    /// Needs catalog store
    pub cupboard: Arc<dyn CupboardRepository>,
    /// Chat proxy
    pub chat: Arc<dyn ChatRepository>,
}

impl AppState {
    /// Create application state with the file-backed stores described by
    /// the configuration. Fails when a snapshot file exists but cannot be
    /// read.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self {
            sessions: Arc::new(SessionFileStore::new(&config.sessions_file)?),
            users: Arc::new(UserFileStore::new(&config.users_file)?),
            cupboard: Arc::new(CupboardFileStore::new(&config.cupboard_file)?),
            chat: Arc::new(GeminiChat::new(config)),
        })
    }

    /// Create application state with manually injected repositories.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
        cupboard: Arc<dyn CupboardRepository>,
        chat: Arc<dyn ChatRepository>,
    ) -> Self {
        Self {
            sessions,
            users,
            cupboard,
            chat,
        }
    }
}
