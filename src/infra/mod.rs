//! Infrastructure layer - External systems integration
//!
//! This module handles everything outside the domain:
//! - JSON snapshot files and the repositories backed by them
//! - The external generative chat API client

pub mod chat;
pub mod repositories;
pub mod snapshot;

pub use chat::{ChatRepository, GeminiChat};
pub use repositories::{
    CupboardFileStore, CupboardRepository, SessionFileStore, SessionRepository, UserFileStore,
    UserRepository,
};
