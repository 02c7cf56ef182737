//! Cupboard API - A donation cupboard backend
//!
//! Manages a catalog of needs (donation items), users with funding
//! baskets, and file-snapshot-persisted sessions that gate access.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **infra**: Infrastructure concerns (snapshot files, external APIs)
//! - **api**: HTTP handlers and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Need, Password, Session, User};
pub use errors::{AppError, AppResult};
