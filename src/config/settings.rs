//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_CHAT_API_URL, DEFAULT_CUPBOARD_FILE, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SESSIONS_FILE, DEFAULT_USERS_FILE,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub cupboard_file: PathBuf,
    pub users_file: PathBuf,
    pub sessions_file: PathBuf,
    pub server_host: String,
    pub server_port: u16,
    chat_api_key: Option<String>,
    pub chat_api_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("cupboard_file", &self.cupboard_file)
            .field("users_file", &self.users_file)
            .field("sessions_file", &self.sessions_file)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("chat_api_key", &"[REDACTED]")
            .field("chat_api_url", &self.chat_api_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let chat_api_key = env::var("CHAT_API_KEY").ok().filter(|key| !key.is_empty());
        if chat_api_key.is_none() {
            tracing::warn!("CHAT_API_KEY not set, chat endpoints will reject requests");
        }

        Self {
            cupboard_file: env::var("CUPBOARD_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CUPBOARD_FILE)),
            users_file: env::var("USERS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_USERS_FILE)),
            sessions_file: env::var("SESSIONS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSIONS_FILE)),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            chat_api_key,
            chat_api_url: env::var("CHAT_API_URL")
                .unwrap_or_else(|_| DEFAULT_CHAT_API_URL.to_string()),
        }
    }

    /// Get the chat API credential, if configured.
    pub fn chat_api_key(&self) -> Option<&str> {
        self.chat_api_key.as_deref()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
