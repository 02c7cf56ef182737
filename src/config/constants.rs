//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Sessions & Authorization
// =============================================================================

/// How long a session stays valid, measured from its creation time (30 minutes)
pub const SESSION_TTL_MS: i64 = 30 * 60 * 1000;

/// The user name whose active session authorizes admin-gated operations
pub const ADMIN_USER_NAME: &str = "admin";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// Snapshot Files
// =============================================================================

/// Default path of the needs catalog snapshot
pub const DEFAULT_CUPBOARD_FILE: &str = "data/cupboard.json";

/// Default path of the users snapshot
pub const DEFAULT_USERS_FILE: &str = "data/users.json";

/// Default path of the sessions snapshot
pub const DEFAULT_SESSIONS_FILE: &str = "data/sessions.json";

// =============================================================================
// Chat
// =============================================================================

/// Generative model used for chat conversations
pub const CHAT_MODEL: &str = "gemini-2.5-flash-lite";

/// Default base URL of the generative API
pub const DEFAULT_CHAT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
