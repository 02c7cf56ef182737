//! Chat personality entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A selectable persona that seeds a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatPersonality {
    pub id: u32,
    pub name: String,
    /// Seed prompt sent as the first message of a new conversation
    pub description: String,
}

impl ChatPersonality {
    pub fn new(id: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}
