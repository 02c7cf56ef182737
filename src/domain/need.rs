//! Need catalog entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog line item (donation target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Need {
    /// Unique identifier, assigned by the cupboard store on creation
    #[serde(default)]
    pub id: u32,
    /// Display name
    pub name: String,
    /// Cost of a single unit
    pub cost: u32,
    /// How many units are wanted
    pub quantity: u32,
    /// Category of the need
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form description
    pub description: String,
}

impl Need {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        cost: u32,
        quantity: u32,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            quantity,
            kind: kind.into(),
            description: description.into(),
        }
    }
}
