//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::ADMIN_USER_NAME;
use crate::domain::Need;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Manager,
    Helper,
}

impl Role {
    /// Derive the role from a user name: "admin" is the manager,
    /// everyone else is a helper.
    pub fn for_user_name(user_name: &str) -> Self {
        if user_name == ADMIN_USER_NAME {
            Role::Manager
        } else {
            Role::Helper
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }
}

/// A need held in a basket, paired with how many units the user intends
/// to fund.
///
/// The embedded [`Need`] is a snapshot taken when the entry was added;
/// later catalog updates or deletions do not reach into baskets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BasketNeed {
    pub need: Need,
    pub count: i32,
}

impl BasketNeed {
    pub fn new(need: Need, count: i32) -> Self {
        Self { need, count }
    }

    /// Apply a count edit, returning whether it was accepted.
    ///
    /// The accept check treats `count` as a delta against the current value,
    /// but an accepted edit stores `count` directly. Callers depend on this
    /// exact asymmetry; see the pinning tests below before changing it.
    pub fn edit_count(&mut self, count: i32) -> bool {
        if self.count + count < 0 {
            return false;
        }
        self.count = count;
        true
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "UserRecord")]
pub struct User {
    pub id: u32,
    pub user_name: String,
    pub password_hash: String,
    pub role: Role,
    pub basket: Vec<BasketNeed>,
    pub security: Vec<String>,
    pub restricted: bool,
}

/// Raw persisted form of a [`User`].
///
/// The role is intentionally absent: it is derived from the user name on
/// every construction, so stale or tampered snapshot values never stick.
#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    id: u32,
    user_name: String,
    #[serde(default)]
    password_hash: String,
    #[serde(default)]
    basket: Vec<BasketNeed>,
    #[serde(default)]
    security: Vec<String>,
    #[serde(default)]
    restricted: bool,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User::from_parts(
            record.id,
            record.user_name,
            record.password_hash,
            record.restricted,
            record.basket,
            record.security,
        )
    }
}

impl User {
    /// Create a new user with an empty basket.
    pub fn new(id: u32, user_name: String, password_hash: String, security: Vec<String>) -> Self {
        Self::from_parts(id, user_name, password_hash, false, Vec::new(), security)
    }

    /// Create a user from all its parts, deriving the role from the name.
    pub fn from_parts(
        id: u32,
        user_name: String,
        password_hash: String,
        restricted: bool,
        basket: Vec<BasketNeed>,
        security: Vec<String>,
    ) -> Self {
        let role = Role::for_user_name(&user_name);
        Self {
            id,
            user_name,
            password_hash,
            role,
            basket,
            security,
            restricted,
        }
    }

    /// Append a need to the basket with a count of one.
    ///
    /// No merging takes place: adding a need whose id is already present
    /// creates a second basket line. Callers guard against duplicates with
    /// [`User::has_need`] first.
    pub fn add_need(&mut self, need: Need) {
        self.basket.push(BasketNeed::new(need, 1));
    }

    /// Remove every basket line whose embedded need id matches.
    pub fn remove_need(&mut self, need_id: u32) {
        self.basket.retain(|entry| entry.need.id != need_id);
    }

    /// Find the first basket line whose embedded need id matches.
    pub fn basket_need_mut(&mut self, need_id: u32) -> Option<&mut BasketNeed> {
        self.basket.iter_mut().find(|entry| entry.need.id == need_id)
    }

    /// Whether any basket line embeds the given need id.
    pub fn has_need(&self, need_id: u32) -> bool {
        self.basket.iter().any(|entry| entry.need.id == need_id)
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Client-supplied id, only consulted by the duplicate guard;
    /// the store assigns the real id
    #[serde(default)]
    pub id: u32,
    /// Desired user name (must be unique)
    #[validate(length(min = 1, message = "User name is required"))]
    #[schema(example = "JohnDeer")]
    pub user_name: String,
    /// Plain text password, hashed before storage
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// Answers to the security questions
    #[serde(default)]
    pub security: Vec<String>,
}

/// User update data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    /// New user name
    #[validate(length(min = 1, message = "User name is required"))]
    pub user_name: String,
    /// New plain text password; an empty string keeps the stored hash
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub restricted: bool,
    #[serde(default)]
    pub basket: Vec<BasketNeed>,
    #[serde(default)]
    pub security: Vec<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: u32,
    pub user_name: String,
    pub role: Role,
    pub basket: Vec<BasketNeed>,
    pub restricted: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            role: user.role,
            basket: user.basket,
            restricted: user.restricted,
        }
    }
}
