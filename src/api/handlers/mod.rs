//! HTTP request handlers.

pub mod auth_handler;
pub mod chat_handler;
pub mod cupboard_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use chat_handler::chat_routes;
pub use cupboard_handler::cupboard_routes;
pub use user_handler::user_routes;
