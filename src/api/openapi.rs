//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{auth_handler, chat_handler, cupboard_handler, user_handler};
use crate::domain::{BasketNeed, ChatPersonality, CreateUser, Need, Role, Session, UpdateUser, UserResponse};

/// OpenAPI documentation for the Cupboard API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cupboard API",
        version = "0.1.0",
        description = "Donation cupboard backend: needs catalog, user baskets, \
                       session authentication and a chat assistant",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        auth_handler::login_hash,
        auth_handler::session_status,
        auth_handler::refresh_session,
        auth_handler::logout,
        // User endpoints
        user_handler::create_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::get_user_by_name,
        // Basket endpoints
        user_handler::get_basket,
        user_handler::add_basket_need,
        user_handler::edit_basket_count,
        user_handler::remove_basket_need,
        // Cupboard endpoints
        cupboard_handler::create_need,
        cupboard_handler::update_need,
        cupboard_handler::delete_need,
        cupboard_handler::search_needs,
        cupboard_handler::list_needs,
        cupboard_handler::get_need,
        // Chat endpoints
        chat_handler::list_personalities,
        chat_handler::create_chat,
        chat_handler::send_message,
        chat_handler::delete_chat,
        chat_handler::chat_exists,
    ),
    components(
        schemas(
            // Domain types
            Need,
            BasketNeed,
            Role,
            Session,
            ChatPersonality,
            UserResponse,
            CreateUser,
            UpdateUser,
            // Request types
            auth_handler::LoginRequest,
        )
    ),
    tags(
        (name = "Authentication", description = "Login, logout and session checks"),
        (name = "Users", description = "User management operations"),
        (name = "Baskets", description = "Per-user funding baskets"),
        (name = "Cupboard", description = "Needs catalog operations"),
        (name = "Chat", description = "Chat assistant proxy")
    )
)]
pub struct ApiDoc;
