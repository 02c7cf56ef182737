//! Chat handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::ChatPersonality;
use crate::errors::{AppError, AppResult, OptionExt};

/// Create chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/personalities", get(list_personalities))
        .route(
            "/:id",
            get(chat_exists)
                .post(create_chat)
                .put(send_message)
                .delete(delete_chat),
        )
}

/// List the selectable chat personalities
#[utoipa::path(
    get,
    path = "/chat/personalities",
    tag = "Chat",
    responses(
        (status = 200, description = "Available personalities", body = [ChatPersonality]),
        (status = 204, description = "No personalities configured")
    )
)]
pub async fn list_personalities(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<ChatPersonality>>)> {
    let personalities = state.chat.personalities();
    let status = if personalities.is_empty() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    };

    Ok((status, Json(personalities)))
}

/// Start a chat for the user with the chosen personality
#[utoipa::path(
    post,
    path = "/chat/{id}",
    tag = "Chat",
    params(("id" = u32, Path, description = "User id")),
    request_body = ChatPersonality,
    responses(
        (status = 200, description = "Chat created, echoes the user id", body = u32),
        (status = 409, description = "A chat for that user already exists")
    )
)]
pub async fn create_chat(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(personality): Json<ChatPersonality>,
) -> AppResult<Json<u32>> {
    let created = state
        .chat
        .generate_chat(id, personality)
        .await?
        .ok_or_else(|| AppError::conflict("Chat"))?;

    Ok(Json(created))
}

/// Send a message into the user's chat
#[utoipa::path(
    put,
    path = "/chat/{id}",
    tag = "Chat",
    params(("id" = u32, Path, description = "User id")),
    request_body = String,
    responses(
        (status = 200, description = "Model reply", body = String),
        (status = 404, description = "No chat for that user")
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    message: String,
) -> AppResult<Json<String>> {
    let reply = state.chat.submit_chat(id, message).await?.ok_or_not_found()?;
    Ok(Json(reply))
}

/// Delete the user's chat
#[utoipa::path(
    delete,
    path = "/chat/{id}",
    tag = "Chat",
    params(("id" = u32, Path, description = "User id")),
    responses(
        (status = 200, description = "Chat deleted", body = bool),
        (status = 404, description = "No chat for that user", body = bool)
    )
)]
pub async fn delete_chat(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> (StatusCode, Json<bool>) {
    if state.chat.delete_chat(id) {
        (StatusCode::OK, Json(true))
    } else {
        (StatusCode::NOT_FOUND, Json(false))
    }
}

/// Whether the user currently has a chat
#[utoipa::path(
    get,
    path = "/chat/{id}",
    tag = "Chat",
    params(("id" = u32, Path, description = "User id")),
    responses((status = 200, description = "Whether a chat exists", body = bool))
)]
pub async fn chat_exists(State(state): State<AppState>, Path(id): Path<u32>) -> Json<bool> {
    Json(state.chat.chat_exists(id))
}
