//! Authentication handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Password, Session};
use crate::errors::{AppError, AppResult, OptionExt};

/// Login request carrying a plain text password
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User name to authenticate as
    #[validate(length(min = 1, message = "User name is required"))]
    #[schema(example = "JohnDeer")]
    pub user_name: String,
    /// Plain text password (or an already-hashed one on /login/hash)
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/login/hash", post(login_hash))
        .route(
            "/:username",
            get(session_status).put(refresh_session).delete(logout),
        )
}

/// Log in with a plain text password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Session),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No such user")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<Session>> {
    let user = state
        .users
        .get_user_by_name(&payload.user_name)?
        .ok_or_not_found()?;

    if !Password::from_hash(user.password_hash.clone()).verify(&payload.password) {
        return Err(AppError::InvalidCredentials);
    }

    open_session(&state, user.id, &user.user_name)
}

/// Log in with an already-hashed password
#[utoipa::path(
    post,
    path = "/auth/login/hash",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Session),
        (status = 401, description = "Wrong password hash"),
        (status = 404, description = "No such user")
    )
)]
pub async fn login_hash(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<Session>> {
    let user = state
        .users
        .get_user_by_name(&payload.user_name)?
        .ok_or_not_found()?;

    if !Password::from_hash(user.password_hash.clone()).matches_hash(&payload.password) {
        return Err(AppError::InvalidCredentials);
    }

    open_session(&state, user.id, &user.user_name)
}

/// Check whether the user's session is still valid (not expired)
#[utoipa::path(
    get,
    path = "/auth/{username}",
    tag = "Authentication",
    params(("username" = String, Path, description = "User name the session was issued for")),
    responses(
        (status = 200, description = "Whether the session is still valid", body = bool),
        (status = 404, description = "No session for that user")
    )
)]
pub async fn session_status(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<bool>> {
    let session = state
        .sessions
        .get_session_by_user(&username)?
        .ok_or_not_found()?;

    Ok(Json(!state.sessions.is_expired(&session)))
}

/// Refresh the user's session, restarting its lifetime
#[utoipa::path(
    put,
    path = "/auth/{username}",
    tag = "Authentication",
    params(("username" = String, Path, description = "User name to refresh the session for")),
    responses(
        (status = 200, description = "Freshly timestamped session", body = Session),
        (status = 404, description = "No such user")
    )
)]
pub async fn refresh_session(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Session>> {
    let user = state.users.get_user_by_name(&username)?.ok_or_not_found()?;

    open_session(&state, user.id, &user.user_name)
}

/// Log out, deleting the user's session
#[utoipa::path(
    delete,
    path = "/auth/{username}",
    tag = "Authentication",
    params(("username" = String, Path, description = "User name to log out")),
    responses(
        (status = 200, description = "The deleted session", body = Session),
        (status = 404, description = "No session for that user")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Session>> {
    let session = state
        .sessions
        .get_session_by_user(&username)?
        .ok_or_not_found()?;

    state.sessions.delete_session(session.id)?;
    Ok(Json(session))
}

/// Create (replace) the session for a user who just proved their identity.
fn open_session(state: &AppState, id: u32, user_name: &str) -> AppResult<Json<Session>> {
    let session = state
        .sessions
        .create_session(id, user_name)?
        .ok_or_else(|| AppError::internal("session rejected for a blank user name"))?;

    Ok(Json(session))
}
