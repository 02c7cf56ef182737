//! User and basket handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{BasketNeed, CreateUser, Need, UpdateUser, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/username/:username", get(get_user_by_name))
        .route(
            "/:id/basket",
            get(get_basket).put(add_basket_need).delete(remove_basket_need),
        )
        .route("/:id/basket/:count", put(edit_basket_count))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User name or id already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if state.users.user_exists(&payload.user_name, payload.id)? {
        return Err(AppError::conflict("User"));
    }

    let user = state.users.create_user(payload)?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get a user by id (own session or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = u32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user(id)?.ok_or_not_found()?;

    let session = state.sessions.get_session_by_user(&user.user_name)?;
    if !state
        .sessions
        .is_authorized(session, Some(user.user_name.clone()), true)?
    {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(UserResponse::from(user)))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "No active admin session")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    if !state.sessions.is_authorized(None, None, true)? {
        return Err(AppError::Unauthorized);
    }

    let users = state.users.get_all_users()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Update a user (own session or admin)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = u32, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "No such user"),
        (status = 409, description = "User name belongs to someone else")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let session = state.sessions.get_session(id)?;
    if !state.sessions.is_authorized_by_id(session, id, true)? {
        return Err(AppError::Unauthorized);
    }

    if let Some(other) = state.users.get_user_by_name(&payload.user_name)? {
        if other.id != id {
            return Err(AppError::conflict("User name"));
        }
    }

    let updated = state.users.update_user(id, payload)?.ok_or_not_found()?;
    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user (own session or admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = u32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<StatusCode> {
    let user = state.users.get_user(id)?.ok_or_not_found()?;

    let session = state.sessions.get_session_by_user(&user.user_name)?;
    if !state
        .sessions
        .is_authorized(session, Some(user.user_name.clone()), true)?
    {
        return Err(AppError::Unauthorized);
    }

    if state.users.delete_user(id)? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::NotFound)
    }
}

/// Get a user by name
#[utoipa::path(
    get,
    path = "/users/username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user_by_name(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user_by_name(&username)?.ok_or_not_found()?;
    Ok(Json(UserResponse::from(user)))
}

/// Get a user's basket (own session only)
#[utoipa::path(
    get,
    path = "/users/{id}/basket",
    tag = "Baskets",
    params(("id" = u32, Path, description = "User id")),
    responses(
        (status = 200, description = "The basket", body = [BasketNeed]),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_basket(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Vec<BasketNeed>>> {
    authorize_self(&state, id)?;

    let basket = state.users.get_basket(id)?.ok_or_not_found()?;
    Ok(Json(basket))
}

/// Add a need to a user's basket (own session only)
#[utoipa::path(
    put,
    path = "/users/{id}/basket",
    tag = "Baskets",
    params(("id" = u32, Path, description = "User id")),
    request_body = Need,
    responses(
        (status = 201, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "No such user"),
        (status = 409, description = "Need already in the basket")
    )
)]
pub async fn add_basket_need(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(need): Json<Need>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    authorize_self(&state, id)?;

    state.users.get_user(id)?.ok_or_not_found()?;
    if state.users.need_in_basket(id, need.id)? {
        return Err(AppError::conflict("Need"));
    }

    let updated = state.users.add_need(id, need)?.ok_or_not_found()?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(updated))))
}

/// Set the count of a basket line (own session only)
#[utoipa::path(
    put,
    path = "/users/{id}/basket/{count}",
    tag = "Baskets",
    params(
        ("id" = u32, Path, description = "User id"),
        ("count" = i32, Path, description = "New count for the basket line")
    ),
    request_body = Need,
    responses(
        (status = 201, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "No such user or need not in the basket")
    )
)]
pub async fn edit_basket_count(
    State(state): State<AppState>,
    Path((id, count)): Path<(u32, i32)>,
    Json(need): Json<Need>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    authorize_self(&state, id)?;

    state.users.get_user(id)?.ok_or_not_found()?;
    if !state.users.need_in_basket(id, need.id)? {
        return Err(AppError::NotFound);
    }

    let updated = state
        .users
        .edit_count(id, need.id, count)?
        .ok_or_not_found()?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(updated))))
}

/// Remove a need from a user's basket (own session only)
#[utoipa::path(
    delete,
    path = "/users/{id}/basket",
    tag = "Baskets",
    params(("id" = u32, Path, description = "User id")),
    request_body = Need,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authorized"),
        (status = 404, description = "No such user or need not in the basket")
    )
)]
pub async fn remove_basket_need(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(need): Json<Need>,
) -> AppResult<Json<UserResponse>> {
    authorize_self(&state, id)?;

    state.users.get_user(id)?.ok_or_not_found()?;
    if !state.users.need_in_basket(id, need.id)? {
        return Err(AppError::NotFound);
    }

    let updated = state.users.remove_need(id, need.id)?.ok_or_not_found()?;
    Ok(Json(UserResponse::from(updated)))
}

/// Basket operations accept only the owner's session — no admin override.
fn authorize_self(state: &AppState, id: u32) -> AppResult<()> {
    let session = state.sessions.get_session(id)?;
    if state.sessions.is_authorized_by_id(session, id, false)? {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}
