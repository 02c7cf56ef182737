//! Needs catalog handlers.
//!
//! Every mutating operation is admin-gated: it goes through when an
//! unexpired session for the admin user exists, and through nothing else.
//! Reads are open.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::AppState;
use crate::domain::Need;
use crate::errors::{AppError, AppResult, OptionExt};

/// Create cupboard routes
pub fn cupboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_need).get(list_needs))
        .route("/:id", get(get_need).put(update_need).delete(delete_need))
        .route("/name/:text", get(search_needs))
}

/// Add a need to the catalog (admin only)
#[utoipa::path(
    post,
    path = "/cupboard",
    tag = "Cupboard",
    request_body = Need,
    responses(
        (status = 200, description = "Created need", body = Need),
        (status = 401, description = "No active admin session"),
        (status = 409, description = "A need with that id already exists")
    )
)]
pub async fn create_need(
    State(state): State<AppState>,
    Json(need): Json<Need>,
) -> AppResult<Json<Need>> {
    authorize_admin(&state)?;

    if state.cupboard.need_exists(&need)? {
        return Err(AppError::conflict("Need"));
    }

    let created = state.cupboard.create_need(need)?;
    Ok(Json(created))
}

/// Replace a need (admin only)
#[utoipa::path(
    put,
    path = "/cupboard/{id}",
    tag = "Cupboard",
    params(("id" = u32, Path, description = "Need id")),
    request_body = Need,
    responses(
        (status = 200, description = "Updated need", body = Need),
        (status = 401, description = "No active admin session"),
        (status = 404, description = "No such need")
    )
)]
pub async fn update_need(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(need): Json<Need>,
) -> AppResult<Json<Need>> {
    authorize_admin(&state)?;

    if !state.cupboard.need_exists_by_id(id)? {
        return Err(AppError::NotFound);
    }

    let updated = state.cupboard.update_need(id, need)?;
    Ok(Json(updated))
}

/// Delete a need (admin only)
#[utoipa::path(
    delete,
    path = "/cupboard/{id}",
    tag = "Cupboard",
    params(("id" = u32, Path, description = "Need id")),
    responses(
        (status = 200, description = "Need deleted"),
        (status = 401, description = "No active admin session"),
        (status = 404, description = "No such need")
    )
)]
pub async fn delete_need(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<StatusCode> {
    authorize_admin(&state)?;

    if state.cupboard.delete_need(id)? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::NotFound)
    }
}

/// Search needs by name, case-insensitively
#[utoipa::path(
    get,
    path = "/cupboard/name/{text}",
    tag = "Cupboard",
    params(("text" = String, Path, description = "Text the need name must contain")),
    responses(
        (status = 200, description = "Matching needs", body = [Need]),
        (status = 404, description = "No need matched")
    )
)]
pub async fn search_needs(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> AppResult<(StatusCode, Json<Vec<Need>>)> {
    let needs = state.cupboard.search_needs(&text)?;
    let status = if needs.is_empty() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    Ok((status, Json(needs)))
}

/// List the whole catalog
#[utoipa::path(
    get,
    path = "/cupboard",
    tag = "Cupboard",
    responses((status = 200, description = "All needs", body = [Need]))
)]
pub async fn list_needs(State(state): State<AppState>) -> AppResult<Json<Vec<Need>>> {
    Ok(Json(state.cupboard.get_all_needs()?))
}

/// Get a need by id
#[utoipa::path(
    get,
    path = "/cupboard/{id}",
    tag = "Cupboard",
    params(("id" = u32, Path, description = "Need id")),
    responses(
        (status = 200, description = "The need", body = Need),
        (status = 404, description = "No such need")
    )
)]
pub async fn get_need(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Need>> {
    let need = state.cupboard.get_need(id)?.ok_or_not_found()?;
    Ok(Json(need))
}

fn authorize_admin(state: &AppState) -> AppResult<()> {
    if state.sessions.is_authorized(None, None, true)? {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}
