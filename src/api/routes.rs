//! Application route configuration.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth_routes, chat_routes, cupboard_routes, user_routes};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root and health endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Resource routes
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/cupboard", cupboard_routes())
        .nest("/chat", chat_routes())
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to the Cupboard API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    stores: StoreHealth,
}

/// Individual store health status
#[derive(Serialize)]
struct StoreHealth {
    sessions: StoreStatus,
    users: StoreStatus,
    cupboard: StoreStatus,
}

/// Store status
#[derive(Serialize)]
struct StoreStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StoreStatus {
    fn from_result<T>(result: Result<T, impl std::fmt::Display>) -> Self {
        match result {
            Ok(_) => StoreStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => StoreStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }
}

/// Health check endpoint exercising each store with a cheap read
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let sessions = StoreStatus::from_result(state.sessions.get_session(0));
    let users = StoreStatus::from_result(state.users.get_all_users());
    let cupboard = StoreStatus::from_result(state.cupboard.get_all_needs());

    let all_healthy = [&sessions, &users, &cupboard]
        .iter()
        .all(|store| store.status == "healthy");

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        stores: StoreHealth {
            sessions,
            users,
            cupboard,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
