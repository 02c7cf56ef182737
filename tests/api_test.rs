//! Integration tests for the HTTP surface.
//!
//! These drive the full router against real file-backed stores in a
//! temporary directory; only the chat proxy is replaced with a scripted
//! stand-in so no network is involved.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use cupboard_api::api::{create_router, AppState};
use cupboard_api::domain::ChatPersonality;
use cupboard_api::errors::AppResult;
use cupboard_api::infra::{
    ChatRepository, CupboardFileStore, SessionFileStore, UserFileStore,
};

// =============================================================================
// Test Harness
// =============================================================================

/// Chat double that answers without talking to any upstream API.
#[derive(Default)]
struct ScriptedChat {
    chats: Mutex<HashSet<u32>>,
}

#[async_trait]
impl ChatRepository for ScriptedChat {
    fn personalities(&self) -> Vec<ChatPersonality> {
        vec![ChatPersonality::new(1, "BuzzBuddy", "bee helper")]
    }

    fn chat_exists(&self, id: u32) -> bool {
        self.chats.lock().contains(&id)
    }

    async fn generate_chat(
        &self,
        id: u32,
        _personality: ChatPersonality,
    ) -> AppResult<Option<u32>> {
        let mut chats = self.chats.lock();
        if !chats.insert(id) {
            return Ok(None);
        }
        Ok(Some(id))
    }

    async fn submit_chat(&self, id: u32, message: String) -> AppResult<Option<String>> {
        if !self.chat_exists(id) {
            return Ok(None);
        }
        Ok(Some(format!("echo: {}", message)))
    }

    fn delete_chat(&self, id: u32) -> bool {
        self.chats.lock().remove(&id)
    }
}

fn test_app(dir: &TempDir) -> Router {
    let state = AppState::new(
        Arc::new(SessionFileStore::new(dir.path().join("sessions.json")).unwrap()),
        Arc::new(UserFileStore::new(dir.path().join("users.json")).unwrap()),
        Arc::new(CupboardFileStore::new(dir.path().join("cupboard.json")).unwrap()),
        Arc::new(ScriptedChat::default()),
    );
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user and return its id.
async fn register(app: &Router, user_name: &str, password: &str) -> u32 {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(json!({ "user_name": user_name, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().unwrap() as u32
}

/// Log a registered user in, opening their session.
async fn login(app: &Router, user_name: &str, password: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/auth/login",
        Some(json!({ "user_name": user_name, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Root & Health
// =============================================================================

#[tokio::test]
async fn test_root_greeting() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Welcome to the Cupboard API");
}

#[tokio::test]
async fn test_health_reports_healthy_stores() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["stores"]["users"]["status"], "healthy");
}

// =============================================================================
// Users & Authentication
// =============================================================================

#[tokio::test]
async fn test_create_user_then_duplicate_name_conflicts() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "user_name": "JohnDeer", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_name"], "JohnDeer");
    assert_eq!(body["role"], "HELPER");

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "user_name": "JohnDeer", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_response_has_no_password_hash() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "user_name": "JohnDeer", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_rejects_blank_name() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "user_name": "", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_lifecycle() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let id = register(&app, "JohnDeer", "hunter2").await;

    // Unknown user
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "user_name": "nobody", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Wrong password
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "user_name": "JohnDeer", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Success opens a session keyed by the user's id
    let (status, session) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "user_name": "JohnDeer", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["id"].as_u64().unwrap() as u32, id);
    assert_eq!(session["user_name"], "JohnDeer");

    // The session answers as valid
    let (status, valid) = send(&app, "GET", "/auth/JohnDeer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(valid, Value::Bool(true));

    // Logout removes it
    let (status, _) = send(&app, "DELETE", "/auth/JohnDeer", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/auth/JohnDeer", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_hash_accepts_the_stored_digest() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    register(&app, "JohnDeer", "hunter2").await;

    let digest = cupboard_api::domain::Password::new("hunter2").into_string();
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login/hash",
        Some(json!({ "user_name": "JohnDeer", "password": digest })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login/hash",
        Some(json!({ "user_name": "JohnDeer", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_user_requires_an_active_session() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let id = register(&app, "JohnDeer", "hunter2").await;

    let (status, _) = send(&app, "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app, "JohnDeer", "hunter2").await;
    let (status, body) = send(&app, "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_name"], "JohnDeer");
}

#[tokio::test]
async fn test_list_users_requires_an_admin_session() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    register(&app, "JohnDeer", "hunter2").await;

    let (status, _) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A non-admin session does not help
    login(&app, "JohnDeer", "hunter2").await;
    let (status, _) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // An active admin session does
    register(&app, "admin", "secret").await;
    login(&app, "admin", "secret").await;
    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_session_reaches_other_users_resources() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let id = register(&app, "JohnDeer", "hunter2").await;
    register(&app, "admin", "secret").await;
    login(&app, "admin", "secret").await;

    // JohnDeer never logged in, yet the admin override authorizes the read
    let (status, _) = send(&app, "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_user_rejects_renaming_onto_taken_name() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let id = register(&app, "JohnDeer", "hunter2").await;
    register(&app, "JaneDoe", "pw").await;
    login(&app, "JohnDeer", "hunter2").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{}", id),
        Some(json!({ "user_name": "JaneDoe", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{}", id),
        Some(json!({ "user_name": "JohnDeer", "password": "", "restricted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restricted"], Value::Bool(true));
}

// =============================================================================
// Baskets
// =============================================================================

fn money(id: u32) -> Value {
    json!({
        "id": id,
        "name": "Money",
        "cost": 100,
        "quantity": 1,
        "type": "funding",
        "description": "Cold hard cash"
    })
}

#[tokio::test]
async fn test_basket_flow() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let id = register(&app, "JohnDeer", "hunter2").await;
    let basket_uri = format!("/users/{}/basket", id);

    // No session: basket access is refused outright
    let (status, _) = send(&app, "GET", &basket_uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app, "JohnDeer", "hunter2").await;

    let (status, body) = send(&app, "GET", &basket_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    // Add a need; the second add of the same id is a conflict
    let (status, body) = send(&app, "PUT", &basket_uri, Some(money(10))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["basket"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "PUT", &basket_uri, Some(money(10))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Removing a need that is not in the basket does not change it
    let (status, _) = send(&app, "DELETE", &basket_uri, Some(money(110))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&app, "GET", &basket_uri, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Removing the right one empties it
    let (status, _) = send(&app, "DELETE", &basket_uri, Some(money(10))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", &basket_uri, None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_edit_count_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let id = register(&app, "JohnDeer", "hunter2").await;
    login(&app, "JohnDeer", "hunter2").await;

    // Editing a need that is not in the basket is not found
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{}/basket/5", id),
        Some(money(10)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "PUT", &format!("/users/{}/basket", id), Some(money(10))).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{}/basket/5", id),
        Some(money(10)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["basket"][0]["count"], 5);
}

#[tokio::test]
async fn test_basket_is_not_reachable_through_the_admin_override() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let id = register(&app, "JohnDeer", "hunter2").await;
    register(&app, "admin", "secret").await;
    login(&app, "admin", "secret").await;

    // Admin session exists, but basket routes ask for the owner's session
    let (status, _) = send(&app, "GET", &format!("/users/{}/basket", id), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Cupboard
// =============================================================================

#[tokio::test]
async fn test_cupboard_mutations_are_admin_gated() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, _) = send(&app, "POST", "/cupboard", Some(money(0))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    register(&app, "admin", "secret").await;
    login(&app, "admin", "secret").await;

    let (status, body) = send(&app, "POST", "/cupboard", Some(money(0))).await;
    assert_eq!(status, StatusCode::OK);
    let need_id = body["id"].as_u64().unwrap();

    // Reads are open
    let (status, body) = send(&app, "GET", &format!("/cupboard/{}", need_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Money");

    let (status, _) = send(&app, "DELETE", &format!("/cupboard/{}", need_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/cupboard/{}", need_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cupboard_name_search_ignores_case() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    register(&app, "admin", "secret").await;
    login(&app, "admin", "secret").await;

    send(
        &app,
        "POST",
        "/cupboard",
        Some(json!({
            "name": "Green TEA",
            "cost": 5,
            "quantity": 10,
            "type": "supplies",
            "description": "for the volunteers"
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/cupboard/name/tea", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // No match answers 404 with an empty list body
    let (status, body) = send(&app, "GET", "/cupboard/name/coffee", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_endpoints() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "GET", "/chat/personalities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // No chat yet
    let (status, body) = send(&app, "GET", "/chat/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(false));

    let personality = json!({ "id": 1, "name": "BuzzBuddy", "description": "bee helper" });
    let (status, body) = send(&app, "POST", "/chat/5", Some(personality.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(5));

    // A second chat for the same user conflicts
    let (status, _) = send(&app, "POST", "/chat/5", Some(personality)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Messages go through the proxy
    let request = Request::builder()
        .method("PUT")
        .uri("/chat/5")
        .body(Body::from("hello bees"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let reply: String = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(reply, "echo: hello bees");

    // Deleting twice: gone after the first
    let (status, body) = send(&app, "DELETE", "/chat/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Bool(true));
    let (status, body) = send(&app, "DELETE", "/chat/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Bool(false));
}
