//! In-process stub of the IdeaCenter API for integration tests
//!
//! Serves the five endpoints the suite talks to, enforces the bearer token on
//! the idea routes and counts calls so tests can see how the harness used it.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use ideacenter_common::{messages, paths, ApiEnvelope, AuthRequest, IdeaRecord};
use ideacenter_e2e::HarnessConfig;

pub const STUB_EMAIL: &str = "qa@example.com";
pub const STUB_PASSWORD: &str = "correct-horse";
pub const STUB_TOKEN: &str = "stub.jwt.token";

/// Behaviour switches for failure-path tests
#[derive(Debug, Clone, Copy, Default)]
pub struct StubOptions {
    /// Answer a good login with 200 but a blank `accessToken`
    pub omit_token: bool,

    /// Answer a good login with 200 and a plain-text body
    pub plain_login: bool,

    /// Hang up on the listing request without sending a response
    pub drop_listing: bool,
}

#[derive(Debug, Clone, Serialize)]
struct StoredIdea {
    id: String,
    title: String,
    description: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdeaQuery {
    #[serde(rename = "ideaId")]
    idea_id: String,
}

struct StubState {
    options: StubOptions,
    ideas: RwLock<Vec<StoredIdea>>,
    // Starts well above the known-absent id "123"
    next_id: AtomicU64,
    login_calls: AtomicUsize,
    idea_calls: AtomicUsize,
    rejected_calls: AtomicUsize,
}

/// Handle to a running stub server. The server stops when this drops.
pub struct StubApi {
    pub base_url: String,
    state: Arc<StubState>,
    server: tokio::task::JoinHandle<()>,
}

impl StubApi {
    pub async fn start() -> Self {
        Self::start_with(StubOptions::default()).await
    }

    pub async fn start_with(options: StubOptions) -> Self {
        let state = Arc::new(StubState {
            options,
            ideas: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1000),
            login_calls: AtomicUsize::new(0),
            idea_calls: AtomicUsize::new(0),
            rejected_calls: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route(paths::AUTHENTICATION, post(login_handler))
            .route(paths::IDEA_CREATE, post(create_handler))
            .route(paths::IDEA_ALL, get(list_handler))
            .route(paths::IDEA_EDIT, put(edit_handler))
            .route(paths::IDEA_DELETE, delete(delete_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub api");
        let addr = listener.local_addr().expect("stub api local addr");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    /// Config that logs in with the stub's credentials
    pub fn login_config(&self) -> HarnessConfig {
        HarnessConfig {
            base_url: self.base_url.clone(),
            email: Some(STUB_EMAIL.to_string()),
            password: Some(STUB_PASSWORD.to_string()),
            ..Default::default()
        }
    }

    /// Config that presents a pre-issued token
    pub fn token_config(&self, token: &str) -> HarnessConfig {
        HarnessConfig {
            base_url: self.base_url.clone(),
            static_token: Some(token.to_string()),
            ..Default::default()
        }
    }

    pub async fn seed(&self, title: &str) -> String {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.state.ideas.write().await.push(StoredIdea {
            id: id.clone(),
            title: title.to_string(),
            description: "seeded".to_string(),
            url: None,
        });
        id
    }

    pub async fn idea_ids(&self) -> Vec<String> {
        self.state
            .ideas
            .read()
            .await
            .iter()
            .map(|i| i.id.clone())
            .collect()
    }

    pub async fn title_of(&self, id: &str) -> Option<String> {
        self.state
            .ideas
            .read()
            .await
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.title.clone())
    }

    pub fn login_calls(&self) -> usize {
        self.state.login_calls.load(Ordering::SeqCst)
    }

    pub fn idea_calls(&self) -> usize {
        self.state.idea_calls.load(Ordering::SeqCst)
    }

    pub fn rejected_calls(&self) -> usize {
        self.state.rejected_calls.load(Ordering::SeqCst)
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn authorize(state: &StubState, headers: &HeaderMap) -> Result<(), Response> {
    state.idea_calls.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {}", STUB_TOKEN);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => {
            state.rejected_calls.fetch_add(1, Ordering::SeqCst);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Missing or invalid authorization header"})),
            )
                .into_response())
        }
    }
}

fn no_such_idea() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiEnvelope::message(messages::NO_SUCH_IDEA)),
    )
        .into_response()
}

async fn login_handler(
    State(state): State<Arc<StubState>>,
    Json(req): Json<AuthRequest>,
) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);

    if req.email != STUB_EMAIL || req.password != STUB_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::message("Invalid email or password")),
        )
            .into_response();
    }

    if state.options.plain_login {
        return (StatusCode::OK, "Welcome back!").into_response();
    }

    let token = if state.options.omit_token { "" } else { STUB_TOKEN };
    (
        StatusCode::OK,
        Json(serde_json::json!({"username": "qa", "email": req.email, "accessToken": token})),
    )
        .into_response()
}

async fn create_handler(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(req): Json<IdeaRecord>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    if !req.has_required_fields() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "title": "One or more validation errors occurred.",
                "status": 400,
            })),
        )
            .into_response();
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst).to_string();
    state.ideas.write().await.push(StoredIdea {
        id,
        title: req.title,
        description: req.description,
        url: req.url,
    });

    (StatusCode::OK, Json(ApiEnvelope::message(messages::CREATED))).into_response()
}

async fn list_handler(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    if state.options.drop_listing {
        // Unwinding the connection task closes the socket mid-request.
        // `resume_unwind` skips the panic hook, so nothing is printed.
        std::panic::resume_unwind(Box::new("listing connection dropped"));
    }

    let ideas = state.ideas.read().await.clone();
    (StatusCode::OK, Json(ideas)).into_response()
}

async fn edit_handler(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<IdeaQuery>,
    Json(req): Json<IdeaRecord>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let mut ideas = state.ideas.write().await;
    match ideas.iter_mut().find(|i| i.id == query.idea_id) {
        Some(idea) => {
            idea.title = req.title;
            idea.description = req.description;
            idea.url = req.url;
            (StatusCode::OK, Json(ApiEnvelope::message(messages::EDITED))).into_response()
        }
        None => no_such_idea(),
    }
}

async fn delete_handler(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<IdeaQuery>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let mut ideas = state.ideas.write().await;
    match ideas.iter().position(|i| i.id == query.idea_id) {
        Some(index) => {
            ideas.remove(index);
            (StatusCode::OK, Json(messages::DELETED)).into_response()
        }
        None => no_such_idea(),
    }
}
