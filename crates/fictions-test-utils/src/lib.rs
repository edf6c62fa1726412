//! Testing utilities for the Fictions workspace.
//!
//! [`MockBackend`] is an in-process axum server speaking the fictions REST API.
//! It keeps users, tokens and records in memory, records every request it sees
//! (method, path, auth and content-type headers), and can be told to fail the
//! next request with an arbitrary status and body.

#![allow(missing_docs)]

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fictions_core::fiction::{FictionRecord, Genre};
use fictions_core::user::UserProfile;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub const TIMESTAMP: &str = "2024-12-04T10:00:00";

/// A request as observed by the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

struct StoredUser {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct BackendState {
    users: Mutex<Vec<StoredUser>>,
    tokens: Mutex<HashMap<String, String>>,
    fictions: Mutex<Vec<FictionRecord>>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_failure: Mutex<Option<(StatusCode, String)>>,
    next_id: AtomicU64,
}

impl BackendState {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn issue_token(&self, user_id: &str) -> String {
        let token = format!("token-{}", self.next_id());
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user_id.to_string());
        token
    }

    fn insert_user(&self, username: &str, email: &str, password: &str) -> UserProfile {
        let profile = UserProfile {
            id: format!("u{}", self.next_id()),
            username: username.to_string(),
            email: email.to_string(),
            created_at: Some(TIMESTAMP.to_string()),
        };
        self.users.lock().unwrap().push(StoredUser {
            profile: profile.clone(),
            password: password.to_string(),
        });
        profile
    }
}

/// Handle to a running mock backend. The server stops when the handle is dropped.
pub struct MockBackend {
    base_url: String,
    state: Arc<BackendState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Binds to an ephemeral port on 127.0.0.1 and starts serving.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend server");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Registers a user directly, bypassing the API.
    pub fn add_user(&self, username: &str, email: &str, password: &str) -> UserProfile {
        self.state.insert_user(username, email, password)
    }

    /// Issues a valid token for an existing user without a login request.
    pub fn issue_token(&self, user_id: &str) -> String {
        self.state.issue_token(user_id)
    }

    /// Stores a record directly, bypassing the API.
    pub fn insert_fiction(&self, record: FictionRecord) {
        self.state.fictions.lock().unwrap().push(record);
    }

    pub fn fictions(&self) -> Vec<FictionRecord> {
        self.state.fictions.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.lock().unwrap().last().cloned()
    }

    /// Makes the next request fail with `status` and the raw `body`.
    pub fn fail_next(&self, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        *self.state.next_failure.lock().unwrap() = Some((status, body.into()));
    }

    /// Invalidates every issued token, as an expiry would.
    pub fn revoke_tokens(&self) {
        self.state.tokens.lock().unwrap().clear();
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/fictions/", get(list_fictions).post(create_fiction))
        .route(
            "/api/fictions/{id}",
            get(get_fiction).put(update_fiction).delete(delete_fiction),
        )
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(
    State(state): State<Arc<BackendState>>,
    request: Request,
    next: Next,
) -> Response {
    // The request borrow must end before `next.run` takes ownership of it.
    let recorded = {
        let header_value = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    state.requests.lock().unwrap().push(recorded);

    let failure = state.next_failure.lock().unwrap().take();
    if let Some((status, body)) = failure {
        return (status, body).into_response();
    }
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn field_error(field: &str, message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{ "loc": ["body", field], "msg": message, "type": "value_error" }]
        })),
    )
        .into_response()
}

fn string_field(body: &Value, name: &str) -> Option<String> {
    body.get(name).and_then(Value::as_str).map(String::from)
}

/// Resolves the bearer token to a user id.
fn authenticate(state: &BackendState, headers: &HeaderMap) -> Result<String, Response> {
    let Some(raw) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Err(detail(StatusCode::FORBIDDEN, "Not authenticated"));
    };
    let token = raw.strip_prefix("Bearer ").unwrap_or_default();
    state
        .tokens
        .lock()
        .unwrap()
        .get(token)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

fn auth_response(token: String, user: UserProfile) -> Value {
    json!({ "token": token, "token_type": "bearer", "user": user })
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    let email = string_field(&body, "email").unwrap_or_default();
    let password = string_field(&body, "password").unwrap_or_default();

    let profile = state
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.profile.email == email && u.password == password)
        .map(|u| u.profile.clone());

    match profile {
        Some(user) => {
            let token = state.issue_token(&user.id);
            Json(auth_response(token, user)).into_response()
        }
        None => detail(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn register(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    let username = string_field(&body, "username").unwrap_or_default();
    let email = string_field(&body, "email").unwrap_or_default();
    let password = string_field(&body, "password").unwrap_or_default();

    if password.chars().count() < 6 {
        return field_error("password", "Password must be at least 6 characters");
    }
    {
        let users = state.users.lock().unwrap();
        if users.iter().any(|u| u.profile.email == email) {
            return detail(StatusCode::BAD_REQUEST, "Email already registered");
        }
        if users.iter().any(|u| u.profile.username == username) {
            return detail(StatusCode::BAD_REQUEST, "Username already taken");
        }
    }

    let user = state.insert_user(&username, &email, &password);
    let token = state.issue_token(&user.id);
    (StatusCode::CREATED, Json(auth_response(token, user))).into_response()
}

async fn list_fictions(State(state): State<Arc<BackendState>>) -> Response {
    let fictions = state.fictions.lock().unwrap().clone();
    Json(fictions).into_response()
}

async fn get_fiction(State(state): State<Arc<BackendState>>, Path(id): Path<String>) -> Response {
    let found = state
        .fictions
        .lock()
        .unwrap()
        .iter()
        .find(|f| f.id == id)
        .cloned();
    match found {
        Some(record) => Json(record).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Fiction not found"),
    }
}

/// Validates one optional field; `Ok(None)` when absent.
fn checked(
    body: &Value,
    name: &str,
    min: usize,
    max: Option<usize>,
) -> Result<Option<String>, Response> {
    let Some(value) = string_field(body, name) else {
        return Ok(None);
    };
    let len = value.chars().count();
    if len < min {
        return Err(field_error(name, "String should have at least 1 character"));
    }
    if max.is_some_and(|max| len > max) {
        return Err(field_error(name, "String is too long"));
    }
    Ok(Some(value))
}

struct FieldUpdate {
    title: Option<String>,
    author: Option<String>,
    genre: Option<Genre>,
    description: Option<String>,
    content: Option<String>,
}

fn parse_fields(body: &Value) -> Result<FieldUpdate, Response> {
    let genre = match string_field(body, "genre") {
        Some(raw) => Some(Genre::parse(&raw).map_err(|e| field_error("genre", &e.to_string()))?),
        None => None,
    };
    Ok(FieldUpdate {
        title: checked(body, "title", 1, Some(200))?,
        author: checked(body, "author", 1, Some(100))?,
        genre,
        description: checked(body, "description", 0, Some(500))?,
        content: checked(body, "content", 1, None)?,
    })
}

async fn create_fiction(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let fields = match parse_fields(&body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    let (Some(title), Some(author), Some(genre), Some(description), Some(content)) = (
        fields.title,
        fields.author,
        fields.genre,
        fields.description,
        fields.content,
    ) else {
        return field_error("body", "Field required");
    };

    let record = FictionRecord {
        id: format!("f{}", state.next_id()),
        title,
        author,
        genre,
        description,
        content,
        created_by: user_id,
        created_at: Some(TIMESTAMP.to_string()),
        updated_at: Some(TIMESTAMP.to_string()),
    };
    state.fictions.lock().unwrap().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_fiction(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let fields = match parse_fields(&body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let mut fictions = state.fictions.lock().unwrap();
    let Some(record) = fictions
        .iter_mut()
        .find(|f| f.id == id && f.created_by == user_id)
    else {
        return detail(
            StatusCode::NOT_FOUND,
            "Fiction not found or you don't have permission to update it",
        );
    };

    let mut changed = false;
    if let Some(v) = fields.title {
        record.title = v;
        changed = true;
    }
    if let Some(v) = fields.author {
        record.author = v;
        changed = true;
    }
    if let Some(v) = fields.genre {
        record.genre = v;
        changed = true;
    }
    if let Some(v) = fields.description {
        record.description = v;
        changed = true;
    }
    if let Some(v) = fields.content {
        record.content = v;
        changed = true;
    }
    if !changed {
        return detail(StatusCode::BAD_REQUEST, "No fields to update");
    }
    record.updated_at = Some("2024-12-05T10:00:00".to_string());
    Json(record.clone()).into_response()
}

async fn delete_fiction(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut fictions = state.fictions.lock().unwrap();
    let before = fictions.len();
    fictions.retain(|f| !(f.id == id && f.created_by == user_id));
    if fictions.len() == before {
        return detail(
            StatusCode::NOT_FOUND,
            "Fiction not found or you don't have permission to delete it",
        );
    }
    Json(json!({ "message": "Fiction deleted successfully" })).into_response()
}
