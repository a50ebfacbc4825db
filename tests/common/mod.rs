//! In-process stand-in for the lead management REST API
//!
//! Serves just enough of the API for the client tests, records every request
//! it sees, and exposes knobs for failure and latency.

#![allow(dead_code)]

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kamleads::session::{CredentialStore, MemoryCredentialStore};
use kamleads::ApiClient;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    pub users: Vec<Value>,
    pub passwords: HashMap<String, String>,
    pub tokens: HashMap<String, i64>,
    pub restaurants: Vec<Value>,
    pub contacts: Vec<Value>,
    pub interactions: Vec<Value>,
    pub next_id: i64,
    pub requests: Vec<RecordedRequest>,
    /// Artificial latency for `GET /api/users/:id`, per user id
    pub user_lookup_delay: HashMap<i64, Duration>,
    /// When set, every record POST/PUT fails with 400 and `{field: message}`
    pub reject_writes: Option<(String, String)>,
    /// When set, `GET /api/interactions` answers 502 with an HTML body
    pub broken_interactions: bool,
    /// When set, `GET /api/users/:id` answers 500
    pub failing_user_lookup: bool,
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockApi {
    pub base_url: String,
    pub state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockApi {
    /// Start a server seeded with three users and a little lead data:
    /// 1 = Admin, 2 = Manager, 3 = KAM. Each has token `token-<id>`.
    pub async fn start() -> Self {
        let mut state = MockState {
            next_id: 100,
            ..Default::default()
        };
        for (id, name, role) in [(1, "Alice", "Admin"), (2, "Bob", "Manager"), (3, "Cara", "KAM")] {
            let email = format!("{}@example.com", name.to_lowercase());
            state.users.push(user_json(id, name, &email, role));
            state.passwords.insert(email, "secret".to_string());
            state.tokens.insert(format!("token-{}", id), id);
        }
        state.restaurants.push(json!({
            "id": 10, "name": "Spice Route", "address": "12 Market St",
            "status": "Contacted", "call_frequency": "Weekly", "last_call_date": null
        }));
        state.restaurants.push(json!({
            "id": 11, "name": "Blue Door", "address": null,
            "status": "New", "call_frequency": "Monthly", "last_call_date": "2024-10-01T00:00:00"
        }));
        for (id, name) in [(6, "Ravi"), (7, "Mina"), (8, "Theo")] {
            state.contacts.push(json!({
                "id": id, "name": name, "role": "Owner",
                "email": null, "phone": "555-0100", "restaurant_id": 10
            }));
        }
        state.interactions.push(json!({
            "id": 20, "interaction_date": "2024-10-02T00:00:00", "type": "Call",
            "details": "Intro call", "restaurant_id": 10
        }));

        let shared: Shared = Arc::new(Mutex::new(state));
        let app = router(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state: shared,
            handle,
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.with(|s| s.requests.clone())
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// A client backed by in-memory credentials, optionally pre-seeded
    pub fn client(&self, login_as: Option<i64>) -> (ApiClient, Arc<MemoryCredentialStore>) {
        let credentials = Arc::new(MemoryCredentialStore::new());
        if let Some(id) = login_as {
            credentials
                .save(&kamleads::session::StoredCredentials::new(id, format!("token-{}", id)))
                .unwrap();
        }
        let client = ApiClient::new(&self.base_url, credentials.clone()).unwrap();
        (client, credentials)
    }
}

pub fn user_json(id: i64, name: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "phone": null,
        "role": role,
        "created_at": "2024-11-02T09:15:30.123456",
        "updated_at": "2024-11-02T09:15:30.123456"
    })
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/roles/{id}", get(users_for_role))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user).delete(delete_user))
        .route("/api/restaurants", get(list_restaurants).post(create_restaurant))
        .route(
            "/api/restaurants/{id}",
            get(get_restaurant).put(update_restaurant).delete(delete_restaurant),
        )
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .route(
            "/api/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/api/interactions", get(list_interactions).post(create_interaction))
        .route("/api/metrics/average-interaction-duration", get(average_duration))
        .route("/api/metrics/underperforming", get(underperforming))
        .route("/api/metrics/performance-scores", get(performance_scores))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    // Built in its own scope so no borrow of `req` lives across the await
    let recorded = {
        let headers = req.headers().clone();
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            authorization: header("authorization"),
            content_type: header("content-type"),
        }
    };
    state.lock().unwrap().requests.push(recorded);
    next.run(req).await
}

fn err(status: StatusCode, field: &str, message: &str) -> Response {
    (status, Json(json!({ field: message }))).into_response()
}

/// Resolve the bearer token to a user id, as the JWT layer would
fn authenticate(state: &MockState, headers: &HeaderMap) -> Result<i64, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "msg", "Missing Authorization Header"))?;
    state
        .tokens
        .get(token)
        .copied()
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "msg", "Invalid token"))
}

fn find(records: &[Value], id: i64) -> Option<&Value> {
    records.iter().find(|r| r["id"] == id)
}

fn rejection(state: &MockState) -> Option<Response> {
    state
        .reject_writes
        .as_ref()
        .map(|(field, message)| err(StatusCode::BAD_REQUEST, field, message))
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if s.passwords.contains_key(&email) {
        return err(StatusCode::BAD_REQUEST, "error", "User already exists");
    }
    s.next_id += 1;
    let id = s.next_id;
    let user = user_json(
        id,
        body["name"].as_str().unwrap_or_default(),
        &email,
        body["role"].as_str().unwrap_or("KAM"),
    );
    s.users.push(user);
    s.passwords
        .insert(email, body["password"].as_str().unwrap_or_default().to_string());
    let token = format!("token-{}", id);
    s.tokens.insert(token.clone(), id);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered", "access_token": token, "id": id })),
    )
        .into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let s = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if s.passwords.get(email).map(String::as_str) != Some(password) {
        return err(StatusCode::UNAUTHORIZED, "error", "Invalid credentials");
    }
    let user = s.users.iter().find(|u| u["email"] == email).cloned();
    match user {
        Some(user) => {
            let id = user["id"].as_i64().unwrap_or_default();
            Json(json!({ "access_token": format!("token-{}", id), "id": id })).into_response()
        }
        None => err(StatusCode::UNAUTHORIZED, "error", "Invalid credentials"),
    }
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    Json(Value::Array(s.users.clone())).into_response()
}

async fn users_for_role(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    let Some(current) = find(&s.users, id) else {
        return err(StatusCode::NOT_FOUND, "error", "User not found");
    };
    let visible: Vec<Value> = match current["role"].as_str() {
        Some("Admin") => s.users.clone(),
        Some("Manager") => s
            .users
            .iter()
            .filter(|u| u["role"] != "Admin")
            .cloned()
            .collect(),
        _ => vec![current.clone()],
    };
    Json(Value::Array(visible)).into_response()
}

async fn get_user(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let delay = {
        let s = state.lock().unwrap();
        if let Err(r) = authenticate(&s, &headers) {
            return r;
        }
        if s.failing_user_lookup {
            return err(StatusCode::INTERNAL_SERVER_ERROR, "error", "Database unavailable");
        }
        s.user_lookup_delay.get(&id).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let s = state.lock().unwrap();
    match find(&s.users, id) {
        Some(user) => Json(user.clone()).into_response(),
        None => err(StatusCode::NOT_FOUND, "error", "User not found"),
    }
}

async fn delete_user(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    s.users.retain(|u| u["id"] != id);
    Json(json!({ "message": "User deleted" })).into_response()
}

async fn list_restaurants(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    Json(Value::Array(s.restaurants.clone())).into_response()
}

async fn get_restaurant(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    match find(&s.restaurants, id) {
        Some(r) => {
            let mut detail = r.clone();
            detail["contacts"] = Value::Array(
                s.contacts
                    .iter()
                    .filter(|c| c["restaurant_id"] == id)
                    .cloned()
                    .collect(),
            );
            Json(detail).into_response()
        }
        None => err(StatusCode::NOT_FOUND, "error", "Restaurant not found"),
    }
}

/// Echoes the stored record back
async fn create_restaurant(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    if let Some(r) = rejection(&s) {
        return r;
    }
    s.next_id += 1;
    let mut record = body;
    record["id"] = json!(s.next_id);
    if record.get("status").is_none() {
        record["status"] = json!("New");
    }
    s.restaurants.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_restaurant(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    if let Some(r) = rejection(&s) {
        return r;
    }
    match s.restaurants.iter_mut().find(|r| r["id"] == id) {
        Some(existing) => {
            if let (Some(target), Some(patch)) = (existing.as_object_mut(), body.as_object()) {
                for (k, v) in patch {
                    target.insert(k.clone(), v.clone());
                }
            }
            Json(json!({ "message": "Restaurant updated" })).into_response()
        }
        None => err(StatusCode::NOT_FOUND, "error", "Restaurant not found"),
    }
}

async fn delete_restaurant(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    s.restaurants.retain(|r| r["id"] != id);
    Json(json!({ "message": "Restaurant deleted" })).into_response()
}

async fn list_contacts(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    Json(Value::Array(s.contacts.clone())).into_response()
}

async fn get_contact(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    match find(&s.contacts, id) {
        Some(c) => Json(c.clone()).into_response(),
        None => err(StatusCode::NOT_FOUND, "error", "Contact not found"),
    }
}

/// Replies with an acknowledgement only, like the original server
async fn create_contact(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    if let Some(r) = rejection(&s) {
        return r;
    }
    s.next_id += 1;
    let id = s.next_id;
    let mut record = body;
    record["id"] = json!(id);
    s.contacts.push(record);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Contact created", "id": id })),
    )
        .into_response()
}

/// Replies with the full updated record
async fn update_contact(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    if let Some(r) = rejection(&s) {
        return r;
    }
    match s.contacts.iter_mut().find(|c| c["id"] == id) {
        Some(existing) => {
            if let (Some(target), Some(patch)) = (existing.as_object_mut(), body.as_object()) {
                for (k, v) in patch {
                    target.insert(k.clone(), v.clone());
                }
            }
            Json(existing.clone()).into_response()
        }
        None => err(StatusCode::NOT_FOUND, "error", "Contact not found"),
    }
}

async fn delete_contact(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    if find(&s.contacts, id).is_none() {
        return err(StatusCode::NOT_FOUND, "error", "Contact not found");
    }
    s.contacts.retain(|c| c["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_interactions(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    if s.broken_interactions {
        return (StatusCode::BAD_GATEWAY, "<html><body>Bad Gateway</body></html>").into_response();
    }
    Json(Value::Array(s.interactions.clone())).into_response()
}

async fn create_interaction(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    if let Some(r) = rejection(&s) {
        return r;
    }
    s.next_id += 1;
    let id = s.next_id;
    let mut record = body;
    record["id"] = json!(id);
    s.interactions.push(record);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Interaction created", "id": id })),
    )
        .into_response()
}

async fn average_duration(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    Json(json!([
        { "id": 10, "name": "Spice Route", "average_interaction_duration": 22.5 },
        { "id": 11, "name": "Blue Door", "average_interaction_duration": 0 }
    ]))
    .into_response()
}

async fn underperforming(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    Json(json!([
        { "id": 11, "name": "Blue Door", "time_since_last_interaction": 45 },
        { "id": 12, "name": "Quiet Corner", "time_since_last_interaction": null }
    ]))
    .into_response()
}

async fn performance_scores(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().unwrap();
    if let Err(r) = authenticate(&s, &headers) {
        return r;
    }
    Json(json!([
        { "id": 10, "name": "Spice Route", "performance_score": 1.6 }
    ]))
    .into_response()
}
