// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process NotesExchange API double and recording collaborators.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use notes_exchange_client::services::{Navigation, Navigator, NoticeLevel, Notifier};
use notes_exchange_client::{AuthService, Config, MemoryStorage};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(dead_code)]
pub const STRONG_PASSWORD: &str = "C0bol!rocks";

/// One request as seen by the mock API.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Canned replies keyed by `"METHOD /path"`, plus a log of every request.
#[derive(Default)]
pub struct MockState {
    replies: Mutex<HashMap<String, (u16, Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delays: Mutex<HashMap<String, Duration>>,
}

#[allow(dead_code)]
impl MockState {
    /// Override the reply for `method path`.
    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), (status, body));
    }

    /// Hold replies to `method path` for `delay`.
    pub fn delay(&self, method: Method, path: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), delay);
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }

    pub fn total_hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Profile the mock API hands out by default.
#[allow(dead_code)]
pub fn sample_user() -> Value {
    json!({
        "_id": "65f1c0ffee",
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "profilePicture": "https://cdn.example.com/grace.png",
        "creator": false,
        "premium": false,
        "blocked": false
    })
}

/// Start the mock API on an ephemeral port.
pub async fn start_mock_api() -> MockApi {
    let state = Arc::new(MockState::default());
    install_default_replies(&state);

    let app = Router::new().fallback(handle).with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock API");
    let addr = listener.local_addr().expect("Mock API has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock API crashed");
    });

    MockApi {
        base_url: format!("http://{}", addr),
        state,
    }
}

fn install_default_replies(state: &MockState) {
    let mut premium_user = sample_user();
    premium_user["premium"] = json!(true);
    premium_user["premiumExpiresAt"] = json!("2099-01-31T00:00:00Z");

    let mut renamed_user = sample_user();
    renamed_user["name"] = json!("Amazing Grace");

    state.reply(
        Method::POST,
        "/api/user/login",
        200,
        json!({ "token": "access-1", "refreshToken": "refresh-1", "user": sample_user() }),
    );
    state.reply(
        Method::GET,
        "/api/user/profile",
        200,
        json!({ "success": true, "user": sample_user() }),
    );
    state.reply(
        Method::POST,
        "/api/user/refresh-token",
        200,
        json!({ "token": "access-2" }),
    );
    state.reply(
        Method::POST,
        "/api/user/register",
        201,
        json!({ "success": true }),
    );
    state.reply(
        Method::PUT,
        "/api/user/update-name",
        200,
        json!({ "success": true, "user": renamed_user }),
    );
    state.reply(
        Method::POST,
        "/api/user/premium",
        200,
        json!({ "success": true, "user": premium_user }),
    );
    state.reply(
        Method::POST,
        "/api/5839201/login",
        200,
        json!({ "success": true, "token": "admin-1" }),
    );
    state.reply(Method::GET, "/api/5839201/users", 200, json!({ "users": [] }));
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let key = format!("{} {}", method, uri.path());
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let delay = state.delays.lock().unwrap().get(&key).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let reply = state.replies.lock().unwrap().get(&key).cloned();
    match reply {
        Some((status, body)) => (
            StatusCode::from_u16(status).expect("Invalid mock status"),
            Json(body),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "msg": "Not mocked" }))).into_response(),
    }
}

/// Notifier that remembers every notice.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|(_, m)| m).collect()
    }

    pub fn count(&self, message: &str) -> usize {
        self.messages().iter().filter(|m| *m == message).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Navigator that remembers every move.
#[derive(Default)]
pub struct RecordingNavigator {
    moves: Mutex<Vec<Navigation>>,
}

#[allow(dead_code)]
impl RecordingNavigator {
    pub fn moves(&self) -> Vec<Navigation> {
        self.moves.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Navigation> {
        self.moves().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: Navigation) {
        self.moves.lock().unwrap().push(to);
    }
}

/// An auth service wired to a mock API, with handles on its collaborators.
#[allow(dead_code)]
pub struct TestClient {
    pub auth: AuthService,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

/// Build a client against `api` with empty in-memory storage.
#[allow(dead_code)]
pub fn client_for(api: &MockApi) -> TestClient {
    let config = Config {
        api_base_url: api.base_url.clone(),
        ..Config::default()
    };
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let auth = AuthService::from_config(
        &config,
        Arc::new(MemoryStorage::default()),
        notifier.clone(),
        navigator.clone(),
    );

    TestClient {
        auth,
        notifier,
        navigator,
    }
}
