//! In-process stand-in for the Quizmaster backend used by network tests.
//!
//! Binds `127.0.0.1:0`, records the headers of every request it sees, and
//! mimics the auth endpoints closely enough to drive the session lifecycle.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

pub(crate) const ADMIN_EMAIL: &str = "admin@quizmaster.com";
pub(crate) const ADMIN_PASSWORD: &str = "admin123";
pub(crate) const USER_EMAIL: &str = "student@quizmaster.com";
pub(crate) const USER_PASSWORD: &str = "hunter2";
pub(crate) const TAKEN_EMAIL: &str = "taken@quizmaster.com";
pub(crate) const ISSUED_CSRF_TOKEN: &str = "tok-issued-123";

const SESSION_COOKIE: &str = "session=ok";

/// Headers of one request as seen by the backend.
#[derive(Clone, Debug)]
pub(crate) struct Seen {
    pub path: String,
    pub csrf: Option<String>,
    pub content_type: Option<String>,
    pub cookie: Option<String>,
}

#[derive(Clone, Default)]
pub(crate) struct Observed {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Observed {
    pub(crate) fn all(&self) -> Vec<Seen> {
        self.seen.lock().expect("observed mutex should lock").clone()
    }

    pub(crate) fn last(&self) -> Seen {
        self.all().pop().expect("backend saw no requests")
    }

    fn record(&self, path: &str, headers: &HeaderMap) {
        let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
        let seen = Seen {
            path: path.to_owned(),
            csrf: read("x-csrftoken"),
            content_type: read(header::CONTENT_TYPE.as_str()),
            cookie: read(header::COOKIE.as_str()),
        };
        self.seen.lock().expect("observed mutex should lock").push(seen);
    }
}

/// Start the backend and return its origin plus the request recorder.
pub(crate) async fn spawn() -> (String, Observed) {
    let observed = Observed::default();
    let app = Router::new()
        .route("/ok", get(ok))
        .route("/not-json", get(not_json))
        .route("/status/{code}", get(status))
        .route("/echo", get(ok).put(echo).delete(deleted))
        .route("/ping", get(ping))
        .route("/api/get_csrf_token", get(csrf_token))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/register", post(register))
        .with_state(observed.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("test listener has an address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), observed)
}

/// Origin on which nothing is listening.
pub(crate) async fn dead_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("test listener has an address");
    drop(listener);
    format!("http://{addr}")
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn ok(State(obs): State<Observed>, headers: HeaderMap) -> Json<Value> {
    obs.record("/ok", &headers);
    Json(json!({ "message": "ok" }))
}

async fn not_json(State(obs): State<Observed>, headers: HeaderMap) -> &'static str {
    obs.record("/not-json", &headers);
    "plain text"
}

async fn status(State(obs): State<Observed>, Path(code): Path<u16>, headers: HeaderMap) -> Response {
    obs.record(&format!("/status/{code}"), &headers);
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "message": format!("status {code}") }))).into_response()
}

async fn echo(State(obs): State<Observed>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    obs.record("/echo", &headers);
    Json(body)
}

async fn deleted(State(obs): State<Observed>, headers: HeaderMap) -> Json<Value> {
    obs.record("/echo", &headers);
    Json(json!({ "message": "deleted" }))
}

async fn ping(State(obs): State<Observed>, headers: HeaderMap) -> Json<Value> {
    obs.record("/ping", &headers);
    Json(json!({ "message": "pong" }))
}

async fn csrf_token(State(obs): State<Observed>, headers: HeaderMap) -> Json<Value> {
    obs.record("/api/get_csrf_token", &headers);
    Json(json!({ "csrf_token": ISSUED_CSRF_TOKEN }))
}

async fn login(State(obs): State<Observed>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    obs.record("/api/auth/login", &headers);
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let (is_admin, full_name) = match (email, password) {
        (ADMIN_EMAIL, ADMIN_PASSWORD) => (true, "Admin"),
        (USER_EMAIL, USER_PASSWORD) => (false, "Student"),
        _ => {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))).into_response();
        }
    };

    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
        Json(json!({ "message": "Login successful", "is_admin": is_admin, "full_name": full_name })),
    )
        .into_response()
}

async fn logout(State(obs): State<Observed>, headers: HeaderMap) -> Response {
    obs.record("/api/auth/logout", &headers);
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.split(';').any(|part| part.trim() == SESSION_COOKIE));
    if !has_session {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response();
    }
    Json(json!({ "message": "Logged out successfully" })).into_response()
}

async fn register(State(obs): State<Observed>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    obs.record("/api/auth/register", &headers);
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    if email == TAKEN_EMAIL {
        return (StatusCode::CONFLICT, Json(json!({ "message": "Email already registered" }))).into_response();
    }
    let name = body.get("full_name").and_then(Value::as_str).unwrap_or_default();
    (
        StatusCode::CREATED,
        Json(json!({ "message": format!("Registration successful! Welcome {name}!") })),
    )
        .into_response()
}
