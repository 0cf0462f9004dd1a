//! Auth endpoints that drive the session lifecycle.
//!
//! SYSTEM CONTEXT
//! ==============
//! These are the writers of the session flags: `fetch_csrf_token` caches the
//! anti-forgery token, `login` sets the login/role flags, `logout` clears
//! them. Everything goes through [`ApiClient::send`], so a 401 from any of
//! them triggers the same forced-logout path as any other call.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures surface as [`ApiError`]. A session write failure after a
//! successful call is logged and does not fail the call.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{CsrfTokenResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

const CSRF_TOKEN_ENDPOINT: &str = "/api/get_csrf_token";
const LOGIN_ENDPOINT: &str = "/api/auth/login";
const LOGOUT_ENDPOINT: &str = "/api/auth/logout";
const REGISTER_ENDPOINT: &str = "/api/auth/register";
const PING_ENDPOINT: &str = "/ping";

/// Fetch a fresh anti-forgery token via `GET /api/get_csrf_token` and cache it.
///
/// # Errors
///
/// Returns an error if the request fails or the body lacks `csrf_token`.
pub async fn fetch_csrf_token(client: &ApiClient) -> Result<String, ApiError> {
    let body: CsrfTokenResponse = client.get_json(CSRF_TOKEN_ENDPOINT).await?;
    if let Err(e) = client.session().set_csrf_token(&body.csrf_token) {
        tracing::warn!(error = %e, "failed to cache csrf token");
    }
    Ok(body.csrf_token)
}

/// Log in via `POST /api/auth/login` and record the login and role flags.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for rejected credentials (which also
/// fires the auth-failure hook) or any other request error.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let body: LoginResponse = client.post_json(LOGIN_ENDPOINT, &LoginRequest { email, password }).await?;
    if let Err(e) = client.session().mark_logged_in(body.is_admin) {
        tracing::warn!(error = %e, "failed to record login flags");
    }
    tracing::info!(is_admin = body.is_admin, "logged in");
    Ok(body)
}

/// Log out via `POST /api/auth/logout` and clear the login and role flags.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn logout(client: &ApiClient) -> Result<MessageResponse, ApiError> {
    let body: MessageResponse = client.post_json(LOGOUT_ENDPOINT, &serde_json::json!({})).await?;
    if let Err(e) = client.session().clear_auth() {
        tracing::warn!(error = %e, "failed to clear session flags");
    }
    tracing::info!("logged out");
    Ok(body)
}

/// Log out and drop every cached credential, CSRF token and saved cookie
/// included.
///
/// A 401 means the server session is already gone, so the local session is
/// wiped in that case too before the error is returned.
///
/// # Errors
///
/// Returns the [`logout`] error unchanged.
pub async fn end_session(client: &ApiClient) -> Result<MessageResponse, ApiError> {
    let result = logout(client).await;
    if matches!(result, Ok(_) | Err(ApiError::Unauthorized { .. })) {
        if let Err(e) = client.session().clear_all() {
            tracing::warn!(error = %e, "failed to clear session");
        }
    }
    result
}

/// Create an account via `POST /api/auth/register`.
///
/// # Errors
///
/// Returns [`ApiError::Status`] with 409 when the email is already taken.
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
    client.post_json(REGISTER_ENDPOINT, request).await
}

/// Liveness check via `GET /ping`.
///
/// # Errors
///
/// Returns an error if the backend is unreachable or unhealthy.
pub async fn ping(client: &ApiClient) -> Result<MessageResponse, ApiError> {
    client.get_json(PING_ENDPOINT).await
}
