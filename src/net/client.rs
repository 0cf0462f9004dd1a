//! Shared HTTP client with request/response interceptors.
//!
//! DESIGN
//! ======
//! Every backend call goes through [`ApiClient::send`], which runs the two
//! interceptors around a single `reqwest` execution:
//! - request side: attach `X-CSRFToken` from the session when one is cached;
//! - response side: non-2xx becomes an error, and a 401 additionally clears
//!   the login flags and notifies the auth-failure hook.
//!
//! Credentials ride along on every request: a cookie jar natively,
//! `credentials: include` on wasm.
//!
//! The hook replaces a hard-wired page redirect so the hosting shell decides
//! how "go to /login" happens (browser navigation, CLI notice, test probe).
//!
//! ERROR HANDLING
//! ==============
//! Nothing is retried. The 401 path is the only one with a side effect; all
//! other failures reach the caller unchanged.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::config::ClientConfig;
use crate::session::Session;

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const LOGIN_PATH: &str = "/login";

/// Notification emitted when the backend rejects the session with a 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    /// Screen the shell should navigate to.
    pub redirect: &'static str,
    /// Request that triggered the failure.
    pub url: String,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unauthenticated request to {}; redirect to {}", self.url, self.redirect)
    }
}

/// Subscriber for [`AuthFailure`] events.
pub type AuthFailureHook = Arc<dyn Fn(&AuthFailure) + Send + Sync>;

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Session,
    on_auth_failure: Option<AuthFailureHook>,
    #[cfg(not(target_arch = "wasm32"))]
    cookies: Arc<Jar>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("session", &self.session)
            .field("on_auth_failure", &self.on_auth_failure.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build the shared client: JSON content type, credentials on every
    /// request, optional timeouts from `config`.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let builder = reqwest::Client::builder().default_headers(headers);

        #[cfg(not(target_arch = "wasm32"))]
        let cookies = Arc::new(Jar::default());
        #[cfg(not(target_arch = "wasm32"))]
        let builder = {
            let mut builder = builder.cookie_provider(Arc::clone(&cookies));
            if let Some(secs) = config.request_timeout_secs {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            if let Some(secs) = config.connect_timeout_secs {
                builder = builder.connect_timeout(Duration::from_secs(secs));
            }
            builder
        };

        let http = builder.build().map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            config: config.clone(),
            session,
            on_auth_failure: None,
            #[cfg(not(target_arch = "wasm32"))]
            cookies,
        })
    }

    /// Subscribe to forced-logout notifications.
    #[must_use]
    pub fn with_auth_failure_hook(mut self, hook: AuthFailureHook) -> Self {
        self.on_auth_failure = Some(hook);
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `Cookie` header the client would send to the backend origin.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.config.base_url).ok()?;
        let value = self.cookies.cookies(&url)?;
        value.to_str().ok().map(str::to_owned)
    }

    /// Seed the cookie jar from a previously saved `Cookie` header.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn restore_cookies(&self, header: &str) -> Result<(), ApiError> {
        let url = reqwest::Url::parse(&self.config.base_url).map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        for cookie in header.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.cookies.add_cookie_str(&format!("{cookie}; Path=/"), &url);
        }
        Ok(())
    }

    /// Start a request against `path` on the configured origin.
    #[allow(clippy::let_and_return)]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.config.url(path));
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();
        builder
    }

    /// Run the interceptors around one request/response exchange.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = builder.build()?;
        apply_csrf_header(request.headers_mut(), self.session.csrf_token().as_deref())?;

        let url = request.url().to_string();
        tracing::debug!(method = %request.method(), %url, "api request");

        let result = self.http.execute(request).await;
        self.intercept_response(&url, result).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        decode(response).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        decode(response).await
    }

    async fn intercept_response(
        &self,
        url: &str,
        result: Result<Response, reqwest::Error>,
    ) -> Result<Response, ApiError> {
        let response = result?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            self.force_logout(url);
            return Err(ApiError::Unauthorized { redirect: LOGIN_PATH, body });
        }

        tracing::debug!(status = status.as_u16(), %url, "api request rejected");
        Err(ApiError::Status { status: status.as_u16(), body })
    }

    fn force_logout(&self, url: &str) {
        tracing::warn!(%url, redirect = LOGIN_PATH, "unauthenticated response; clearing session");
        if let Err(e) = self.session.clear_auth() {
            tracing::warn!(error = %e, "failed to clear session flags");
        }
        if let Some(hook) = &self.on_auth_failure {
            hook(&AuthFailure { redirect: LOGIN_PATH, url: url.to_owned() });
        }
    }
}

// =============================================================================
// INTERCEPTOR HELPERS
// =============================================================================

/// Attach the anti-forgery header when a token is cached; otherwise no-op.
pub fn apply_csrf_header(headers: &mut HeaderMap, token: Option<&str>) -> Result<(), ApiError> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(());
    };
    let value = HeaderValue::from_str(token)?;
    headers.insert(HeaderName::from_static("x-csrftoken"), value);
    Ok(())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Hook that performs a full page navigation to the redirect target.
#[cfg(feature = "hydrate")]
#[must_use]
pub fn browser_redirect_hook() -> AuthFailureHook {
    Arc::new(|failure: &AuthFailure| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(failure.redirect);
        }
    })
}
