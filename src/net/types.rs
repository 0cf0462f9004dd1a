//! Wire types for the auth endpoints.

use serde::{Deserialize, Serialize};

/// `GET /api/get_csrf_token` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// `POST /api/auth/login` request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /api/auth/login` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub is_admin: bool,
    pub full_name: String,
}

/// `POST /api/auth/register` request body. `dob` is `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub qualification: String,
    pub dob: String,
}

/// Generic `{ "message": ... }` body returned by most endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
