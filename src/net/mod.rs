//! Networking modules for the Quizmaster REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` owns the single shared HTTP client and its interceptors, `api`
//! wraps the auth endpoints that drive the session lifecycle, `types` defines
//! their wire schema, and `error` the failure taxonomy callers see.

pub mod api;
pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::{ApiClient, AuthFailure, AuthFailureHook, CSRF_HEADER, LOGIN_PATH};
pub use error::ApiError;
