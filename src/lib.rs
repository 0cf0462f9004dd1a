//! # quizmaster-client
//!
//! Client-side plumbing for the Quizmaster quiz-management app: the shared
//! HTTP client with its CSRF and forced-logout interceptors, the route table,
//! and the navigation guard that authorizes every route transition.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` and `router` never call each other. They meet only through the
//! injected [`session::Session`]: the HTTP client clears its flags on a 401,
//! the router reads them before each transition.

pub mod config;
pub mod net;
pub mod router;
pub mod session;
