//! Session flags shared by the HTTP client and the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login flow writes these flags, the response interceptor clears them on
//! a 401, and the router reads them before every transition. Both consumers
//! receive the same [`Session`] handle instead of touching ambient storage.
//!
//! DESIGN
//! ======
//! Flags are stored as strings under fixed keys so that the on-disk and
//! browser `localStorage` layouts match: booleans are `"true"` or absent.

pub mod storage;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::sync::Arc;

use serde::Serialize;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

#[cfg(feature = "hydrate")]
pub use storage::BrowserStorage;

pub const CSRF_TOKEN_KEY: &str = "csrf_token";
pub const IS_LOGGED_IN_KEY: &str = "is_logged_in";
pub const IS_ADMIN_KEY: &str = "is_admin";
/// Saved `Cookie` header for shells without a browser cookie jar.
pub const COOKIE_KEY: &str = "session_cookie";

const TRUE: &str = "true";

/// Point-in-time snapshot of the cached session state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    pub is_logged_in: bool,
    pub is_admin: bool,
    pub csrf_token: Option<String>,
}

/// Cloneable handle over a shared [`SessionStorage`] backend.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("flags", &self.flags()).finish()
    }
}

impl Session {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self { storage: Arc::new(storage) }
    }

    pub fn from_shared(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Session backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    #[must_use]
    pub fn flags(&self) -> SessionFlags {
        SessionFlags { is_logged_in: self.is_logged_in(), is_admin: self.is_admin(), csrf_token: self.csrf_token() }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.read_bool(IS_LOGGED_IN_KEY)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.read_bool(IS_ADMIN_KEY)
    }

    /// Cached anti-forgery token. An empty value counts as absent.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        self.storage.get(CSRF_TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn set_csrf_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(CSRF_TOKEN_KEY, token)
    }

    /// Record a successful login and the role the server reported.
    pub fn mark_logged_in(&self, is_admin: bool) -> Result<(), StorageError> {
        self.storage.set(IS_LOGGED_IN_KEY, TRUE)?;
        if is_admin {
            self.storage.set(IS_ADMIN_KEY, TRUE)
        } else {
            self.storage.remove(IS_ADMIN_KEY)
        }
    }

    /// Drop the login and role flags. The CSRF token is kept.
    pub fn clear_auth(&self) -> Result<(), StorageError> {
        let logged_in = self.storage.remove(IS_LOGGED_IN_KEY);
        let admin = self.storage.remove(IS_ADMIN_KEY);
        logged_in.and(admin)
    }

    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.clear_auth()?;
        self.storage.remove(CSRF_TOKEN_KEY)?;
        self.storage.remove(COOKIE_KEY)
    }

    #[must_use]
    pub fn saved_cookies(&self) -> Option<String> {
        self.storage.get(COOKIE_KEY).filter(|c| !c.is_empty())
    }

    pub fn save_cookies(&self, header: &str) -> Result<(), StorageError> {
        self.storage.set(COOKIE_KEY, header)
    }

    fn read_bool(&self, key: &str) -> bool {
        self.storage.get(key).is_some_and(|v| v == TRUE)
    }
}
