//! Client-side routing: route table, navigation guard, and the navigation
//! entry point that ties them to the session.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Router::navigate`] is what the hosting shell calls for every transition.
//! It resolves the path, follows static aliases, runs the guard against the
//! current session flags, and repeats for each redirect until a screen is
//! allowed.

pub mod guard;
pub mod table;


use std::collections::BTreeMap;

use serde::Serialize;

pub use guard::{GuardDecision, guard};
pub use table::{Binding, RouteDescriptor, RouteMeta, RouteTable, RouteTarget, View};

use crate::session::Session;

/// Redirect hops allowed before a transition is abandoned.
pub const MAX_REDIRECTS: usize = 8;

/// Errors produced while resolving a navigation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    /// No descriptor matches the path.
    #[error("no route matches {0}")]
    NotFound(String),

    /// Redirects did not settle on an allowed screen.
    #[error("redirect loop starting at {path} (via {})", .hops.join(" -> "))]
    RedirectLoop { path: String, hops: Vec<String> },

    /// No descriptor carries this name.
    #[error("unknown route name {0}")]
    UnknownRouteName(String),

    /// A named route was built without one of its `:param` values.
    #[error("route {route} needs a value for :{param}")]
    MissingParam { route: String, param: String },
}

/// Outcome of a committed transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// Path the transition landed on.
    pub path: String,
    pub view: View,
    pub params: BTreeMap<String, String>,
    /// Paths redirected away from, in order.
    pub redirects: Vec<String>,
}

impl Navigation {
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Router {
    table: RouteTable,
    session: Session,
}

impl Router {
    /// Router over the application's standard route table.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self::with_table(RouteTable::standard(), session)
    }

    #[must_use]
    pub fn with_table(table: RouteTable, session: Session) -> Self {
        Self { table, session }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve and authorize a transition to `path`.
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouteError> {
        let mut current = path.to_owned();
        let mut redirects = Vec::new();

        for _ in 0..=MAX_REDIRECTS {
            let matched = self.table.resolve(&current).ok_or_else(|| RouteError::NotFound(current.clone()))?;

            let next = match matched.descriptor.target {
                RouteTarget::Redirect(to) => to,
                RouteTarget::View { view, .. } => {
                    let flags = self.session.flags();
                    match guard(&matched.descriptor.meta, &flags) {
                        GuardDecision::Allow => {
                            tracing::debug!(path = %current, ?view, "navigation allowed");
                            return Ok(Navigation { path: current, view, params: matched.params, redirects });
                        }
                        GuardDecision::Redirect(to) => to,
                    }
                }
            };

            tracing::debug!(from = %current, to = next, "navigation redirected");
            redirects.push(std::mem::replace(&mut current, next.to_owned()));
        }

        Err(RouteError::RedirectLoop { path: path.to_owned(), hops: redirects })
    }

    /// Path for a named route, e.g. `("AdminEditQuiz", [("id", "7")])`.
    pub fn href(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        self.table.href(name, params)
    }
}
