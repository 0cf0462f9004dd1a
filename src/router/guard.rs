//! Pre-navigation authorization check.
//!
//! Evaluated once per transition attempt, in fixed order; the first matching
//! rule decides:
//! 1. `requires_auth` and not logged in            -> `/login`
//! 2. `admin_only` and (not logged in or not admin) -> `/dashboard`
//! 3. `user_only` and admin                         -> `/admin`
//! 4. otherwise allow.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::table::RouteMeta;
use crate::session::SessionFlags;

pub const LOGIN_REDIRECT: &str = "/login";
pub const DASHBOARD_REDIRECT: &str = "/dashboard";
pub const ADMIN_REDIRECT: &str = "/admin";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

#[must_use]
pub fn guard(meta: &RouteMeta, flags: &SessionFlags) -> GuardDecision {
    if meta.requires_auth && !flags.is_logged_in {
        return GuardDecision::Redirect(LOGIN_REDIRECT);
    }
    if meta.admin_only && (!flags.is_logged_in || !flags.is_admin) {
        return GuardDecision::Redirect(DASHBOARD_REDIRECT);
    }
    if meta.user_only && flags.is_admin {
        return GuardDecision::Redirect(ADMIN_REDIRECT);
    }
    GuardDecision::Allow
}
