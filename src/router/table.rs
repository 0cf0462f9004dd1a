//! Static route table and path matching.
//!
//! DESIGN
//! ======
//! Descriptors are `const` data; the table is an ordered slice and the first
//! matching pattern wins. Patterns are `/`-separated with `:param` segments.
//! Query string, fragment and one trailing `/` are ignored when matching.
//! Static segments match case-insensitively and params are percent-decoded;
//! [`RouteTable::href`] encodes them on the way out.
//!
//! `requires_admin` is carried on the admin CRUD screens exactly as declared
//! but the guard only reads `admin_only`; [`RouteTable::dead_metadata`]
//! lists the affected routes.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

use super::RouteError;

/// Metadata flags consumed by the navigation guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub admin_only: bool,
    pub user_only: bool,
    /// Declared on admin CRUD routes; never read by the guard.
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self { requires_auth: false, admin_only: false, user_only: false, requires_admin: false };
    pub const USER: Self = Self { requires_auth: true, admin_only: false, user_only: true, requires_admin: false };
    pub const ADMIN: Self = Self { requires_auth: true, admin_only: true, user_only: false, requires_admin: false };
    pub const ADMIN_CRUD: Self = Self { requires_auth: true, admin_only: false, user_only: false, requires_admin: true };
}

/// Every screen the app can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    Home,
    Login,
    Register,
    UserDashboard,
    UserScores,
    UserSummary,
    UserTakeQuiz,
    UserSearchResults,
    AdminDashboard,
    AdminSummary,
    AdminCreateSubject,
    AdminEditSubject,
    AdminCreateChapter,
    AdminEditChapter,
    AdminUsers,
    AdminQuizzes,
    AdminCreateQuiz,
    AdminEditQuiz,
    AdminCreateQuestion,
    AdminEditQuestion,
}

/// How a view's component is bound to its route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Binding {
    /// Loaded with the app bundle.
    Eager,
    /// Loaded on first navigation.
    Lazy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RouteTarget {
    View { view: View, binding: Binding },
    /// Static alias resolved before the guard runs.
    Redirect(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub target: RouteTarget,
    pub meta: RouteMeta,
}

impl RouteDescriptor {
    const fn view(path: &'static str, view: View, binding: Binding, meta: RouteMeta) -> Self {
        Self { path, name: None, target: RouteTarget::View { view, binding }, meta }
    }

    const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    const fn redirect(path: &'static str, to: &'static str) -> Self {
        Self { path, name: None, target: RouteTarget::Redirect(to), meta: RouteMeta::PUBLIC }
    }
}

// =============================================================================
// ROUTES
// =============================================================================

use Binding::{Eager, Lazy};

pub static ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor::view("/", View::Home, Eager, RouteMeta::PUBLIC),
    RouteDescriptor::view("/login", View::Login, Eager, RouteMeta::PUBLIC),
    RouteDescriptor::view("/register", View::Register, Eager, RouteMeta::PUBLIC),
    RouteDescriptor::view("/user/dashboard", View::UserDashboard, Lazy, RouteMeta::USER),
    RouteDescriptor::redirect("/dashboard", "/user/dashboard"),
    RouteDescriptor::view("/admin", View::AdminDashboard, Lazy, RouteMeta::ADMIN),
    RouteDescriptor::view("/admin/subject/create", View::AdminCreateSubject, Lazy, RouteMeta::ADMIN_CRUD),
    RouteDescriptor::view("/admin/subject/edit/:id", View::AdminEditSubject, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminEditSubject"),
    RouteDescriptor::view("/admin/chapter/add/:subjectId", View::AdminCreateChapter, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminCreateChapter"),
    RouteDescriptor::view("/admin/chapter/edit/:id", View::AdminEditChapter, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminEditChapter"),
    RouteDescriptor::view("/admin/users", View::AdminUsers, Eager, RouteMeta::ADMIN_CRUD).named("AdminUsers"),
    RouteDescriptor::view("/admin/quizzes", View::AdminQuizzes, Eager, RouteMeta::ADMIN_CRUD).named("AdminQuizzes"),
    RouteDescriptor::view("/admin/quiz/create", View::AdminCreateQuiz, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminCreateQuiz"),
    RouteDescriptor::view("/admin/quiz/create/:chapterId", View::AdminCreateQuiz, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminCreateQuizWithChapter"),
    RouteDescriptor::view("/admin/quiz/edit/:id", View::AdminEditQuiz, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminEditQuiz"),
    RouteDescriptor::view("/admin/question/create/:quizId", View::AdminCreateQuestion, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminCreateQuestion"),
    RouteDescriptor::view("/admin/question/edit/:id", View::AdminEditQuestion, Eager, RouteMeta::ADMIN_CRUD)
        .named("AdminEditQuestion"),
    RouteDescriptor::view("/user/scores", View::UserScores, Lazy, RouteMeta::USER),
    RouteDescriptor::view("/user/summary", View::UserSummary, Lazy, RouteMeta::USER),
    RouteDescriptor::view("/user/quiz/:quizId/start", View::UserTakeQuiz, Lazy, RouteMeta::USER),
    RouteDescriptor::view("/user/search-results", View::UserSearchResults, Lazy, RouteMeta::USER)
        .named("UserSearchResults"),
    RouteDescriptor::view("/admin/summary", View::AdminSummary, Eager, RouteMeta::ADMIN).named("AdminSummary"),
];

// =============================================================================
// TABLE
// =============================================================================

/// A descriptor matched against a concrete path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub descriptor: &'a RouteDescriptor,
    pub params: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug)]
pub struct RouteTable {
    routes: &'static [RouteDescriptor],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RouteTable {
    /// The application's route list.
    #[must_use]
    pub fn standard() -> Self {
        Self { routes: ROUTES }
    }

    #[must_use]
    pub fn new(routes: &'static [RouteDescriptor]) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &'static [RouteDescriptor] {
        self.routes
    }

    /// First descriptor whose pattern matches `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'static>> {
        let path = normalize(path);
        self.routes
            .iter()
            .find_map(|descriptor| match_pattern(descriptor.path, path).map(|params| RouteMatch { descriptor, params }))
    }

    /// Build the concrete path for a named route.
    pub fn href(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let descriptor = self
            .routes
            .iter()
            .find(|d| d.name == Some(name))
            .ok_or_else(|| RouteError::UnknownRouteName(name.to_owned()))?;

        let mut out = String::new();
        for segment in segments(descriptor.path) {
            out.push('/');
            match segment.strip_prefix(':') {
                Some(param) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == param)
                        .map(|(_, value)| *value)
                        .filter(|value| !value.is_empty())
                        .ok_or_else(|| RouteError::MissingParam { route: name.to_owned(), param: param.to_owned() })?;
                    out.push_str(&urlencoding::encode(value));
                }
                None => out.push_str(segment),
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }

    /// Routes declaring `requires_admin` without `admin_only`.
    ///
    /// The guard enforces only `requires_auth` on these, so any logged-in
    /// user can open them.
    pub fn dead_metadata(&self) -> impl Iterator<Item = &'static RouteDescriptor> {
        self.routes.iter().filter(|d| d.meta.requires_admin && !d.meta.admin_only)
    }
}

/// Strip query, fragment and a single trailing slash.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Match `path` against a `:param` pattern.
///
/// Static segments compare ASCII case-insensitively. Empty segments are
/// significant, so `//user//scores` is not `/user/scores`. Captured values
/// are percent-decoded, falling back to the raw text when decoding fails.
fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    if !path.starts_with('/') {
        return None;
    }
    let mut params = BTreeMap::new();
    let mut want = pattern.split('/');
    let mut have = path.split('/');
    loop {
        match (want.next(), have.next()) {
            (None, None) => return Some(params),
            (Some(w), Some(h)) => {
                if let Some(name) = w.strip_prefix(':') {
                    if h.is_empty() {
                        return None;
                    }
                    params.insert(name.to_owned(), decode_param(h));
                } else if !w.eq_ignore_ascii_case(h) {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), Cow::into_owned)
}
