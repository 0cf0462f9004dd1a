use super::*;

fn flags(is_logged_in: bool, is_admin: bool) -> SessionFlags {
    SessionFlags { is_logged_in, is_admin, csrf_token: None }
}

fn all_metas() -> Vec<RouteMeta> {
    let mut metas = Vec::new();
    for bits in 0..16_u8 {
        metas.push(RouteMeta {
            requires_auth: bits & 1 != 0,
            admin_only: bits & 2 != 0,
            user_only: bits & 4 != 0,
            requires_admin: bits & 8 != 0,
        });
    }
    metas
}

fn all_flags() -> Vec<SessionFlags> {
    vec![flags(false, false), flags(false, true), flags(true, false), flags(true, true)]
}

// =============================================================
// Rule ordering
// =============================================================

#[test]
fn requires_auth_when_logged_out_always_goes_to_login() {
    for meta in all_metas().into_iter().filter(|m| m.requires_auth) {
        for is_admin in [false, true] {
            assert_eq!(guard(&meta, &flags(false, is_admin)), GuardDecision::Redirect("/login"), "{meta:?}");
        }
    }
}

#[test]
fn admin_only_without_admin_login_goes_to_dashboard() {
    let meta = RouteMeta { admin_only: true, ..RouteMeta::default() };
    assert_eq!(guard(&meta, &flags(false, false)), GuardDecision::Redirect("/dashboard"));
    assert_eq!(guard(&meta, &flags(false, true)), GuardDecision::Redirect("/dashboard"));
    assert_eq!(guard(&meta, &flags(true, false)), GuardDecision::Redirect("/dashboard"));
    assert_eq!(guard(&meta, &flags(true, true)), GuardDecision::Allow);
}

#[test]
fn user_only_for_admin_goes_to_admin() {
    assert_eq!(guard(&RouteMeta::USER, &flags(true, true)), GuardDecision::Redirect("/admin"));
    assert_eq!(guard(&RouteMeta::USER, &flags(true, false)), GuardDecision::Allow);
}

#[test]
fn user_only_checks_admin_flag_even_when_logged_out() {
    let meta = RouteMeta { user_only: true, ..RouteMeta::default() };
    assert_eq!(guard(&meta, &flags(false, true)), GuardDecision::Redirect("/admin"));
    assert_eq!(guard(&meta, &flags(false, false)), GuardDecision::Allow);
}

#[test]
fn admin_only_checked_before_user_only() {
    let meta = RouteMeta { admin_only: true, user_only: true, ..RouteMeta::default() };
    assert_eq!(guard(&meta, &flags(true, false)), GuardDecision::Redirect("/dashboard"));
    assert_eq!(guard(&meta, &flags(true, true)), GuardDecision::Redirect("/admin"));
}

#[test]
fn decision_matches_reference_rules_for_every_combination() {
    for meta in all_metas() {
        for f in all_flags() {
            let expected = if meta.requires_auth && !f.is_logged_in {
                GuardDecision::Redirect(LOGIN_REDIRECT)
            } else if meta.admin_only && !(f.is_logged_in && f.is_admin) {
                GuardDecision::Redirect(DASHBOARD_REDIRECT)
            } else if meta.user_only && f.is_admin {
                GuardDecision::Redirect(ADMIN_REDIRECT)
            } else {
                GuardDecision::Allow
            };
            assert_eq!(guard(&meta, &f), expected, "meta={meta:?} flags={f:?}");
        }
    }
}

// =============================================================
// Unflagged and dead metadata
// =============================================================

#[test]
fn public_routes_allow_any_session() {
    for f in all_flags() {
        assert_eq!(guard(&RouteMeta::PUBLIC, &f), GuardDecision::Allow);
    }
}

#[test]
fn requires_admin_is_not_enforced() {
    assert_eq!(guard(&RouteMeta::ADMIN_CRUD, &flags(true, false)), GuardDecision::Allow);
    let only_dead = RouteMeta { requires_admin: true, ..RouteMeta::default() };
    assert_eq!(guard(&only_dead, &flags(false, false)), GuardDecision::Allow);
}
