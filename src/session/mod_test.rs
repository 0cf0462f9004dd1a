use super::*;

// =============================================================
// Flag parsing
// =============================================================

#[test]
fn empty_session_reads_all_false() {
    let session = Session::in_memory();
    assert_eq!(session.flags(), SessionFlags::default());
}

#[test]
fn only_literal_true_counts_as_set() {
    let session = Session::new(MemoryStorage::with_entries([
        (IS_LOGGED_IN_KEY, "TRUE"),
        (IS_ADMIN_KEY, "1"),
    ]));
    assert!(!session.is_logged_in());
    assert!(!session.is_admin());

    let session = Session::new(MemoryStorage::with_entries([(IS_LOGGED_IN_KEY, "true"), (IS_ADMIN_KEY, "true")]));
    assert!(session.is_logged_in());
    assert!(session.is_admin());
}

#[test]
fn empty_csrf_token_counts_as_absent() {
    let session = Session::new(MemoryStorage::with_entries([(CSRF_TOKEN_KEY, "")]));
    assert_eq!(session.csrf_token(), None);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn mark_logged_in_as_user_clears_stale_admin_flag() {
    let session = Session::new(MemoryStorage::with_entries([(IS_ADMIN_KEY, "true")]));
    session.mark_logged_in(false).unwrap();

    assert!(session.is_logged_in());
    assert!(!session.is_admin());
}

#[test]
fn mark_logged_in_as_admin_sets_both_flags() {
    let session = Session::in_memory();
    session.mark_logged_in(true).unwrap();

    assert_eq!(
        session.flags(),
        SessionFlags { is_logged_in: true, is_admin: true, csrf_token: None }
    );
}

#[test]
fn clear_auth_keeps_csrf_token() {
    let session = Session::in_memory();
    session.set_csrf_token("tok").unwrap();
    session.mark_logged_in(true).unwrap();

    session.clear_auth().unwrap();

    assert!(!session.is_logged_in());
    assert!(!session.is_admin());
    assert_eq!(session.csrf_token().as_deref(), Some("tok"));
}

#[test]
fn clear_all_drops_everything() {
    let session = Session::in_memory();
    session.set_csrf_token("tok").unwrap();
    session.mark_logged_in(false).unwrap();

    session.save_cookies("session=abc").unwrap();

    session.clear_all().unwrap();

    assert_eq!(session.flags(), SessionFlags::default());
    assert_eq!(session.saved_cookies(), None);
}

#[test]
fn saved_cookies_survive_clear_auth() {
    let session = Session::in_memory();
    session.save_cookies("session=abc").unwrap();
    session.clear_auth().unwrap();
    assert_eq!(session.saved_cookies().as_deref(), Some("session=abc"));
}

#[test]
fn clones_share_the_same_storage() {
    let a = Session::in_memory();
    let b = a.clone();
    a.mark_logged_in(false).unwrap();
    assert!(b.is_logged_in());
}
