use crate::{global_state::SessionState, routes::Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Route),
}

/// Signed in users have no business on the login or register pages.
pub fn no_auth_guard(session: &SessionState) -> GuardOutcome {
    if session.is_logged_in() {
        GuardOutcome::Redirect(Route::Characters)
    } else {
        GuardOutcome::Allow
    }
}

/// Applies the guard that belongs to `route`, if it has one.
pub fn guard(route: Route, session: &SessionState) -> GuardOutcome {
    if route.is_auth_page() {
        no_auth_guard(session)
    } else {
        GuardOutcome::Allow
    }
}

/// Whether the header should offer sign in instead of sign out.
pub fn show_log_as_guest(route: Route, logged_in: bool) -> bool {
    !logged_in || route.is_auth_page()
}
