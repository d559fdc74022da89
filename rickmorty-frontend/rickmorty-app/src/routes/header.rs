use log::info;

use super::Route;
use crate::{auth::guards::show_log_as_guest, error::AppResult, global_state::SessionState};

#[derive(Debug, Clone)]
pub struct Header {
    session: SessionState,
}

impl Header {
    pub fn new(session: SessionState) -> Self {
        Self { session }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Greeting for the signed in user, if any.
    pub fn user_name(&self) -> Option<String> {
        self.session.current_user().map(|user| user.name)
    }

    pub fn show_log_as_guest(&self, current: Route) -> bool {
        show_log_as_guest(current, self.is_logged_in())
    }

    pub fn logout(&self) -> AppResult<Route> {
        self.session.logout()?;
        info!("signed out");
        Ok(Route::Login)
    }
}
