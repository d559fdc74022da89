use std::{fmt, sync::Arc};

use log::warn;
use rickmorty_api_types::User;

use super::storage::{MemoryStorage, SessionStorage};
use crate::error::AppResult;

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "currentUser";

/// The signed in user, persisted under [`TOKEN_KEY`] and [`USER_KEY`].
#[derive(Clone)]
pub struct SessionState {
    storage: Arc<dyn SessionStorage>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }
}

impl SessionState {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn save_auth_data(&self, token: &str, user: &User) -> AppResult<()> {
        let user = serde_json::to_string(user).map_err(super::storage::StorageError::from)?;
        // the token goes last, it is what marks the session as signed in
        self.storage.set_item(USER_KEY, &user)?;
        self.storage.set_item(TOKEN_KEY, token)?;
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get_item(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored user, or `None` when nothing is stored or it no longer parses.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.storage.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding malformed stored user: {e}");
                None
            }
        }
    }

    pub fn logout(&self) -> AppResult<()> {
        self.storage.remove_item(TOKEN_KEY)?;
        self.storage.remove_item(USER_KEY)?;
        Ok(())
    }
}
