use thiserror::Error;

use crate::{auth::AuthError, global_state::storage::StorageError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error {0}")]
    Api(#[from] rickmorty_api::Error),
    #[error("Auth error {0}")]
    Auth(#[from] AuthError),
    #[error("Session storage error {0}")]
    Storage(#[from] StorageError),
    #[error("Form has validation errors")]
    InvalidForm,
    #[error("Already signed in, redirecting to {0}")]
    Redirected(crate::routes::Route),
}

pub type AppResult<T> = Result<T, AppError>;
