pub mod error_handler;
pub mod guards;
pub mod mock;
pub mod remote;

use async_trait::async_trait;
use rickmorty_api_types::{AuthResponse, RegisterAck, RegisterData};
use thiserror::Error;

pub use mock::MockAuthService;
pub use remote::RemoteAuthService;

pub(crate) const REGISTER_SUCCESS: &str = "Usuario registrado exitosamente";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0} is already registered")]
    AlreadyRegistered(String),
    #[error("Invalid input {0:?}")]
    InvalidInput(Option<String>),
    #[error("Unable to reach the auth server: {0}")]
    Network(String),
    #[error("Auth server returned {status}: {message:?}")]
    Server { status: u16, message: Option<String> },
    #[error("Response did not include a user")]
    MissingUser,
}

impl AuthError {
    /// The HTTP status this error corresponds to, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::InvalidCredentials => Some(401),
            AuthError::AlreadyRegistered(_) => Some(409),
            AuthError::InvalidInput(_) => Some(400),
            AuthError::Server { status, .. } => Some(*status),
            AuthError::Network(_) | AuthError::MissingUser => None,
        }
    }
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, mail: &str, password: &str) -> Result<AuthResponse, AuthError>;
    async fn register(&self, data: RegisterData) -> Result<RegisterAck, AuthError>;
}
