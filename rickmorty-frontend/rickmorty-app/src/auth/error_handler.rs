//! User facing copy for auth failures.

use super::AuthError;

pub const NETWORK_ERROR: &str =
    "No se puede conectar con el servidor. Verifica tu conexión a internet.";
pub const UNAUTHORIZED: &str = "Credenciales incorrectas. Verifica tu email y contraseña.";
pub const EMAIL_EXISTS: &str = "El email ya está registrado. Intenta con otro email.";
pub const LOGIN_DEFAULT: &str = "Error al iniciar sesión. Inténtalo nuevamente.";
pub const REGISTER_DEFAULT: &str = "Error al registrar usuario. Inténtalo nuevamente.";
pub const LOGIN_BAD_REQUEST: &str = "Datos de login inválidos.";
pub const REGISTER_BAD_REQUEST: &str = "Datos de registro inválidos.";
pub const USER_NOT_FOUND: &str = "Usuario no encontrado";

pub fn login_error_message(error: &AuthError) -> String {
    match error {
        AuthError::InvalidCredentials => UNAUTHORIZED.to_string(),
        AuthError::InvalidInput(message) => message
            .clone()
            .unwrap_or_else(|| LOGIN_BAD_REQUEST.to_string()),
        AuthError::Network(_) => NETWORK_ERROR.to_string(),
        AuthError::MissingUser => USER_NOT_FOUND.to_string(),
        AuthError::Server {
            message: Some(message),
            ..
        } => message.clone(),
        AuthError::Server { message: None, .. } | AuthError::AlreadyRegistered(_) => {
            LOGIN_DEFAULT.to_string()
        }
    }
}

pub fn register_error_message(error: &AuthError) -> String {
    match error {
        AuthError::InvalidInput(message) => message
            .clone()
            .unwrap_or_else(|| REGISTER_BAD_REQUEST.to_string()),
        AuthError::AlreadyRegistered(_) => EMAIL_EXISTS.to_string(),
        AuthError::Network(_) => NETWORK_ERROR.to_string(),
        AuthError::Server {
            message: Some(message),
            ..
        } => message.clone(),
        AuthError::Server { message: None, .. }
        | AuthError::InvalidCredentials
        | AuthError::MissingUser => REGISTER_DEFAULT.to_string(),
    }
}

/// Connectivity problems and 5xx responses are worth another attempt.
pub fn should_retry(error: &AuthError) -> bool {
    matches!(error, AuthError::Network(_)) || is_critical(error)
}

pub fn is_critical(error: &AuthError) -> bool {
    error.status().is_some_and(|status| status >= 500)
}
