pub mod api;
pub mod auth;
pub mod config;
pub mod debounce;
pub mod error;
pub mod form_utils;
pub mod global_state;
pub mod pagination;
pub mod routes;
pub mod translate;

pub use config::{AppConfig, AuthMode};
pub use error::{AppError, AppResult};
