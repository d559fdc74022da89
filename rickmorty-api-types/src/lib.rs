mod auth;

pub mod user;

pub use auth::{AuthResponse, RegisterAck, RegisterData};
pub use user::{Address, MockUser, User};
