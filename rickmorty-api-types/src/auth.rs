use serde::{Deserialize, Serialize};

use crate::user::{Address, User};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Payload of the registration form. Only ever sent, never stored as-is.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub name: String,
    pub mail: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct RegisterAck {
    pub success: bool,
    pub message: String,
    pub mail: String,
    pub name: String,
}
