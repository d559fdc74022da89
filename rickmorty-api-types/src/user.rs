use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.region.is_empty()
            && self.postal_code.is_empty()
    }
}

#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub mail: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A user record as held by the in-memory credential store. Never persisted.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MockUser {
    pub user: User,
    pub password: String,
}

impl MockUser {
    pub fn new(mail: &str, password: &str, name: &str) -> Self {
        Self {
            user: User {
                mail: mail.to_string(),
                name: name.to_string(),
                ..Default::default()
            },
            password: password.to_string(),
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.user.address = Some(address);
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.user.phone = Some(phone.to_string());
        self
    }

    pub fn matches(&self, mail: &str, password: &str) -> bool {
        self.user.mail == mail && self.password == password
    }
}
