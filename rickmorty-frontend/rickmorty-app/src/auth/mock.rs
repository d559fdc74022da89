use std::time::Duration;

use async_trait::async_trait;
use log::info;
use rickmorty_api_types::{Address, AuthResponse, MockUser, RegisterAck, RegisterData, User};
use tokio::sync::Mutex;

use super::{AuthBackend, AuthError, REGISTER_SUCCESS};

pub const DEFAULT_LATENCY: Duration = Duration::from_secs(1);

/// In-memory credential table standing in for the auth API.
/// Nothing here is persisted; each instance starts from its own seed.
#[derive(Debug)]
pub struct MockAuthService {
    users: Mutex<Vec<MockUser>>,
    latency: Duration,
}

impl Default for MockAuthService {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_users() -> Vec<MockUser> {
    vec![
        MockUser::new("admin@test.com", "123456", "Administrador").with_address(Address {
            street: "123 Admin St".to_string(),
            city: "Admin City".to_string(),
            region: "AC".to_string(),
            postal_code: "12345".to_string(),
        }),
        MockUser::new("user@test.com", "123456", "Usuario Test").with_phone("+1234567890"),
        MockUser::new("demo@demo.com", "demo123", "Demo User"),
    ]
}

impl MockAuthService {
    /// Seeded with the demo accounts.
    pub fn new() -> Self {
        Self {
            users: Mutex::new(seed_users()),
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn empty() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn add_mock_user(&self, user: MockUser) {
        self.users.lock().await.push(user);
    }

    pub async fn user_count(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl AuthBackend for MockAuthService {
    async fn login(&self, mail: &str, password: &str) -> Result<AuthResponse, AuthError> {
        tokio::time::sleep(self.latency).await;
        let users = self.users.lock().await;
        let user = users
            .iter()
            .find(|u| u.matches(mail, password))
            .ok_or(AuthError::InvalidCredentials)?;
        info!("mock login for {mail}");
        Ok(AuthResponse {
            token: format!("mock-token-{}", chrono::Utc::now().timestamp_millis()),
            user: user.user.clone(),
        })
    }

    async fn register(&self, data: RegisterData) -> Result<RegisterAck, AuthError> {
        tokio::time::sleep(self.latency).await;
        // lookup and insert under one guard so two concurrent registrations can't both pass
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.user.mail == data.mail) {
            return Err(AuthError::AlreadyRegistered(data.mail));
        }
        let RegisterData {
            name,
            mail,
            password,
            address,
            phone,
            birthday,
        } = data;
        users.push(MockUser {
            user: User {
                mail: mail.clone(),
                name: name.clone(),
                address,
                phone,
                birthday,
                ..Default::default()
            },
            password,
        });
        info!("mock registered {mail}");
        Ok(RegisterAck {
            success: true,
            message: REGISTER_SUCCESS.to_string(),
            mail,
            name,
        })
    }
}
