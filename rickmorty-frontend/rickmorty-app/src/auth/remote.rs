use async_trait::async_trait;
use log::{error, info};
use reqwest::{Client, StatusCode};
use rickmorty_api_types::{Address, AuthResponse, RegisterAck, RegisterData, User};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{AuthBackend, AuthError, REGISTER_SUCCESS};

pub const DEFAULT_AUTH_BASE_URL: &str = "http://api-auth.academy.mobydigital.com/api";

/// Talks to the user API over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteAuthService {
    client: Client,
    base_url: String,
}

impl Default for RemoteAuthService {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_BASE_URL)
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    mail: &'a str,
    password: &'a str,
}

/// The server has shipped the token under several names over time.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginReply {
    token: Option<String>,
    access_token: Option<String>,
    jwt: Option<String>,
    user: Option<RemoteUser>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RemoteUser {
    name: Option<String>,
    address: Option<RemoteAddress>,
    phone: Option<String>,
    birthday: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RemoteAddress {
    street: Option<String>,
    city: Option<String>,
    region: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
    cp: Option<String>,
    zip: Option<String>,
}

impl From<RemoteAddress> for Address {
    fn from(value: RemoteAddress) -> Self {
        let RemoteAddress {
            street,
            city,
            region,
            state,
            country,
            postal_code,
            cp,
            zip,
        } = value;
        Address {
            street: street.unwrap_or_default(),
            city: city.unwrap_or_default(),
            region: region.or(state).or(country).unwrap_or_default(),
            postal_code: postal_code.or(cp).or(zip).unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RegisterReply {
    success: Option<bool>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RemoteAuthService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        mail: &str,
    ) -> Result<T, AuthError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("POST {url} failed {e}");
                AuthError::Network(e.to_string())
            })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message);
            error!("POST {url} returned {status}: {message:?}");
            return Err(status_error(status, message, mail));
        }
        let text = if text.trim().is_empty() { "{}" } else { &text };
        serde_json::from_str(text).map_err(|e| AuthError::Server {
            status: status.as_u16(),
            message: Some(format!("Unexpected response: {e}")),
        })
    }
}

fn status_error(status: StatusCode, message: Option<String>, mail: &str) -> AuthError {
    match status {
        StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials,
        StatusCode::CONFLICT => AuthError::AlreadyRegistered(mail.to_string()),
        StatusCode::BAD_REQUEST => AuthError::InvalidInput(message),
        status => AuthError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl AuthBackend for RemoteAuthService {
    async fn login(&self, mail: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let reply: LoginReply = self
            .post("user/login", &LoginRequest { mail, password }, mail)
            .await?;
        let token = [reply.token, reply.access_token, reply.jwt]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .ok_or(AuthError::InvalidCredentials)?;
        let user = reply.user.ok_or(AuthError::MissingUser)?;
        let name = user
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| mail.split('@').next().unwrap_or(mail).to_string());
        info!("logged in as {mail}");
        Ok(AuthResponse {
            token,
            user: User {
                mail: mail.to_string(),
                name,
                address: user.address.map(Address::from),
                phone: user.phone,
                birthday: user.birthday,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
        })
    }

    async fn register(&self, data: RegisterData) -> Result<RegisterAck, AuthError> {
        let reply: RegisterReply = self.post("user", &data, &data.mail).await?;
        info!("registered {}", data.mail);
        Ok(RegisterAck {
            success: reply.success.unwrap_or(true),
            message: reply.message.unwrap_or_else(|| REGISTER_SUCCESS.to_string()),
            mail: data.mail,
            name: data.name,
        })
    }
}
