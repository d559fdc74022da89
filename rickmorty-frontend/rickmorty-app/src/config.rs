use std::{fmt, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use rickmorty_api::RickAndMortyClient;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{
        mock::DEFAULT_LATENCY, remote::DEFAULT_AUTH_BASE_URL, AuthBackend, MockAuthService,
        RemoteAuthService,
    },
    error::AppResult,
    routes::characters_page::{PAGE_SIZE, SEARCH_DEBOUNCE},
};

/// Which credential store backs login and registration.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Mock,
    Remote,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(AuthMode::Mock),
            "remote" => Ok(AuthMode::Remote),
            other => Err(format!("unknown auth mode {other}, expected mock or remote")),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Mock => write!(f, "mock"),
            AuthMode::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub auth_mode: AuthMode,
    pub auth_base_url: String,
    pub session_file: PathBuf,
    pub mock_latency_ms: u64,
    pub search_debounce_ms: u64,
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: RickAndMortyClient::RICK_AND_MORTY_BASE_URL.to_string(),
            auth_mode: AuthMode::default(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            session_file: PathBuf::from(".rickmorty-session.json"),
            mock_latency_ms: DEFAULT_LATENCY.as_millis() as u64,
            search_debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            page_size: PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn character_client(&self) -> AppResult<RickAndMortyClient> {
        Ok(RickAndMortyClient::with_base_url(&self.api_base_url)?)
    }

    pub fn auth_backend(&self) -> Arc<dyn AuthBackend> {
        match self.auth_mode {
            AuthMode::Mock => Arc::new(
                MockAuthService::new().with_latency(Duration::from_millis(self.mock_latency_ms)),
            ),
            AuthMode::Remote => Arc::new(RemoteAuthService::new(&self.auth_base_url)),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod test {
    use super::{AppConfig, AuthMode};

    #[test]
    fn auth_mode_parsing() {
        assert_eq!("mock".parse::<AuthMode>(), Ok(AuthMode::Mock));
        assert_eq!(" Remote ".parse::<AuthMode>(), Ok(AuthMode::Remote));
        assert!("ldap".parse::<AuthMode>().is_err());
        assert_eq!(AuthMode::Remote.to_string(), "remote");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"auth_mode":"remote","mock_latency_ms":0}"#).unwrap();
        assert_eq!(config.auth_mode, AuthMode::Remote);
        assert_eq!(config.mock_latency_ms, 0);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.api_base_url, "https://rickandmortyapi.com/api");
        assert_eq!(config.search_debounce().as_millis(), 500);
    }

    #[test]
    fn bad_api_url_is_an_error() {
        let config = AppConfig {
            api_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.character_client().is_err());
    }
}
