use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
}

impl Error {
    /// The HTTP status the server answered with, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Flattens the error into the single display string pages show to the user.
    pub fn message(&self) -> String {
        match self {
            Error::Status { status, message } => {
                format!("Error Code: {status}\nMessage: {message}")
            }
            other => format!("Error: {other}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    pub name: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub image: String,
    #[serde(default)]
    pub origin: Option<LocationRef>,
    #[serde(default)]
    pub location: Option<LocationRef>,
    /// Episode resource URLs, e.g. `https://rickandmortyapi.com/api/episode/1`
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub air_date: String,
    /// Season/episode code, `S01E01`
    pub episode: String,
    pub characters: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of the character listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub info: Info,
    pub results: Vec<Character>,
}

#[derive(Serialize)]
struct CharacterQuery<'a> {
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct RickAndMortyClient {
    client: Client,
    base_url: String,
}

impl Default for RickAndMortyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RickAndMortyClient {
    pub const RICK_AND_MORTY_BASE_URL: &'static str = "https://rickandmortyapi.com/api";

    pub fn new() -> Self {
        RickAndMortyClient {
            client: Client::new(),
            base_url: Self::RICK_AND_MORTY_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let parsed = Url::parse(base_url)?;
        Ok(RickAndMortyClient {
            client: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_characters(
        &self,
        page: u32,
        name: Option<&str>,
    ) -> Result<ApiResponse, Error> {
        let url = self.endpoint("character")?;
        let name = name.filter(|n| !n.is_empty());
        info!("Getting character page {page} (name filter {name:?}): {url}");
        self.get_json(self.client.get(url).query(&CharacterQuery { page, name }))
            .await
    }

    pub async fn get_character_by_id(&self, id: u32) -> Result<Character, Error> {
        let url = self.endpoint(&format!("character/{id}"))?;
        info!("Getting character {url}");
        self.get_json(self.client.get(url)).await
    }

    pub async fn get_episode_by_id(&self, id: u32) -> Result<Episode, Error> {
        let url = self.endpoint(&format!("episode/{id}"))?;
        info!("Getting episode {url}");
        self.get_json(self.client.get(url)).await
    }

    /// Fetches several episodes, returned in the order of `ids`.
    ///
    /// The multi-id endpoint answers with an array whose order isn't guaranteed to
    /// match the request, so the response is indexed by id. Ids the server didn't
    /// return are skipped.
    pub async fn get_episodes_by_ids(&self, ids: &[u32]) -> Result<Vec<Episode>, Error> {
        match ids {
            [] => Ok(vec![]),
            [id] => Ok(vec![self.get_episode_by_id(*id).await?]),
            ids => {
                let id_str = Self::ids_to_string(ids);
                let url = self.endpoint(&format!("episode/{id_str}"))?;
                info!("Getting episodes {url}");
                let episodes: Vec<Episode> = self.get_json(self.client.get(url)).await?;
                Ok(Self::order_by_request(ids, episodes))
            }
        }
    }

    async fn get_json<T>(&self, request: RequestBuilder) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = format!(
                "Http failure response for {}: {} {}",
                response.url(),
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            );
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}/{path}", self.base_url))?)
    }

    fn order_by_request(ids: &[u32], episodes: Vec<Episode>) -> Vec<Episode> {
        let by_id: HashMap<u32, Episode> = episodes.into_iter().map(|e| (e.id, e)).collect();
        ids.iter()
            .filter_map(|id| {
                let episode = by_id.get(id).cloned();
                if episode.is_none() {
                    warn!("episode {id} missing from multi-id response");
                }
                episode
            })
            .collect()
    }

    fn ids_to_string(ids: &[u32]) -> String {
        let id_strs: Vec<_> = ids.iter().map(|m| m.to_string()).collect();
        id_strs.join(",")
    }
}
