use async_trait::async_trait;
use rickmorty_api::{ApiResponse, Character, Episode, Error, RickAndMortyClient};

/// Where pages get their character data from.
#[async_trait]
pub trait CharacterSource: Send + Sync {
    async fn list_characters(&self, page: u32, name: Option<&str>) -> Result<ApiResponse, Error>;
    async fn character(&self, id: u32) -> Result<Character, Error>;
    async fn episodes(&self, ids: &[u32]) -> Result<Vec<Episode>, Error>;
}

#[async_trait]
impl CharacterSource for RickAndMortyClient {
    async fn list_characters(&self, page: u32, name: Option<&str>) -> Result<ApiResponse, Error> {
        RickAndMortyClient::list_characters(self, page, name).await
    }

    async fn character(&self, id: u32) -> Result<Character, Error> {
        self.get_character_by_id(id).await
    }

    async fn episodes(&self, ids: &[u32]) -> Result<Vec<Episode>, Error> {
        self.get_episodes_by_ids(ids).await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use rickmorty_api::Info;
    use std::{
        collections::HashMap,
        sync::Mutex,
        time::Duration,
    };

    pub(crate) fn character(id: u32, name: &str) -> Character {
        Character {
            id,
            name: name.to_string(),
            status: "Alive".to_string(),
            species: "Human".to_string(),
            kind: String::new(),
            gender: "Male".to_string(),
            image: format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
            origin: None,
            location: None,
            episode: (1..=3)
                .map(|e| format!("https://rickandmortyapi.com/api/episode/{e}"))
                .collect(),
            url: None,
            created: None,
        }
    }

    pub(crate) fn episode(id: u32) -> Episode {
        Episode {
            id,
            name: format!("Episode {id}"),
            air_date: "December 2, 2013".to_string(),
            episode: format!("S01E{id:02}"),
            characters: vec![],
            url: format!("https://rickandmortyapi.com/api/episode/{id}"),
            created: Default::default(),
        }
    }

    /// Serves 20 characters per page out of 42 pages. Listing page 13 fails,
    /// and pages or ids put in `delays` answer late.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub(crate) list_calls: Mutex<Vec<(u32, Option<String>)>>,
        pub(crate) episode_calls: Mutex<Vec<Vec<u32>>>,
        pub(crate) delays: HashMap<u32, Duration>,
        pub(crate) fail_episodes: bool,
    }

    impl FakeSource {
        pub(crate) fn with_delay(mut self, key: u32, delay: Duration) -> Self {
            self.delays.insert(key, delay);
            self
        }

        async fn delay_for(&self, key: u32) {
            if let Some(delay) = self.delays.get(&key) {
                tokio::time::sleep(*delay).await;
            }
        }

        pub(crate) fn list_calls(&self) -> Vec<(u32, Option<String>)> {
            self.list_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CharacterSource for FakeSource {
        async fn list_characters(
            &self,
            page: u32,
            name: Option<&str>,
        ) -> Result<ApiResponse, Error> {
            self.list_calls
                .lock()
                .unwrap()
                .push((page, name.map(str::to_string)));
            self.delay_for(page).await;
            if page == 13 {
                return Err(Error::Status {
                    status: 500,
                    message: "Http failure response".to_string(),
                });
            }
            let name = name.unwrap_or("Rick");
            Ok(ApiResponse {
                info: Info {
                    count: 826,
                    pages: 42,
                    next: None,
                    prev: None,
                },
                results: (0..20)
                    .map(|i| character(page * 100 + i, &format!("{name} {i}")))
                    .collect(),
            })
        }

        async fn character(&self, id: u32) -> Result<Character, Error> {
            self.delay_for(id).await;
            if id == 0 || id > 826 {
                return Err(Error::Status {
                    status: 404,
                    message: "Character not found".to_string(),
                });
            }
            Ok(character(id, &format!("Character {id}")))
        }

        async fn episodes(&self, ids: &[u32]) -> Result<Vec<Episode>, Error> {
            self.episode_calls.lock().unwrap().push(ids.to_vec());
            if self.fail_episodes {
                return Err(Error::Status {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            Ok(ids.iter().copied().map(episode).collect())
        }
    }
}
