use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use log::{error, warn};
use rickmorty_api::{Character, Episode};

use crate::api::CharacterSource;

pub const DETAILS_ERROR: &str = "Error loading character details";

/// The last path segment of an episode URL, e.g. `".../episode/28"` gives `"28"`.
pub fn episode_id_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or_default()
}

pub fn episode_ids_from_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .map(|url| episode_id_from_url(url.as_ref()).to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterDetailsState {
    pub character: Option<Character>,
    pub episode_ids: Vec<String>,
    pub episodes: Vec<Episode>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct CharacterDetailsPage {
    source: Arc<dyn CharacterSource>,
    state: Arc<Mutex<CharacterDetailsState>>,
    sequence: Arc<AtomicU64>,
}

impl CharacterDetailsPage {
    pub fn new(source: Arc<dyn CharacterSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CharacterDetailsState {
                loading: true,
                ..Default::default()
            })),
            sequence: Arc::default(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CharacterDetailsState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> CharacterDetailsState {
        self.lock().clone()
    }

    fn is_current(&self, request: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == request
    }

    /// Shows character `id`. A later call supersedes any load still in flight.
    pub async fn load(&self, id: u32) {
        let request = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }
        let character = match self.source.character(id).await {
            Ok(character) => character,
            Err(e) => {
                error!("Error fetching character {id}: {}", e.message());
                if self.is_current(request) {
                    let mut state = self.lock();
                    state.error = Some(DETAILS_ERROR.to_string());
                    state.loading = false;
                }
                return;
            }
        };
        if !self.is_current(request) {
            return;
        }
        let episode_ids = episode_ids_from_urls(&character.episode);
        let numeric: Vec<u32> = episode_ids
            .iter()
            .filter_map(|id| match id.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("Skipping episode id {id:?}");
                    None
                }
            })
            .collect();
        {
            let mut state = self.lock();
            state.character = Some(character);
            state.episode_ids = episode_ids;
            state.episodes.clear();
            state.loading = false;
        }

        match self.source.episodes(&numeric).await {
            Ok(episodes) if self.is_current(request) => self.lock().episodes = episodes,
            Ok(_) => {}
            Err(e) => error!("Error fetching episodes for character {id}: {}", e.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use std::time::Duration;

    #[test]
    fn episode_ids() {
        assert_eq!(
            episode_id_from_url("https://rickandmortyapi.com/api/episode/1"),
            "1"
        );
        assert_eq!(
            episode_ids_from_urls(&[
                "https://rickandmortyapi.com/api/episode/1",
                "https://rickandmortyapi.com/api/episode/2",
                "https://rickandmortyapi.com/api/episode/51",
            ]),
            vec!["1", "2", "51"]
        );
        assert_eq!(episode_id_from_url("https://rickandmortyapi.com/api/episode/"), "");
        assert_eq!(episode_id_from_url("28"), "28");
    }

    #[tokio::test]
    async fn load_character_and_episodes() {
        let source = Arc::new(FakeSource::default());
        let page = CharacterDetailsPage::new(source.clone());
        assert!(page.state().loading);

        page.load(1).await;
        let state = page.state();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.character.unwrap().name, "Character 1");
        assert_eq!(state.episode_ids, vec!["1", "2", "3"]);
        assert_eq!(
            state.episodes.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(*source.episode_calls.lock().unwrap(), vec![vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn missing_character() {
        let page = CharacterDetailsPage::new(Arc::new(FakeSource::default()));
        page.load(9999).await;
        let state = page.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(DETAILS_ERROR));
        assert!(state.character.is_none());
    }

    #[tokio::test]
    async fn episode_failure_is_not_fatal() {
        let source = FakeSource {
            fail_episodes: true,
            ..Default::default()
        };
        let page = CharacterDetailsPage::new(Arc::new(source));
        page.load(2).await;
        let state = page.state();
        assert_eq!(state.error, None);
        assert!(state.character.is_some());
        assert_eq!(state.episode_ids.len(), 3);
        assert!(state.episodes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn latest_load_wins() {
        let source = Arc::new(FakeSource::default().with_delay(1, Duration::from_secs(2)));
        let page = CharacterDetailsPage::new(source);
        tokio::join!(page.load(1), page.load(2));
        assert_eq!(page.state().character.unwrap().id, 2);
    }
}
