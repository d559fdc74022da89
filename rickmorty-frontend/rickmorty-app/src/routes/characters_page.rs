use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use log::{debug, error};
use rickmorty_api::Character;

use crate::{
    api::CharacterSource,
    debounce::Debouncer,
    pagination::{can_go_back, can_go_forward, page_window},
};

pub const PAGE_SIZE: usize = 10;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
pub const LOAD_ERROR: &str = "No se pudieron cargar los personajes. Intenta recargar la página.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharactersState {
    pub characters: Vec<Character>,
    pub page: u32,
    pub total_pages: u32,
    pub status: LoadStatus,
    pub error: Option<String>,
    /// The search term applied to the last issued load.
    pub search: String,
}

impl Default for CharactersState {
    fn default() -> Self {
        Self {
            characters: Vec::new(),
            page: 1,
            total_pages: 0,
            status: LoadStatus::Idle,
            error: None,
            search: String::new(),
        }
    }
}

/// The paginated, searchable character grid.
///
/// Clones share state. Loads may overlap; only the most recently issued one
/// is allowed to write its result.
#[derive(Clone)]
pub struct CharactersPage {
    source: Arc<dyn CharacterSource>,
    state: Arc<Mutex<CharactersState>>,
    sequence: Arc<AtomicU64>,
    debouncer: Debouncer,
    page_size: usize,
}

impl CharactersPage {
    pub fn new(source: Arc<dyn CharacterSource>) -> Self {
        Self {
            source,
            state: Arc::default(),
            sequence: Arc::default(),
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer.cancel();
        self.debouncer = Debouncer::new(delay);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CharactersState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> CharactersState {
        self.lock().clone()
    }

    /// Page buttons to render around the current page.
    pub fn pages(&self) -> Vec<u32> {
        let state = self.lock();
        page_window(state.page, state.total_pages)
    }

    pub fn can_go_back(&self) -> bool {
        can_go_back(self.lock().page)
    }

    pub fn can_go_forward(&self) -> bool {
        let state = self.lock();
        can_go_forward(state.page, state.total_pages)
    }

    pub async fn init(&self) {
        let page = self.lock().page;
        self.load_page(page).await;
    }

    pub async fn load_page(&self, page: u32) {
        if page < 1 {
            return;
        }
        let request = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let search = {
            let mut state = self.lock();
            state.status = LoadStatus::Loading;
            state.error = None;
            state.search.clone()
        };
        let name = Some(search.as_str()).filter(|s| !s.is_empty());
        let result = self.source.list_characters(page, name).await;
        if self.sequence.load(Ordering::SeqCst) != request {
            debug!("dropping stale character page {page}");
            return;
        }
        let mut state = self.lock();
        match result {
            Ok(response) => {
                state.characters = response.results.into_iter().take(self.page_size).collect();
                state.total_pages = response.info.pages;
                state.page = page;
                state.status = LoadStatus::Loaded;
            }
            Err(e) => {
                error!("Error loading characters page {page}: {}", e.message());
                state.error = Some(LOAD_ERROR.to_string());
                state.status = LoadStatus::Error;
            }
        }
    }

    /// Loads `page` unless it is the current page or out of range.
    pub async fn go_to(&self, page: u32) {
        {
            let state = self.lock();
            if page == state.page || page < 1 || page > state.total_pages {
                return;
            }
        }
        self.load_page(page).await;
    }

    pub async fn prev(&self) {
        let page = self.lock().page;
        self.go_to(page.saturating_sub(1)).await;
    }

    pub async fn next(&self) {
        let page = self.lock().page;
        self.go_to(page.saturating_add(1)).await;
    }

    /// Sets the name filter for subsequent loads without loading anything.
    pub fn set_search(&self, term: &str) {
        self.lock().search = term.trim().to_string();
    }

    pub async fn search(&self, term: &str) {
        self.set_search(term);
        self.load_page(1).await;
    }

    /// Records a keystroke in the search box. The first page is reloaded with
    /// `term` once typing has paused for the debounce delay.
    pub fn on_search_input(&self, term: impl Into<String>) {
        let term = term.into();
        let page = self.clone();
        self.debouncer.call(async move { page.search(&term).await });
    }

    pub async fn clear_search(&self) {
        self.debouncer.cancel();
        self.lock().search.clear();
        self.load_page(1).await;
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
