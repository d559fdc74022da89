use cookie::{
    time::{Duration, OffsetDateTime},
    Cookie, CookieJar, SameSite,
};
use log::{error, warn};
use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::PathBuf,
    sync::Mutex,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error {0}")]
    Io(#[from] io::Error),
    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value slots that outlive a single page, like browser local storage.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Current items for an update. An unreadable file is discarded so the
    /// update can replace it; the flag reports that it was.
    fn items_for_update(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        match self.read_items() {
            Ok(items) => Ok((items, false)),
            Err(StorageError::Json(e)) => {
                warn!("Discarding corrupt session file {:?}: {e}", self.path);
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match self.read_items() {
            Ok(mut items) => items.remove(key),
            Err(e) => {
                error!("Error reading session file {:?}: {e}", self.path);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let (mut items, _) = self.items_for_update()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let (mut items, discarded) = self.items_for_update()?;
        if items.remove(key).is_some() || discarded {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

/// Slots kept as cookies. The host reads [`CookieStorage::set_cookie_headers`]
/// after a change and applies them to the browser or response.
#[derive(Debug, Default)]
pub struct CookieStorage {
    cookies: Mutex<CookieJar>,
}

impl CookieStorage {
    /// Seeds the jar from a `Cookie` request header.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut cookie_jar = CookieJar::new();
        for cookie in Cookie::split_parse_encoded(header.to_string()) {
            match cookie {
                Ok(c) => cookie_jar.add_original(c),
                Err(e) => warn!("Error parsing cookie {e:?}"),
            }
        }
        Self {
            cookies: Mutex::new(cookie_jar),
        }
    }

    /// `Set-Cookie` values for every change since the jar was created.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        cookies
            .delta()
            .map(|cookie| cookie.encoded().to_string())
            .collect()
    }
}

impl SessionStorage for CookieStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        cookies.get(key).map(|c| c.value().to_string())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cookie = Cookie::new(key.to_string(), value.to_string());
        cookie.set_same_site(SameSite::Strict);
        cookie.set_secure(Some(true));
        cookie.set_path("/");
        cookie.set_expires(OffsetDateTime::now_utc() + Duration::days(365));
        let mut cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        cookies.add(cookie);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut cookies = self.cookies.lock().unwrap_or_else(|e| e.into_inner());
        let mut removal = Cookie::from(key.to_string());
        removal.set_path("/");
        cookies.remove(removal);
        Ok(())
    }
}
