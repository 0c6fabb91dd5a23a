//! Preference persistence.
//!
//! Two independent values live in a string key-value backend: the bookmark
//! list and the watched-episode map. Reads never fail from the caller's
//! point of view: a missing key, unreadable backend or corrupt JSON all
//! load as the empty container. Write failures (quota, private mode) are
//! logged and dropped.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StorageConfig;
use crate::error::StarlightError;
use crate::models::{BookmarkRecord, WatchedMap};

/// A synchronous string key-value backend such as `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StarlightError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StarlightError>;
    fn remove(&self, key: &str) -> Result<(), StarlightError>;
}

/// In-process backend for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing serialization.
    pub fn with_raw(self, key: &str, value: &str) -> Self {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StarlightError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StarlightError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StarlightError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Typed access to the two persisted preference values.
#[derive(Debug)]
pub struct PreferenceStore<S> {
    backend: S,
    bookmarks_key: String,
    watched_key: String,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(backend: S, config: &StorageConfig) -> Self {
        Self {
            backend,
            bookmarks_key: config.bookmarks_key.clone(),
            watched_key: config.watched_key.clone(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    // ── Bookmarks ───────────────────────────────────────────────

    /// All bookmarks in insertion order, duplicates dropped.
    pub fn bookmarks(&self) -> Vec<BookmarkRecord> {
        let mut bookmarks: Vec<BookmarkRecord> = self.load(&self.bookmarks_key);
        let mut seen = HashSet::new();
        bookmarks.retain(|b| seen.insert(b.session_id.clone()));
        bookmarks
    }

    pub fn save_bookmarks(&self, bookmarks: &[BookmarkRecord]) {
        self.save(&self.bookmarks_key, &bookmarks);
    }

    pub fn is_bookmarked(&self, session_id: &str) -> bool {
        self.bookmarks().iter().any(|b| b.session_id == session_id)
    }

    // ── Watched episodes ────────────────────────────────────────

    pub fn watched(&self) -> WatchedMap {
        self.load(&self.watched_key)
    }

    pub fn save_watched(&self, watched: &WatchedMap) {
        self.save(&self.watched_key, watched);
    }

    pub fn is_watched(&self, anime: &str, episode: &str) -> bool {
        self.watched().contains(anime, episode)
    }

    // ── Raw JSON helpers ────────────────────────────────────────

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, key, "Failed to load preferences, using empty");
                T::default()
            }
        }
    }

    fn try_load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StarlightError> {
        match self.backend.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            tracing::error!(error = %e, key, "Failed to save preferences");
        }
    }

    fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StarlightError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)
    }
}
