//! `localStorage` backend for the preference store.

use starlight_core::error::StarlightError;
use starlight_core::store::{KeyValueStore, MemoryStore};

use crate::dom::js_error;

/// `localStorage` when the browser grants it, otherwise an in-memory map
/// that lasts for the page's lifetime (private mode, disabled storage).
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            Some(storage) => Self::Local(storage),
            None => {
                tracing::warn!("localStorage unavailable, preferences will not persist");
                Self::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StarlightError> {
        match self {
            Self::Local(storage) => storage
                .get_item(key)
                .map_err(|e| StarlightError::Storage(js_error(e))),
            Self::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StarlightError> {
        match self {
            Self::Local(storage) => storage
                .set_item(key, value)
                .map_err(|e| StarlightError::Storage(js_error(e))),
            Self::Memory(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StarlightError> {
        match self {
            Self::Local(storage) => storage
                .remove_item(key)
                .map_err(|e| StarlightError::Storage(js_error(e))),
            Self::Memory(store) => store.remove(key),
        }
    }
}
