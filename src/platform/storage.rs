//! LocalStorage-backed snapshot cache and the embedded feed source

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use web_sys::{Storage, window};

use crate::content::{ItemSource, SnapshotCache};
use crate::error::ContentError;

fn local_storage() -> Result<Storage, ContentError> {
    window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| ContentError::storage("LocalStorage is not available"))
}

/// Snapshot cache in the browser's LocalStorage
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageCache;

impl SnapshotCache for LocalStorageCache {
    fn get(&self, key: &str) -> Result<Option<String>, ContentError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| ContentError::storage(format!("read {}: {:?}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ContentError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| ContentError::storage(format!("write {}: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<(), ContentError> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| ContentError::storage(format!("remove {}: {:?}", key, e)))
    }
}

/// Feed published into the page as `<script type="application/json" id=..>`
#[derive(Debug)]
pub struct ScriptTagSource<T> {
    element_id: &'static str,
    _items: PhantomData<T>,
}

impl<T> ScriptTagSource<T> {
    pub fn new(element_id: &'static str) -> Self {
        Self {
            element_id,
            _items: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ItemSource<T> for ScriptTagSource<T> {
    fn fetch(&self) -> Result<Vec<T>, ContentError> {
        let text = window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(self.element_id))
            .and_then(|el| el.text_content())
            .ok_or_else(|| ContentError::unreachable(format!("no #{} feed in page", self.element_id)))?;
        Ok(serde_json::from_str(&text)?)
    }
}
