use web_sys::Storage;

use super::js_error_message;
use crate::motivation::{KeyValueStore, StorageError};

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Access(js_error_message(&e)))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Access(js_error_message(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Access(js_error_message(&e)))
    }
}
