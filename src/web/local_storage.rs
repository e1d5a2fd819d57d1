/// `window.localStorage` as a [`KeyValueStore`]
use crate::error::{FilterError, Result};
use crate::storage::KeyValueStore;

/// Handle to the page's localStorage. Access can be denied (privacy
/// settings, sandboxed frames); every call then fails and the tab state
/// store falls back to memory.
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window().and_then(|window| match window.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("Unwatched filter: localStorage denied: {:?}", e);
                None
            }
        });
        LocalStorage { inner }
    }

    fn storage(&self) -> Result<&web_sys::Storage> {
        self.inner
            .as_ref()
            .ok_or_else(|| FilterError::Storage("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| FilterError::storage("get item", e))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| FilterError::storage("set item", e))
    }
}
