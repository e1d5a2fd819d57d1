/// Per-tab "filter active" flags, written through to durable storage
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{FilterError, Result};
use crate::tab_kind::TabKind;

/// Marker recording that first-run initialization already happened
pub const INITIALIZED_KEY: &str = "yt-unwatched-initialized";

const TRUE_LITERAL: &str = "true";
const FALSE_LITERAL: &str = "false";

/// Synchronous string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Make every subsequent call fail, like a blocked localStorage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.unavailable.get() {
            return Err(FilterError::Storage("memory store unavailable".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.unavailable.get() {
            return Err(FilterError::Storage("memory store unavailable".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Snapshot of all three tab flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabFlags {
    pub videos: bool,
    pub shorts: bool,
    pub live: bool,
}

impl TabFlags {
    pub fn get(&self, kind: TabKind) -> bool {
        match kind {
            TabKind::Videos => self.videos,
            TabKind::Shorts => self.shorts,
            TabKind::Live => self.live,
        }
    }

    pub fn set(&mut self, kind: TabKind, value: bool) {
        match kind {
            TabKind::Videos => self.videos = value,
            TabKind::Shorts => self.shorts = value,
            TabKind::Live => self.live = value,
        }
    }
}

/// Anything but the exact "true" literal reads as OFF
fn decode_flag(raw: Option<&str>) -> bool {
    raw == Some(TRUE_LITERAL)
}

fn encode_flag(value: bool) -> &'static str {
    if value { TRUE_LITERAL } else { FALSE_LITERAL }
}

/// Tab flag store. Storage failures switch it to memory-only for the
/// rest of the session; no method returns an error.
pub struct TabStateStore<S: KeyValueStore> {
    backend: S,
    flags: TabFlags,
    degraded: bool,
}

impl<S: KeyValueStore> TabStateStore<S> {
    pub fn new(backend: S) -> Self {
        TabStateStore {
            backend,
            flags: TabFlags::default(),
            degraded: false,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn flags(&self) -> TabFlags {
        self.flags
    }

    pub fn is_active(&self, kind: TabKind) -> bool {
        self.flags.get(kind)
    }

    /// Force every flag OFF once per installation. Idempotent.
    pub fn initialize_if_first_run(&mut self) {
        let marker = self.read(INITIALIZED_KEY);
        if decode_flag(marker.as_deref()) {
            return;
        }
        log::info!("Unwatched filter: first run, resetting all tab states to OFF");
        self.reset_all();
        self.write(INITIALIZED_KEY, TRUE_LITERAL);
    }

    pub fn reset_all(&mut self) {
        for kind in TabKind::ALL {
            self.set_active(kind, false);
        }
    }

    /// Refresh the in-memory flags from durable storage
    pub fn load(&mut self) -> TabFlags {
        if !self.degraded {
            for kind in TabKind::ALL {
                let raw = self.read(kind.storage_key());
                self.flags.set(kind, decode_flag(raw.as_deref()));
            }
        }
        log::debug!("Unwatched filter: loaded tab states {:?}", self.flags);
        self.flags
    }

    pub fn set_active(&mut self, kind: TabKind, value: bool) {
        self.flags.set(kind, value);
        self.write(kind.storage_key(), encode_flag(value));
    }

    /// Bring memory and durable storage back to `expected` if either drifted.
    /// Returns whether anything had to be rewritten.
    pub fn repair_if_inconsistent(&mut self, kind: TabKind, expected: bool) -> bool {
        let durable = if self.degraded {
            Some(expected)
        } else {
            self.read(kind.storage_key())
                .map(|raw| decode_flag(Some(raw.as_str())))
        };
        if self.flags.get(kind) == expected && durable == Some(expected) {
            return false;
        }
        log::info!(
            "Unwatched filter: repairing {} state to {} (memory {}, stored {:?})",
            kind,
            expected,
            self.flags.get(kind),
            durable
        );
        self.set_active(kind, expected);
        true
    }

    fn read(&mut self, key: &str) -> Option<String> {
        if self.degraded {
            return None;
        }
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                self.degrade(e);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if self.degraded {
            return;
        }
        if let Err(e) = self.backend.set(key, value) {
            self.degrade(e);
        }
    }

    fn degrade(&mut self, err: FilterError) {
        log::warn!(
            "Unwatched filter: storage unavailable, keeping tab states in memory only: {}",
            err
        );
        self.degraded = true;
    }
}
