//! Session-scoped persistence of the sidebar scroll offset.
//!
//! The widget only ever needs one value, so the store interface is a plain
//! string key-value port and `ScrollSlot` narrows it to the single key.

use std::collections::HashMap;

/// Key under which the scroll offset is stored.
pub const SCROLL_KEY: &str = "sidebar-scroll";

/// String key-value store scoped to the browsing session.
///
/// Implementations swallow their own failures: a store that cannot be read
/// behaves as empty, a failed write is dropped.
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) {
        (**self).remove_item(key)
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// The single persisted scroll offset.
///
/// Written on every sidebar link click, consumed once by the next page.
#[derive(Debug)]
pub struct ScrollSlot<S> {
    store: S,
    key: String,
}

impl<S: SessionStore> ScrollSlot<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, SCROLL_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Stored offset, if any. Unparseable values count as absent.
    pub fn get(&self) -> Option<i32> {
        let raw = self.store.get_item(&self.key)?;
        parse_offset(&raw)
    }

    pub fn set(&mut self, offset: i32) {
        self.store.set_item(&self.key, &offset.to_string());
    }

    pub fn clear(&mut self) {
        self.store.remove_item(&self.key);
    }

    /// Read and remove in one step; the slot is always empty afterwards.
    pub fn take(&mut self) -> Option<i32> {
        let raw = self.store.get_item(&self.key);
        self.clear();
        parse_offset(raw.as_deref()?)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn parse_offset(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value.round() as i32),
        _ => {
            log::warn!("ignoring stored sidebar scroll offset {raw:?}");
            None
        }
    }
}
