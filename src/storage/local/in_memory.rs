use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use anyhow::{anyhow, Result};

use crate::storage::area::{LocalStore, StorageArea};

type AreaMap = HashMap<String, String>;

/// In‑memory local storage (no persistence). Used as a default when no storage is configured.
#[derive(Default)]
pub struct InMemoryLocalStore {
    data: Arc<RwLock<HashMap<String, AreaMap>>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for InMemoryLocalStore {
    fn area(&self, origin: &url::Origin) -> Result<Arc<dyn StorageArea>> {
        let key = origin.ascii_serialization();
        {
            let mut guard = self.data.write().map_err(|_| anyhow!("local storage lock poisoned"))?;
            guard.entry(key.clone()).or_default();
        }

        Ok(Arc::new(InMemoryLocalArea {
            data: Arc::clone(&self.data),
            origin: key,
        }))
    }
}

struct InMemoryLocalArea {
    data: Arc<RwLock<HashMap<String, AreaMap>>>,
    origin: String,
}

impl InMemoryLocalArea {
    fn with_map<R>(&self, f: impl FnOnce(&mut AreaMap) -> R) -> Result<R> {
        let mut guard = self.data.write().map_err(|_| anyhow!("local storage lock poisoned"))?;
        Ok(f(guard.entry(self.origin.clone()).or_default()))
    }
}

impl StorageArea for InMemoryLocalArea {
    fn get_item(&self, key: &str) -> Option<String> {
        self.data.read().ok()?
            .get(&self.origin)
            .and_then(|m| m.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.with_map(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.with_map(|m| {
            m.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.with_map(|m| m.clear())
    }

    fn len(&self) -> usize {
        self.data.read()
            .map(|d| d.get(&self.origin).map(|m| m.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    fn keys(&self) -> Vec<String> {
        self.data.read()
            .map(|d| d.get(&self.origin).map(|m| m.keys().cloned().collect()).unwrap_or_default())
            .unwrap_or_default()
    }
}
