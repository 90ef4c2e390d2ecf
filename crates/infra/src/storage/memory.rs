//! Process-local storage, nothing survives a restart.

use std::collections::BTreeMap;

use lago_core::LocalStorage;
use lago_domain::Result;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items.write().remove(key);
        Ok(())
    }
}
