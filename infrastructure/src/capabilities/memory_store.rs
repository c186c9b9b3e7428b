//! Process-local memory store.

use async_trait::async_trait;
use dispatch_application::ports::MemoryStore;
use dispatch_domain::ToolError;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;

/// [`MemoryStore`] kept in a sorted map; contents die with the process.
#[derive(Debug, Default)]
pub struct InMemoryMemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn save(&self, key: &str, value: Value) -> Result<(), ToolError> {
        if key.is_empty() {
            return Err(ToolError::invalid_argument("Memory key cannot be empty"));
        }
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, ToolError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<(String, Value)>, ToolError> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|(key, _)| key.contains(query))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_get_search() {
        let store = InMemoryMemoryStore::new();
        store.save("user.name", json!("ada")).await.unwrap();
        store.save("user.lang", json!("rust")).await.unwrap();
        store.save("session", json!(1)).await.unwrap();

        assert_eq!(store.get("user.name").await.unwrap(), Some(json!("ada")));
        assert_eq!(store.get("missing").await.unwrap(), None);

        let keys: Vec<String> = store
            .search("user.")
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["user.lang", "user.name"]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let store = InMemoryMemoryStore::new();
        assert!(store.save("", json!(null)).await.is_err());
        assert!(store.is_empty());
    }
}
