//! In-memory implementation of KeyValueStore.
//!
//! A single `RwLock` guards the whole keyspace, so each trait method is
//! atomic. All data is lost when the store is dropped.

use crate::{KeyValueStore, StorageResult};
use async_trait::async_trait;
use lore_error::{StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Value held at a key.
#[derive(Debug, Clone)]
enum Entry {
    Text(String),
    Hash(HashMap<String, String>),
}

/// In-memory key/value store.
///
/// Cloning shares the underlying keyspace.
///
/// # Example
/// ```no_run
/// use lore_storage::{KeyValueStore, MemoryStore};
///
/// #[tokio::main]
/// async fn main() {
///     let store = MemoryStore::new();
///     store.hincr_by("poll:p1:votes", "Car", 1).await.unwrap();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys (for testing).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the store is empty (for testing).
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every key (for testing).
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

fn wrong_type(key: &str, expected: &'static str) -> StorageError {
    StorageError::new(StorageErrorKind::WrongType {
        key: key.to_string(),
        expected,
    })
}

fn checked_step(key: &str, current: i64, delta: i64) -> StorageResult<i64> {
    current
        .checked_add(delta)
        .ok_or_else(|| StorageError::new(StorageErrorKind::Overflow(key.to_string())))
}

fn parse_integer(key: &str, raw: &str) -> StorageResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| StorageError::new(StorageErrorKind::NotAnInteger(key.to_string())))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match self.entries.read().await.get(key) {
            None => Ok(None),
            Some(Entry::Text(value)) => Ok(Some(value.clone())),
            Some(Entry::Hash(_)) => Err(wrong_type(key, "string")),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry::Text(value.to_string()));
        Ok(())
    }

    #[instrument(skip(self, value))]
    async fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(key) {
            debug!("Key already present");
            return Ok(false);
        }
        entries.insert(key.to_string(), Entry::Text(value.to_string()));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn incr_by(&self, key: &str, delta: i64) -> StorageResult<i64> {
        let mut entries = self.entries.write().await;
        let current = match entries.get(key) {
            None => 0,
            Some(Entry::Text(raw)) => parse_integer(key, raw)?,
            Some(Entry::Hash(_)) => return Err(wrong_type(key, "string")),
        };
        let next = checked_step(key, current, delta)?;
        entries.insert(key.to_string(), Entry::Text(next.to_string()));
        Ok(next)
    }

    #[instrument(skip(self))]
    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> StorageResult<i64> {
        let mut entries = self.entries.write().await;
        let hash = match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(hash) => hash,
            Entry::Text(_) => return Err(wrong_type(key, "hash")),
        };
        let current = match hash.get(field) {
            Some(raw) => parse_integer(key, raw)?,
            None => 0,
        };
        let next = checked_step(key, current, delta)?;
        hash.insert(field.to_string(), next.to_string());
        debug!(value = next, "Hash field incremented");
        Ok(next)
    }

    async fn hget_all(&self, key: &str) -> StorageResult<HashMap<String, String>> {
        match self.entries.read().await.get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(hash)) => Ok(hash.clone()),
            Some(Entry::Text(_)) => Err(wrong_type(key, "hash")),
        }
    }
}
