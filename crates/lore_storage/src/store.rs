//! The key/value store trait.

use async_trait::async_trait;
use lore_error::StorageError;
use std::collections::HashMap;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Redis-like key/value store.
///
/// Keys hold either a string value or a hash of string fields. Every method is
/// atomic with respect to the key it touches; in particular
/// [`set_if_absent`](KeyValueStore::set_if_absent) and the increment methods
/// are safe under concurrent callers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a string value.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Set a string value, replacing whatever the key held.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Set a string value only if the key does not exist.
    ///
    /// Returns `true` when this call created the key.
    async fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool>;

    /// Delete a key of any type. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Atomically add `delta` to an integer string value (missing counts as 0).
    async fn incr_by(&self, key: &str, delta: i64) -> StorageResult<i64>;

    /// Atomically add `delta` to an integer hash field (missing counts as 0).
    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> StorageResult<i64>;

    /// All fields of a hash as stored; a missing key yields an empty map.
    async fn hget_all(&self, key: &str) -> StorageResult<HashMap<String, String>>;
}
