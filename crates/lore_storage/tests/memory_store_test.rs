//! Tests for the in-memory key/value store.

use futures::future::join_all;
use lore_error::StorageErrorKind;
use lore_storage::{KeyValueStore, MemoryStore};

#[tokio::test]
async fn test_get_set_and_exists() {
    let store = MemoryStore::new();

    assert_eq!(store.get("greeting").await.unwrap(), None);
    assert!(!store.exists("greeting").await.unwrap());

    store.set("greeting", "hello").await.unwrap();
    assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("hello"));
    assert!(store.exists("greeting").await.unwrap());

    store.set("greeting", "bye").await.unwrap();
    assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("bye"));
}

#[tokio::test]
async fn test_set_if_absent_only_creates_once() {
    let store = MemoryStore::new();

    assert!(store.set_if_absent("marker", "1").await.unwrap());
    assert!(!store.set_if_absent("marker", "2").await.unwrap());
    assert_eq!(store.get("marker").await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_delete_reports_presence() {
    let store = MemoryStore::new();
    store.set("k", "v").await.unwrap();

    assert!(store.delete("k").await.unwrap());
    assert!(!store.delete("k").await.unwrap());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_incr_by_starts_at_zero() {
    let store = MemoryStore::new();

    assert_eq!(store.incr_by("count", 1).await.unwrap(), 1);
    assert_eq!(store.incr_by("count", 4).await.unwrap(), 5);
    assert_eq!(store.incr_by("count", -2).await.unwrap(), 3);
    assert_eq!(store.get("count").await.unwrap().as_deref(), Some("3"));
}

#[tokio::test]
async fn test_incr_by_rejects_non_integer() {
    let store = MemoryStore::new();
    store.set("count", "many").await.unwrap();

    let err = store.incr_by("count", 1).await.unwrap_err();
    assert!(matches!(err.kind(), StorageErrorKind::NotAnInteger(_)));
}

#[tokio::test]
async fn test_increment_past_range_is_an_error() {
    let store = MemoryStore::new();
    let max = i64::MAX.to_string();
    store.set("count", &max).await.unwrap();

    let err = store.incr_by("count", 1).await.unwrap_err();
    assert!(matches!(err.kind(), StorageErrorKind::Overflow(_)));
    assert_eq!(store.get("count").await.unwrap(), Some(max));

    store.hincr_by("votes", "Car", i64::MAX).await.unwrap();
    let err = store.hincr_by("votes", "Car", 1).await.unwrap_err();
    assert!(matches!(err.kind(), StorageErrorKind::Overflow(_)));
    assert_eq!(store.hget_all("votes").await.unwrap()["Car"], i64::MAX.to_string());
}

#[tokio::test]
async fn test_hash_counters() {
    let store = MemoryStore::new();

    assert!(store.hget_all("poll:p1:votes").await.unwrap().is_empty());

    store.hincr_by("poll:p1:votes", "Car", 1).await.unwrap();
    store.hincr_by("poll:p1:votes", "Car", 1).await.unwrap();
    store.hincr_by("poll:p1:votes", "SUV", 1).await.unwrap();

    let counts = store.hget_all("poll:p1:votes").await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts["Car"], "2");
    assert_eq!(counts["SUV"], "1");
}

#[tokio::test]
async fn test_type_mismatch_is_an_error() {
    let store = MemoryStore::new();
    store.set("plain", "text").await.unwrap();
    store.hincr_by("hash", "f", 1).await.unwrap();

    let err = store.hincr_by("plain", "f", 1).await.unwrap_err();
    assert!(matches!(err.kind(), StorageErrorKind::WrongType { .. }));

    let err = store.get("hash").await.unwrap_err();
    assert!(matches!(err.kind(), StorageErrorKind::WrongType { .. }));

    let err = store.hget_all("plain").await.unwrap_err();
    assert!(matches!(err.kind(), StorageErrorKind::WrongType { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let store = MemoryStore::new();

    let tasks = (0..100).map(|_| {
        let store = store.clone();
        tokio::spawn(async move { store.hincr_by("votes", "Car", 1).await })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let counts = store.hget_all("votes").await.unwrap();
    assert_eq!(counts["Car"], "100");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_set_if_absent_has_single_winner() {
    let store = MemoryStore::new();

    let tasks = (0..50).map(|i| {
        let store = store.clone();
        tokio::spawn(async move { store.set_if_absent("marker", &i.to_string()).await })
    });
    let winners = join_all(tasks)
        .await
        .into_iter()
        .filter(|r| *r.as_ref().unwrap().as_ref().unwrap())
        .count();

    assert_eq!(winners, 1);
}
