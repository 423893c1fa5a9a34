//! Key/value storage for stories and poll ledgers.
//!
//! The services only need a handful of primitives (string get/set, atomic
//! counters, hash counters, existence checks and set-if-absent). They are
//! expressed as the [`KeyValueStore`] trait so a Redis-style backend can be
//! dropped in; [`MemoryStore`] implements it in process.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod memory;
mod store;

pub use memory::MemoryStore;
pub use store::{KeyValueStore, StorageResult};
