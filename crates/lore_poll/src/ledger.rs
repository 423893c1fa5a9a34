//! Server-side poll ledger: one vote per user per poll.

use lore_error::{LedgerError, LedgerErrorKind};
use lore_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::tally::parse_count;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// How the per-user voter marker is claimed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MarkerStrategy {
    /// Claim the marker with set-if-absent before incrementing, so concurrent
    /// requests from one user count exactly once.
    #[default]
    Atomic,
    /// Check for the marker, increment, then set the marker. Concurrent
    /// requests from one user can both pass the check and both count.
    CheckThenSet,
}

/// Poll ledger configuration.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct LedgerConfig {
    /// Voter marker strategy
    #[serde(default)]
    marker_strategy: MarkerStrategy,
}

impl LedgerConfig {
    /// Returns a builder for constructing a LedgerConfig.
    pub fn builder() -> LedgerConfigBuilder {
        LedgerConfigBuilder::default()
    }
}

/// Per-option vote counters plus per-user voter markers.
///
/// Counters live in the hash `poll:<pollId>:votes` (option → count) and each
/// voter marker at `poll:<pollId>:voter:<userId>`. Counters only ever grow.
///
/// # Example
/// ```no_run
/// use lore_poll::PollLedger;
/// use lore_storage::MemoryStore;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let ledger = PollLedger::new(Arc::new(MemoryStore::new()));
///     ledger.cast_vote("ep1-final", "alice", "Car").await.unwrap();
///     assert!(ledger.cast_vote("ep1-final", "alice", "SUV").await.unwrap_err().is_already_voted());
/// }
/// ```
#[derive(Debug)]
pub struct PollLedger<S> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S> Clone for PollLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: KeyValueStore> PollLedger<S> {
    /// Create a ledger with the default (atomic) marker strategy.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Create a ledger with explicit configuration.
    pub fn with_config(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Ledger configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn votes_key(poll_id: &str) -> String {
        format!("poll:{}:votes", poll_id)
    }

    fn voter_key(poll_id: &str, user_id: &str) -> String {
        format!("poll:{}:voter:{}", poll_id, user_id)
    }

    /// Counters exactly as stored. A poll without votes yields an empty map.
    #[instrument(skip(self))]
    pub async fn stored_counts(&self, poll_id: &str) -> LedgerResult<BTreeMap<String, String>> {
        let counts = self.store.hget_all(&Self::votes_key(poll_id)).await?;
        debug!(options = counts.len(), "Fetched stored counts");
        Ok(counts.into_iter().collect())
    }

    /// Counters as numbers; values that do not parse count as 0.
    pub async fn get_counts(&self, poll_id: &str) -> LedgerResult<BTreeMap<String, u64>> {
        Ok(self
            .stored_counts(poll_id)
            .await?
            .into_iter()
            .map(|(option, count)| {
                let count = parse_count(&count);
                (option, count)
            })
            .collect())
    }

    /// True when `user_id` already has a vote recorded on `poll_id`.
    pub async fn has_voted(&self, poll_id: &str, user_id: &str) -> LedgerResult<bool> {
        Ok(self.store.exists(&Self::voter_key(poll_id, user_id)).await?)
    }

    /// Record one vote for `option` by `user_id`.
    ///
    /// The option is not checked against the poll's configured options; any
    /// string gets a counter.
    ///
    /// # Errors
    ///
    /// [`LedgerErrorKind::AlreadyVoted`] when the user already voted on this
    /// poll (counters untouched), or a storage error. Under the atomic
    /// strategy a failed increment releases the marker again so the user can
    /// retry.
    #[instrument(skip(self), fields(strategy = %self.config.marker_strategy))]
    pub async fn cast_vote(&self, poll_id: &str, user_id: &str, option: &str) -> LedgerResult<()> {
        let voter_key = Self::voter_key(poll_id, user_id);
        let votes_key = Self::votes_key(poll_id);

        match self.config.marker_strategy {
            MarkerStrategy::Atomic => {
                if !self.store.set_if_absent(&voter_key, "1").await? {
                    return Err(already_voted(poll_id, user_id));
                }
                if let Err(e) = self.store.hincr_by(&votes_key, option, 1).await {
                    if let Err(release) = self.store.delete(&voter_key).await {
                        warn!(error = %release, "Failed to release voter marker after failed increment");
                    }
                    return Err(e.into());
                }
            }
            MarkerStrategy::CheckThenSet => {
                if self.store.exists(&voter_key).await? {
                    return Err(already_voted(poll_id, user_id));
                }
                self.store.hincr_by(&votes_key, option, 1).await?;
                self.store.set(&voter_key, "1").await?;
            }
        }

        info!("Vote counted");
        Ok(())
    }
}

#[track_caller]
fn already_voted(poll_id: &str, user_id: &str) -> LedgerError {
    warn!(poll_id, user_id, "Rejected repeat vote");
    LedgerError::new(LedgerErrorKind::AlreadyVoted {
        poll_id: poll_id.to_string(),
        user_id: user_id.to_string(),
    })
}

/// Whole-number percentage of `count` in `total`, 0 when nothing was counted.
///
/// ```
/// use lore_poll::pct;
///
/// assert_eq!(pct(1, 2), 50);
/// assert_eq!(pct(1, 3), 33);
/// assert_eq!(pct(2, 3), 67);
/// assert_eq!(pct(0, 0), 0);
/// ```
pub fn pct(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u32
}
