//! Reader-facing poll state with optimistic voting.

use crate::ledger::{LedgerResult, PollLedger};
use crate::tally::{PollTally, TallyRow};
use async_trait::async_trait;
use lore_core::Poll;
use lore_storage::KeyValueStore;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Transport between the poll view and the ledger.
#[async_trait]
pub trait PollClient: Send + Sync {
    /// Current counts for a poll.
    async fn fetch_counts(&self, poll_id: &str) -> LedgerResult<BTreeMap<String, u64>>;

    /// Cast the current reader's vote.
    async fn submit_vote(&self, poll_id: &str, option: &str) -> LedgerResult<()>;
}

/// [`PollClient`] talking to an in-process ledger on behalf of one user.
#[derive(Debug, Clone, derive_new::new)]
pub struct LedgerPollClient<S> {
    ledger: PollLedger<S>,
    user_id: String,
}

#[async_trait]
impl<S: KeyValueStore + 'static> PollClient for LedgerPollClient<S> {
    async fn fetch_counts(&self, poll_id: &str) -> LedgerResult<BTreeMap<String, u64>> {
        self.ledger.get_counts(poll_id).await
    }

    async fn submit_vote(&self, poll_id: &str, option: &str) -> LedgerResult<()> {
        self.ledger.cast_vote(poll_id, &self.user_id, option).await
    }
}

/// Why a vote was rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteFailure {
    /// The reader had already voted
    AlreadyVoted,
    /// The vote could not be recorded
    Failed(String),
}

/// Vote lifecycle as seen by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoteState {
    /// No vote cast in this view
    #[default]
    Idle,
    /// Vote sent, counts already bumped locally
    Pending {
        /// Option voted for
        option: String,
    },
    /// Server accepted the vote
    Committed {
        /// Option voted for
        option: String,
    },
    /// Vote failed or was rejected; local counts restored
    RolledBack {
        /// Option that was attempted
        option: String,
        /// Why it did not count
        failure: VoteFailure,
    },
}

impl VoteState {
    /// Option the reader's vote currently stands for.
    pub fn selected(&self) -> Option<&str> {
        match self {
            VoteState::Pending { option } | VoteState::Committed { option } => Some(option),
            VoteState::Idle | VoteState::RolledBack { .. } => None,
        }
    }
}

/// The end-of-story poll as a reader sees it.
///
/// Counts shown are the last server counts plus, while a vote is pending,
/// the reader's optimistic vote. Rolling back restores the server counts
/// exactly.
#[derive(Debug, Clone)]
pub struct PollView {
    poll: Poll,
    confirmed: PollTally,
    displayed: PollTally,
    state: VoteState,
}

impl PollView {
    /// A view with zeroed counts and no vote.
    pub fn new(poll: Poll) -> Self {
        let confirmed = PollTally::zeroed(&poll);
        Self {
            displayed: confirmed.clone(),
            confirmed,
            poll,
            state: VoteState::Idle,
        }
    }

    /// The poll being shown.
    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    /// Current vote state.
    pub fn state(&self) -> &VoteState {
        &self.state
    }

    /// Counts currently displayed.
    pub fn tally(&self) -> &PollTally {
        &self.displayed
    }

    /// Results are revealed once the reader has voted, including when the
    /// server reports a vote from an earlier visit.
    pub fn show_results(&self) -> bool {
        matches!(
            self.state,
            VoteState::Pending { .. }
                | VoteState::Committed { .. }
                | VoteState::RolledBack {
                    failure: VoteFailure::AlreadyVoted,
                    ..
                }
        )
    }

    /// Whether the option buttons are enabled. A reader the server already
    /// counted cannot vote again.
    pub fn can_vote(&self) -> bool {
        match &self.state {
            VoteState::Idle => true,
            VoteState::RolledBack { failure, .. } => *failure != VoteFailure::AlreadyVoted,
            VoteState::Pending { .. } | VoteState::Committed { .. } => false,
        }
    }

    /// Display rows with the reader's vote marked.
    pub fn rows(&self) -> Vec<TallyRow> {
        let selected = self.state.selected();
        self.displayed
            .rows()
            .into_iter()
            .map(|row| {
                let is_selected = selected == Some(row.option().as_str());
                TallyRow::new(row.option().clone(), *row.count(), *row.pct(), is_selected)
            })
            .collect()
    }

    /// Refreshes counts from the server. A failed fetch shows zeros.
    #[instrument(skip(self, client), fields(poll_id = %self.poll.id()))]
    pub async fn load(&mut self, client: &dyn PollClient) {
        self.confirmed = match client.fetch_counts(self.poll.id()).await {
            Ok(counts) => PollTally::from_counts(&self.poll, &counts),
            Err(e) => {
                warn!(error = %e, "Failed to fetch poll counts, showing zeros");
                PollTally::zeroed(&self.poll)
            }
        };
        self.displayed = self.confirmed.clone();
        if let VoteState::Pending { option } = &self.state {
            self.displayed.bump(option);
        }
    }

    /// Moves to `Pending`, bumping the displayed count. Returns false when a
    /// vote is already pending or committed.
    pub fn begin_vote(&mut self, option: &str) -> bool {
        if !self.can_vote() {
            return false;
        }
        self.displayed = self.confirmed.clone();
        self.displayed.bump(option);
        self.state = VoteState::Pending {
            option: option.to_string(),
        };
        true
    }

    /// `Pending → Committed`; the optimistic counts become the confirmed ones.
    pub fn commit(&mut self) {
        if let VoteState::Pending { option } = &self.state {
            self.confirmed = self.displayed.clone();
            self.state = VoteState::Committed {
                option: option.clone(),
            };
        }
    }

    /// `Pending → RolledBack`; displayed counts return to the confirmed ones.
    pub fn roll_back(&mut self, failure: VoteFailure) {
        if let VoteState::Pending { option } = &self.state {
            self.displayed = self.confirmed.clone();
            self.state = VoteState::RolledBack {
                option: option.clone(),
                failure,
            };
        }
    }

    /// Casts a vote through `client`: optimistic bump, then commit or roll back.
    #[instrument(skip(self, client), fields(poll_id = %self.poll.id()))]
    pub async fn vote(&mut self, client: &dyn PollClient, option: &str) -> &VoteState {
        if !self.begin_vote(option) {
            debug!("Vote ignored, already voted in this view");
            return &self.state;
        }
        match client.submit_vote(self.poll.id(), option).await {
            Ok(()) => self.commit(),
            Err(e) if e.is_already_voted() => self.roll_back(VoteFailure::AlreadyVoted),
            Err(e) => {
                warn!(error = %e, "Vote failed, rolling back");
                self.roll_back(VoteFailure::Failed(e.to_string()));
            }
        }
        &self.state
    }
}
