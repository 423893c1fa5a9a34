//! Tests for the optimistic poll view.

use async_trait::async_trait;
use lore_core::Poll;
use lore_error::{LedgerError, LedgerErrorKind, StorageError, StorageErrorKind};
use lore_poll::{
    LedgerPollClient, LedgerResult, PollClient, PollLedger, PollTally, PollView, VoteFailure,
    VoteState,
};
use lore_storage::MemoryStore;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn poll() -> Poll {
    Poll::new(
        "ep1-final",
        "What should John test drive first?",
        vec!["Car".to_string(), "SUV".to_string(), "Truck".to_string()],
    )
}

/// Client whose every call fails with a storage error.
struct DownClient;

fn down() -> LedgerError {
    StorageError::new(StorageErrorKind::Unavailable("offline".to_string())).into()
}

#[async_trait]
impl PollClient for DownClient {
    async fn fetch_counts(&self, _poll_id: &str) -> LedgerResult<BTreeMap<String, u64>> {
        Err(down())
    }

    async fn submit_vote(&self, _poll_id: &str, _option: &str) -> LedgerResult<()> {
        Err(down())
    }
}

/// Client that serves fixed counts and rejects votes as repeats.
struct RepeatClient(BTreeMap<String, u64>);

#[async_trait]
impl PollClient for RepeatClient {
    async fn fetch_counts(&self, _poll_id: &str) -> LedgerResult<BTreeMap<String, u64>> {
        Ok(self.0.clone())
    }

    async fn submit_vote(&self, poll_id: &str, _option: &str) -> LedgerResult<()> {
        Err(LedgerError::new(LedgerErrorKind::AlreadyVoted {
            poll_id: poll_id.to_string(),
            user_id: "alice".to_string(),
        }))
    }
}

async fn seeded_ledger() -> PollLedger<MemoryStore> {
    let ledger = PollLedger::new(Arc::new(MemoryStore::new()));
    ledger.cast_vote("ep1-final", "bob", "Car").await.unwrap();
    ledger.cast_vote("ep1-final", "carol", "SUV").await.unwrap();
    ledger
}

#[test]
fn test_tally_zero_fills_known_options_first() {
    let counts: BTreeMap<String, u64> =
        [("Bike".to_string(), 2), ("SUV".to_string(), 2)].into_iter().collect();
    let tally = PollTally::from_counts(&poll(), &counts);

    let options: Vec<String> = tally.rows().iter().map(|r| r.option().clone()).collect();
    assert_eq!(options, vec!["Car", "SUV", "Truck", "Bike"]);
    assert_eq!(tally.total(), 4);
    assert_eq!(tally.pct("SUV"), 50);
    assert_eq!(tally.pct("Car"), 0);
}

#[test]
fn test_tally_from_wire_coerces_strings() {
    let counts = json!({"Car": "3", "SUV": 1, "Truck": "lots"});
    let tally = PollTally::from_wire(&poll(), counts.as_object().unwrap());

    assert_eq!(tally.count("Car"), 3);
    assert_eq!(tally.count("SUV"), 1);
    assert_eq!(tally.count("Truck"), 0);
    assert_eq!(tally.pct("Car"), 75);
}

#[tokio::test]
async fn test_vote_commits_and_reveals_results() {
    let ledger = seeded_ledger().await;
    let client = LedgerPollClient::new(ledger.clone(), "alice".to_string());
    let mut view = PollView::new(poll());

    view.load(&client).await;
    assert!(!view.show_results());
    assert_eq!(view.tally().total(), 2);

    let state = view.vote(&client, "Truck").await.clone();
    assert_eq!(
        state,
        VoteState::Committed {
            option: "Truck".to_string()
        }
    );
    assert!(view.show_results());
    assert!(!view.can_vote());
    assert_eq!(view.tally().count("Truck"), 1);

    let selected: Vec<_> = view.rows().into_iter().filter(|r| *r.selected()).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].option(), "Truck");
    assert_eq!(*selected[0].pct(), 33);

    view.load(&client).await;
    assert_eq!(view.tally().total(), 3);
}

#[tokio::test]
async fn test_second_vote_in_view_is_ignored() {
    let ledger = seeded_ledger().await;
    let client = LedgerPollClient::new(ledger.clone(), "alice".to_string());
    let mut view = PollView::new(poll());
    view.load(&client).await;

    view.vote(&client, "Car").await;
    view.vote(&client, "SUV").await;

    assert_eq!(view.state().selected(), Some("Car"));
    assert_eq!(ledger.get_counts("ep1-final").await.unwrap().get("SUV"), Some(&1));
}

#[tokio::test]
async fn test_failed_vote_rolls_back_counts() {
    let mut view = PollView::new(poll());
    view.load(&DownClient).await;
    assert_eq!(view.tally(), &PollTally::zeroed(&poll()));

    let state = view.vote(&DownClient, "Car").await.clone();
    assert!(matches!(
        state,
        VoteState::RolledBack { ref option, failure: VoteFailure::Failed(_) } if option == "Car"
    ));
    assert_eq!(view.tally().total(), 0);
    assert!(view.can_vote());
    assert!(!view.show_results());
}

#[tokio::test]
async fn test_already_voted_rolls_back_to_server_counts() {
    let counts: BTreeMap<String, u64> = [("Car".to_string(), 4)].into_iter().collect();
    let client = RepeatClient(counts);
    let mut view = PollView::new(poll());
    view.load(&client).await;

    let state = view.vote(&client, "Car").await.clone();
    assert!(matches!(
        state,
        VoteState::RolledBack {
            failure: VoteFailure::AlreadyVoted,
            ..
        }
    ));
    assert_eq!(view.tally().count("Car"), 4);
    assert!(view.rows().iter().all(|r| !*r.selected()));
    assert!(view.show_results());
    assert!(!view.can_vote());
}

#[tokio::test]
async fn test_reader_counted_elsewhere_sees_results() {
    let ledger = seeded_ledger().await;
    ledger.cast_vote("ep1-final", "alice", "Car").await.unwrap();
    let client = LedgerPollClient::new(ledger.clone(), "alice".to_string());
    let mut view = PollView::new(poll());
    view.load(&client).await;

    let state = view.vote(&client, "SUV").await.clone();
    assert_eq!(
        state,
        VoteState::RolledBack {
            option: "SUV".to_string(),
            failure: VoteFailure::AlreadyVoted,
        }
    );
    assert!(view.show_results());
    assert!(!view.can_vote());
    assert_eq!(view.tally().count("Car"), 2);
    assert_eq!(view.tally().count("SUV"), 1);

    view.vote(&client, "Truck").await;
    assert_eq!(ledger.get_counts("ep1-final").await.unwrap().get("Truck"), None);
}

#[test]
fn test_pending_state_is_optimistic() {
    let mut view = PollView::new(poll());

    assert!(view.begin_vote("SUV"));
    assert!(view.show_results());
    assert_eq!(view.tally().count("SUV"), 1);
    assert!(!view.begin_vote("Car"));

    view.roll_back(VoteFailure::Failed("timeout".to_string()));
    assert_eq!(view.tally().count("SUV"), 0);

    assert!(view.begin_vote("Car"));
    view.commit();
    assert_eq!(view.state().selected(), Some("Car"));
    view.roll_back(VoteFailure::AlreadyVoted);
    assert_eq!(view.tally().count("Car"), 1, "rollback only applies while pending");
}
