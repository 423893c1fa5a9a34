//! Community polls for LoreTogether.
//!
//! - [`PollLedger`] is the server-side record of per-option counters and
//!   per-user "already voted" markers, stored in a
//!   [`lore_storage::KeyValueStore`].
//! - [`PollTally`] turns stored counts into display rows with [`pct`].
//! - [`PollView`] drives the reader-facing poll with an explicit
//!   `Idle → Pending → Committed | RolledBack` vote state machine.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ledger;
mod tally;
mod view;

pub use ledger::{
    LedgerConfig, LedgerConfigBuilder, LedgerResult, MarkerStrategy, PollLedger, pct,
};
pub use tally::{PollTally, TallyRow, coerce_count};
pub use view::{LedgerPollClient, PollClient, PollView, VoteFailure, VoteState};
