//! Poll ledger error types.

use crate::StorageError;

/// Error kinds for poll ledger operations.
#[derive(Debug, Clone, derive_more::Display)]
pub enum LedgerErrorKind {
    /// The user already has a counted vote on this poll
    #[display("User '{}' already voted on poll '{}'", user_id, poll_id)]
    AlreadyVoted {
        /// Poll that was voted on
        poll_id: String,
        /// User attempting to vote again
        user_id: String,
    },
    /// The underlying store failed
    #[display("{}", _0)]
    Storage(StorageError),
}

impl From<StorageError> for LedgerErrorKind {
    fn from(err: StorageError) -> Self {
        LedgerErrorKind::Storage(err)
    }
}

/// Poll ledger error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ledger Error: {} at line {} in {}", kind, line, file)]
pub struct LedgerError {
    kind: LedgerErrorKind,
    line: u32,
    file: &'static str,
}

impl LedgerError {
    /// Create a new ledger error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LedgerErrorKind {
        &self.kind
    }

    /// True when the failure is a repeat vote rather than a fault.
    pub fn is_already_voted(&self) -> bool {
        matches!(self.kind, LedgerErrorKind::AlreadyVoted { .. })
    }
}

impl<T> From<T> for LedgerError
where
    T: Into<LedgerErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}
