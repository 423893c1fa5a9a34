//! Error types for the LoreTogether workspace.
//!
//! Every layer has its own `*ErrorKind` enum describing what went wrong and a
//! `*Error` struct that records where it went wrong. [`LoreError`] wraps any of
//! them so that callers spanning several layers can use a single result type.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod ledger;
mod storage;
mod story;
mod validation;

pub use config::ConfigError;
pub use ledger::{LedgerError, LedgerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use story::{StoryError, StoryErrorKind};
pub use validation::ValidationError;

/// Crate-spanning error variants.
#[derive(Debug, derive_more::From)]
pub enum LoreErrorKind {
    /// Story construction or reading session error
    Story(StoryError),
    /// Authoring submission rejected
    Validation(ValidationError),
    /// Poll ledger error
    Ledger(LedgerError),
    /// Key/value storage error
    Storage(StorageError),
    /// Configuration error
    Config(ConfigError),
}

impl std::fmt::Display for LoreErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoreErrorKind::Story(e) => write!(f, "{}", e),
            LoreErrorKind::Validation(e) => write!(f, "{}", e),
            LoreErrorKind::Ledger(e) => write!(f, "{}", e),
            LoreErrorKind::Storage(e) => write!(f, "{}", e),
            LoreErrorKind::Config(e) => write!(f, "{}", e),
        }
    }
}

/// LoreTogether error with kind discrimination.
///
/// # Examples
///
/// ```
/// use lore_error::{LoreError, LoreErrorKind, StoryError, StoryErrorKind};
///
/// let err: LoreError = StoryError::new(StoryErrorKind::MalformedStory).into();
/// assert!(matches!(err.kind(), LoreErrorKind::Story(_)));
/// ```
#[derive(Debug)]
pub struct LoreError(Box<LoreErrorKind>);

impl LoreError {
    /// Create a new error from a kind.
    pub fn new(kind: LoreErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LoreErrorKind {
        &self.0
    }
}

impl std::fmt::Display for LoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lore Error: {}", self.0)
    }
}

impl std::error::Error for LoreError {}

impl<T> From<T> for LoreError
where
    T: Into<LoreErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for LoreTogether operations.
pub type LoreResult<T> = std::result::Result<T, LoreError>;
