//! Storage error types.

/// Kinds of key/value storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Operation applied to a key holding a different value type
    #[display("Wrong value type at key '{}': expected {}", key, expected)]
    WrongType {
        /// Key that was accessed
        key: String,
        /// Value type the operation requires
        expected: &'static str,
    },
    /// Increment applied to a value that is not an integer
    #[display("Value at '{}' is not an integer", _0)]
    NotAnInteger(String),
    /// Increment would take the stored integer past its range
    #[display("Value at '{}' would overflow", _0)]
    Overflow(String),
    /// Failed to encode or decode a stored value
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
    /// Storage backend is unavailable
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
    /// Generic storage error with message
    #[display("{}", _0)]
    Other(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use lore_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Unavailable("connection reset".to_string()));
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorageErrorKind {
        &self.kind
    }
}
