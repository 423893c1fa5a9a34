//! Story construction and reading session error types.

/// Specific error conditions for story operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoryErrorKind {
    /// Page scan found no pages in the flat record
    #[display("Story has no pages (page_1_story is missing)")]
    MalformedStory,
    /// No story is stored under the requested id
    #[display("Story '{}' not found", _0)]
    NotFound(String),
    /// A choice was made on a page that carries no personal choice
    #[display("Page {} has no personal choice", _0)]
    NoChoiceOnPage(usize),
    /// Option id does not belong to the visible page's choice
    #[display("Option '{}' is not part of choice '{}'", option, choice)]
    UnknownOption {
        /// Choice id on the visible page
        choice: String,
        /// Option id that was requested
        option: String,
    },
    /// Requested page number outside the story
    #[display("Page {} is outside the story ({} pages)", page, count)]
    PageOutOfRange {
        /// Requested 1-based page number
        page: usize,
        /// Number of pages in the story
        count: usize,
    },
    /// Session snapshot could not be encoded or decoded
    #[display("Session snapshot error: {}", _0)]
    Snapshot(String),
}

/// Error type for story operations.
///
/// # Examples
///
/// ```
/// use lore_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::MalformedStory);
/// assert!(format!("{}", err).contains("no pages"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryErrorKind {
        &self.kind
    }
}
