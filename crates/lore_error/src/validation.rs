//! Authoring validation error types.

/// Authoring submission rejected with every violated rule.
///
/// The messages are collected before failing so an author can fix the whole
/// submission in one pass.
///
/// # Examples
///
/// ```
/// use lore_error::ValidationError;
///
/// let err = ValidationError::new(vec![
///     "Page 1: story content is required".to_string(),
///     "Poll needs at least 2 options".to_string(),
/// ]);
/// assert_eq!(err.messages().len(), 2);
/// assert!(format!("{}", err).contains("2 problems"));
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    messages: Vec<String>,
    line: u32,
    file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(messages: Vec<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            messages,
            line: location.line(),
            file: location.file(),
        }
    }

    /// All violation messages, in the order they were found.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consume the error, returning the messages.
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation Error: {} problems ({}) at line {} in {}",
            self.messages.len(),
            self.messages.join("; "),
            self.line,
            self.file
        )
    }
}

impl std::error::Error for ValidationError {}
