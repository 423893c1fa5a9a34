//! End-of-story community poll.

use serde::{Deserialize, Serialize};

/// Community poll closing a story.
///
/// The authoring tool produces two or three options; readers tolerate any
/// non-empty list.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Poll {
    /// Ledger key for this poll
    id: String,
    /// Question shown above the options
    question: String,
    /// Distinct option strings in display order
    options: Vec<String>,
}

impl Poll {
    /// Creates a poll from its id, question and options.
    pub fn new(id: impl Into<String>, question: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            options,
        }
    }

    /// Returns a builder for constructing a Poll.
    pub fn builder() -> PollBuilder {
        PollBuilder::default()
    }

    /// True when `option` is one of the configured options.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}
