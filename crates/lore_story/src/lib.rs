//! Story assembly and reading for LoreTogether.
//!
//! Stories travel as flat, numbered-key records ([`FlatRecord`]) because that
//! is what the authoring form and the post data look like. This crate turns
//! such records into strongly-typed [`lore_core::Story`] values at the storage
//! boundary and never carries the flat shape further:
//!
//! - [`build_story`] assembles a story from a persisted record.
//! - [`resolve`] substitutes `{{token}}` placeholders with a reader's picks.
//! - [`validate_submission`] and [`prepare_story_record`] check an authoring
//!   submission, collecting every violation, and normalise it for storage.
//! - [`ReadingSession`] tracks the visible page and the reader's choices.
//! - [`StoryRepository`] persists records in a [`lore_storage::KeyValueStore`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod authoring;
mod builder;
mod fields;
mod record;
mod repository;
mod resolver;
mod sample;
mod session;

pub use authoring::{
    AuthoringReport, AuthoringViolation, MAX_CHOICE_OPTIONS, MAX_PAGES, MAX_POLL_OPTIONS,
    MIN_CHOICE_OPTIONS, MIN_POLL_OPTIONS, ViolationKind, prepare_story_record, validate_submission,
};
pub use builder::build_story;
pub use fields::normalize_poll_options;
pub use record::{FlatRecord, keys};
pub use repository::{PublishedStory, StoryRepository};
pub use resolver::{placeholder_names, resolve, unresolved_placeholders};
pub use sample::{SAMPLE_POLL_ID, SAMPLE_STORY_ID, sample_story_record};
pub use session::{ChoiceStore, ReadingSession, SessionSnapshot};
