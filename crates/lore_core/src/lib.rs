//! Core data types for LoreTogether stories.
//!
//! A [`Story`] is an ordered list of [`Page`]s, some of which carry a
//! [`PersonalChoice`], optionally closed by a community [`Poll`]. A reader's
//! picks are held in [`ChoiceSelections`] and echoed back into later pages via
//! `{{choice_id}}` placeholders.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod page;
mod poll;
mod selections;
mod story;

pub use page::{ChoiceOption, Page, PersonalChoice, PersonalChoiceBuilder};
pub use poll::{Poll, PollBuilder};
pub use selections::ChoiceSelections;
pub use story::{Story, StoryBuilder};
