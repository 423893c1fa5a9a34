//! The canonical story value.

use crate::{Page, Poll};
use serde::{Deserialize, Serialize};

/// One episode of a series: ordered pages and an optional closing poll.
///
/// A `Story` is read-only once built; the reading flow shares it behind an
/// `Arc` instead of consulting any global.
///
/// # Examples
///
/// ```
/// use lore_core::{Page, Story};
///
/// let story = Story::builder()
///     .id("ep1")
///     .title("Man and His Dog")
///     .series("Alpha Run")
///     .chapter(1u32)
///     .pages(vec![Page::plain("p1", "John walked down the street.")])
///     .build()
///     .unwrap();
///
/// assert_eq!(story.page_count(), 1);
/// assert!(story.poll().is_none());
/// ```
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
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Story {
    /// Story identifier
    id: String,
    /// Episode title
    title: String,
    /// Series the episode belongs to
    series: String,
    /// Chapter number, starting at 1
    chapter: u32,
    /// Pages in reading order, never empty
    pages: Vec<Page>,
    /// Closing poll, `None` when the story has none
    #[builder(default)]
    poll: Option<Poll>,
}

impl StoryBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.pages {
            Some(pages) if pages.is_empty() => Err("Story needs at least one page".to_string()),
            _ => Ok(()),
        }
    }
}

impl Story {
    /// Creates a story from its parts. Callers supply at least one page.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        series: impl Into<String>,
        chapter: u32,
        pages: Vec<Page>,
        poll: Option<Poll>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            series: series.into(),
            chapter,
            pages,
            poll,
        }
    }

    /// Returns a builder for constructing a Story.
    pub fn builder() -> StoryBuilder {
        StoryBuilder::default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page by zero-based index.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Iterates over the personal choices in reading order.
    pub fn personal_choices(&self) -> impl Iterator<Item = &crate::PersonalChoice> {
        self.pages.iter().filter_map(Page::personal_choice)
    }
}
