//! Reading session: page navigation plus the reader's personal choices.

use crate::resolver::resolve;
use lore_core::{ChoiceOption, ChoiceSelections, Page, Story};
use lore_error::{StoryError, StoryErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Session-scoped store of personal choice selections.
///
/// Starts empty with every new session and is only mutated through
/// [`ReadingSession::choose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceStore {
    selections: ChoiceSelections,
}

impl ChoiceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selections, as consumed by the resolver.
    pub fn selections(&self) -> &ChoiceSelections {
        &self.selections
    }

    /// Chosen text for a choice.
    pub fn get(&self, choice_id: &str) -> Option<&str> {
        self.selections.get(choice_id)
    }

    pub(crate) fn record(&mut self, choice_id: &str, option_text: &str) {
        self.selections.insert(choice_id, option_text);
    }
}

/// Serializable session state: visible page and selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Story the snapshot belongs to
    story_id: String,
    /// Zero-based index of the visible page
    page_index: usize,
    /// Choices made so far
    selections: ChoiceSelections,
}

impl SessionSnapshot {
    /// Encodes the snapshot as JSON for session storage.
    pub fn to_json(&self) -> Result<String, StoryError> {
        serde_json::to_string(self)
            .map_err(|e| StoryError::new(StoryErrorKind::Snapshot(e.to_string())))
    }

    /// Decodes a snapshot previously produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, StoryError> {
        serde_json::from_str(json)
            .map_err(|e| StoryError::new(StoryErrorKind::Snapshot(e.to_string())))
    }
}

/// One reader's pass through one story.
///
/// The story is passed in explicitly and shared read-only; all mutable state
/// (visible page, choices) lives in the session.
///
/// # Examples
///
/// ```
/// use lore_story::{ReadingSession, build_story, sample_story_record};
/// use std::sync::Arc;
///
/// let story = Arc::new(build_story(&sample_story_record()).unwrap());
/// let mut session = ReadingSession::new(story).unwrap();
///
/// session.choose("collar_option_1").unwrap();
/// session.next();
/// assert!(session.resolved_text().contains("Blue"));
/// ```
#[derive(Debug, Clone)]
pub struct ReadingSession {
    story: Arc<Story>,
    page_index: usize,
    choices: ChoiceStore,
}

impl ReadingSession {
    /// Starts a session on the first page with no choices made.
    ///
    /// # Errors
    ///
    /// Fails with [`StoryErrorKind::MalformedStory`] for a story without pages.
    pub fn new(story: Arc<Story>) -> Result<Self, StoryError> {
        if story.page_count() == 0 {
            return Err(StoryError::new(StoryErrorKind::MalformedStory));
        }
        Ok(Self {
            story,
            page_index: 0,
            choices: ChoiceStore::new(),
        })
    }

    /// Restores a session from a snapshot taken earlier in the same session.
    ///
    /// # Errors
    ///
    /// Fails with [`StoryErrorKind::Snapshot`] when the snapshot belongs to a
    /// different story and with [`StoryErrorKind::PageOutOfRange`] when its
    /// page index no longer exists.
    pub fn restore(story: Arc<Story>, snapshot: SessionSnapshot) -> Result<Self, StoryError> {
        if snapshot.story_id != *story.id() {
            return Err(StoryError::new(StoryErrorKind::Snapshot(format!(
                "snapshot is for story '{}', not '{}'",
                snapshot.story_id,
                story.id()
            ))));
        }
        if snapshot.page_index >= story.page_count() {
            return Err(StoryError::new(StoryErrorKind::PageOutOfRange {
                page: snapshot.page_index + 1,
                count: story.page_count(),
            }));
        }
        Ok(Self {
            story,
            page_index: snapshot.page_index,
            choices: ChoiceStore {
                selections: snapshot.selections,
            },
        })
    }

    /// Captures the session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            story_id: self.story.id().clone(),
            page_index: self.page_index,
            selections: self.choices.selections.clone(),
        }
    }

    /// The story being read.
    pub fn story(&self) -> &Story {
        &self.story
    }

    /// The reader's choices.
    pub fn choices(&self) -> &ChoiceStore {
        &self.choices
    }

    /// The visible page.
    pub fn current_page(&self) -> &Page {
        &self.story.pages()[self.page_index]
    }

    /// 1-based number of the visible page.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    /// Number of pages in the story.
    pub fn page_count(&self) -> usize {
        self.story.page_count()
    }

    /// True on the first page.
    pub fn is_first(&self) -> bool {
        self.page_index == 0
    }

    /// True on the last page, where the poll is shown.
    pub fn is_last(&self) -> bool {
        self.page_index + 1 >= self.page_count()
    }

    /// Moves forward one page; stays put on the last page.
    pub fn next(&mut self) -> &Page {
        if !self.is_last() {
            self.page_index += 1;
        }
        self.current_page()
    }

    /// Moves back one page; stays put on the first page.
    pub fn previous(&mut self) -> &Page {
        if !self.is_first() {
            self.page_index -= 1;
        }
        self.current_page()
    }

    /// Jumps to a 1-based page number.
    pub fn go_to(&mut self, page: usize) -> Result<&Page, StoryError> {
        if page == 0 || page > self.page_count() {
            return Err(StoryError::new(StoryErrorKind::PageOutOfRange {
                page,
                count: self.page_count(),
            }));
        }
        self.page_index = page - 1;
        Ok(self.current_page())
    }

    /// Records the reader's pick on the visible page's personal choice.
    ///
    /// The option *text* is stored, replacing any earlier pick for the same
    /// choice.
    ///
    /// # Errors
    ///
    /// Fails when the visible page has no choice or the option id is not one
    /// of its options.
    #[instrument(skip(self), fields(page = self.page_number()))]
    pub fn choose(&mut self, option_id: &str) -> Result<(), StoryError> {
        let (choice_id, text) = {
            let choice = self
                .current_page()
                .personal_choice()
                .ok_or_else(|| StoryError::new(StoryErrorKind::NoChoiceOnPage(self.page_number())))?;
            let option = choice.option(option_id).ok_or_else(|| {
                StoryError::new(StoryErrorKind::UnknownOption {
                    choice: choice.id().clone(),
                    option: option_id.to_string(),
                })
            })?;
            (choice.id().clone(), option.text().clone())
        };
        debug!(choice = %choice_id, text = %text, "Choice recorded");
        self.choices.record(&choice_id, &text);
        Ok(())
    }

    /// The option chosen on the visible page, for highlighting.
    pub fn chosen_option(&self) -> Option<&ChoiceOption> {
        let choice = self.current_page().personal_choice()?;
        let text = self.choices.get(choice.id())?;
        choice.option_by_text(text)
    }

    /// Visible page text with placeholders resolved against current choices.
    pub fn resolved_text(&self) -> String {
        resolve(self.current_page().text(), self.choices.selections())
    }
}
