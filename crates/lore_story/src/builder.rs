//! Assembly of a [`Story`] from a flat record.

use crate::authoring::MAX_PAGES;
use crate::fields::{normalize_poll_options, parse_option_list};
use crate::record::{FlatRecord, keys};
use lore_core::{ChoiceOption, Page, PersonalChoice, Poll, Story};
use lore_error::{StoryError, StoryErrorKind};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Minimum usable options for a personal choice to be offered.
const MIN_OPTIONS: usize = 2;

/// Builds a story from a persisted flat record.
///
/// Pages are read from `page_1_story`, `page_2_story`, … and the scan stops at
/// the first missing index, so a gap truncates the story there. At most
/// [`MAX_PAGES`] pages are read. Everything else degrades gracefully: an
/// unreadable personal choice, or one reusing an earlier page's choice id,
/// leaves a plain page, and a poll without usable options is treated as absent.
///
/// # Errors
///
/// Returns [`StoryErrorKind::MalformedStory`] when `page_1_story` is missing.
///
/// # Examples
///
/// ```
/// use lore_story::{FlatRecord, build_story};
///
/// let mut record = FlatRecord::new();
/// record.insert("story_name", "Man and His Dog");
/// record.insert("page_1_story", "John kneeled beside Scout.");
/// record.insert("page_3_story", "Never reached.");
///
/// let story = build_story(&record).unwrap();
/// assert_eq!(story.page_count(), 1);
/// ```
#[instrument(skip_all, fields(story_id))]
pub fn build_story(record: &FlatRecord) -> Result<Story, StoryError> {
    let story_id = record.text(keys::STORY_ID).unwrap_or_default();
    tracing::Span::current().record("story_id", story_id.as_str());

    let pages = build_pages(record);
    if pages.is_empty() {
        warn!("Record has no page_1_story");
        return Err(StoryError::new(StoryErrorKind::MalformedStory));
    }

    let chapter = record
        .integer(keys::CHAPTER)
        .and_then(|c| u32::try_from(c).ok())
        .filter(|c| *c >= 1)
        .unwrap_or(1);

    let poll = build_poll(record, &story_id);
    debug!(
        pages = pages.len(),
        has_poll = poll.is_some(),
        "Story assembled"
    );

    Ok(Story::new(
        story_id,
        record.text(keys::STORY_NAME).unwrap_or_default(),
        record.text(keys::SERIES).unwrap_or_default(),
        chapter,
        pages,
        poll,
    ))
}

/// Reads contiguous pages starting at 1, up to [`MAX_PAGES`].
fn build_pages(record: &FlatRecord) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut choice_ids = HashSet::new();
    for number in 1..=MAX_PAGES {
        let story_key = FlatRecord::page_key(number, keys::PAGE_STORY);
        if !record.contains(&story_key) {
            break;
        }
        let id = format!("p{}", number);
        let text = record.text(&story_key).unwrap_or_default();
        let choice = build_choice(record, number).filter(|choice| {
            let first = choice_ids.insert(choice.id().clone());
            if !first {
                warn!(page = number, choice = %choice.id(), "Choice id already used on an earlier page, page shown without choice");
            }
            first
        });
        let page = match choice {
            Some(choice) => Page::with_choice(id, text, choice),
            None => Page::plain(id, text),
        };
        pages.push(page);
    }
    if record.contains(&FlatRecord::page_key(MAX_PAGES + 1, keys::PAGE_STORY)) {
        warn!(max = MAX_PAGES, "Record has more pages than allowed, extra pages dropped");
    }
    pages
}

/// Reads the personal choice attached to page `number`, if any.
fn build_choice(record: &FlatRecord, number: usize) -> Option<PersonalChoice> {
    let choice_id = record.non_blank(&FlatRecord::page_key(number, keys::PAGE_CHOICE_ID))?;
    let prompt = record
        .text(&FlatRecord::page_key(number, keys::PAGE_CHOICE_PROMPT))
        .unwrap_or_default();

    let Some(raw) = record
        .get(&FlatRecord::page_key(number, keys::PAGE_CHOICE_OPTIONS))
        .and_then(parse_option_list)
    else {
        warn!(page = number, choice = %choice_id, "Choice options unreadable, page shown without choice");
        return None;
    };

    let options: Vec<ChoiceOption> = raw
        .into_iter()
        .enumerate()
        .filter(|(_, option)| !option.is_blank())
        .map(|(index, option)| {
            let id = option
                .id
                .unwrap_or_else(|| ChoiceOption::derive_id(&choice_id, index + 1));
            ChoiceOption::new(id, option.text)
        })
        .collect();

    if options.len() < MIN_OPTIONS {
        warn!(
            page = number,
            choice = %choice_id,
            options = options.len(),
            "Choice has too few options, page shown without choice"
        );
        return None;
    }

    Some(PersonalChoice::new(choice_id, prompt, options))
}

/// Reads the closing poll, gated on a non-blank `poll_question`.
fn build_poll(record: &FlatRecord, story_id: &str) -> Option<Poll> {
    let question = record.non_blank(keys::POLL_QUESTION)?;
    let options = record
        .get(keys::POLL_OPTIONS)
        .map(normalize_poll_options)
        .unwrap_or_default();
    if options.is_empty() {
        warn!("Poll question present but no options, story has no poll");
        return None;
    }
    let id = record
        .non_blank(keys::POLL_ID)
        .unwrap_or_else(|| format!("poll-{}", story_id));

    Some(Poll::new(id, question, options))
}
