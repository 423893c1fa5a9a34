//! Story authoring validation with every violation reported at once.
//!
//! An authoring submission is the flat form record: title fields, numbered
//! page fields and poll fields. Validation never stops at the first problem;
//! the author gets the complete list and can fix everything in one pass.

use crate::fields::{RawOption, parse_option_list, raw_poll_options};
use crate::record::{FlatRecord, keys};
use lore_core::ChoiceOption;
use lore_error::ValidationError;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Maximum pages in one story.
pub const MAX_PAGES: usize = 10;
/// Minimum non-blank options for a personal choice.
pub const MIN_CHOICE_OPTIONS: usize = 2;
/// Maximum options for a personal choice.
pub const MAX_CHOICE_OPTIONS: usize = 3;
/// Minimum options for the closing poll.
pub const MIN_POLL_OPTIONS: usize = 2;
/// Maximum options for the closing poll.
pub const MAX_POLL_OPTIONS: usize = 3;

static CHOICE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("choice id pattern is valid"));

/// Result of validating an authoring submission.
#[derive(Debug, Clone, Default)]
pub struct AuthoringReport {
    /// Violations in the order they were found
    pub violations: Vec<AuthoringViolation>,
}

impl AuthoringReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if validation passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Adds a violation to the report.
    pub fn add(&mut self, kind: ViolationKind, page: Option<usize>, message: impl Into<String>) {
        self.violations.push(AuthoringViolation {
            kind,
            page,
            message: message.into(),
        });
    }

    /// Violation messages in order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    /// Formats violations as a human-readable list.
    pub fn format_violations(&self) -> String {
        self.violations
            .iter()
            .enumerate()
            .map(|(i, v)| format!("Error {}: {}", i + 1, v.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Converts a failed report into a [`ValidationError`].
    #[track_caller]
    pub fn into_error(self) -> ValidationError {
        ValidationError::new(self.messages())
    }
}

/// One violated authoring rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoringViolation {
    /// Which rule was violated
    pub kind: ViolationKind,
    /// Page number for page-scoped rules
    pub page: Option<usize>,
    /// Human-readable message
    pub message: String,
}

/// Authoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Story name is blank
    MissingTitle,
    /// Series name is blank
    MissingSeries,
    /// Chapter is not an integer of at least 1
    InvalidChapter,
    /// Page count outside 1..=10
    InvalidPageCount,
    /// Page story content is blank
    MissingPageContent,
    /// Choice prompt given without a choice id
    MissingChoiceId,
    /// Choice id contains characters other than letters, digits and `_`
    InvalidChoiceId,
    /// Choice id given without a prompt
    OrphanChoiceId,
    /// Choice options given without a prompt
    OrphanOptions,
    /// Fewer than two non-blank choice options
    TooFewOptions,
    /// More than three choice options
    TooManyOptions,
    /// Choice options value is not a list
    MalformedOptions,
    /// Same choice id on several pages
    DuplicateChoiceId,
    /// Fewer than two poll options
    PollTooFewOptions,
    /// More than three poll options
    PollTooManyOptions,
    /// Poll option repeated
    DuplicatePollOption,
    /// Poll options given without a question
    OrphanPollOptions,
}

/// Options as the author supplied them.
#[derive(Debug, Clone)]
enum OptionsField {
    Given(Vec<RawOption>),
    Malformed,
}

impl OptionsField {
    fn non_blank(&self) -> Vec<&RawOption> {
        match self {
            OptionsField::Given(options) => options.iter().filter(|o| !o.is_blank()).collect(),
            OptionsField::Malformed => Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, OptionsField::Given(_)) && self.non_blank().is_empty()
    }
}

#[derive(Debug, Clone)]
struct PageDraft {
    number: usize,
    story: Option<String>,
    choice_id: Option<String>,
    prompt: Option<String>,
    options: OptionsField,
}

#[derive(Debug, Clone)]
struct StoryDraft {
    title: Option<String>,
    series: Option<String>,
    chapter: Option<i64>,
    page_count: usize,
    pages: Vec<PageDraft>,
    poll_question: Option<String>,
    poll_options: Vec<String>,
}

/// Number of contiguous `page_{n}_story` keys, at least 1.
fn inferred_page_count(values: &FlatRecord) -> usize {
    (1..=MAX_PAGES)
        .take_while(|n| values.contains(&FlatRecord::page_key(*n, keys::PAGE_STORY)))
        .count()
        .max(1)
}

fn read_choice_options(values: &FlatRecord, number: usize) -> OptionsField {
    let discrete: Vec<String> = (1..=MAX_CHOICE_OPTIONS)
        .map(|k| format!("page_{}_pc_option_{}", number, k))
        .filter(|key| values.contains(key))
        .collect();
    if !discrete.is_empty() {
        return OptionsField::Given(
            discrete
                .iter()
                .map(|key| RawOption {
                    id: None,
                    text: values.text(key).unwrap_or_default(),
                })
                .collect(),
        );
    }
    match values.get(&FlatRecord::page_key(number, keys::PAGE_CHOICE_OPTIONS)) {
        None | Some(Value::Null) => OptionsField::Given(Vec::new()),
        Some(Value::String(s)) if s.trim().is_empty() => OptionsField::Given(Vec::new()),
        Some(value) => parse_option_list(value)
            .map(OptionsField::Given)
            .unwrap_or(OptionsField::Malformed),
    }
}

fn read_poll_options(values: &FlatRecord) -> Vec<String> {
    let discrete: Vec<String> = (1..=MAX_POLL_OPTIONS)
        .filter_map(|k| values.non_blank(&format!("poll_option_{}", k)))
        .collect();
    if !discrete.is_empty() {
        return discrete;
    }
    values
        .get(keys::POLL_OPTIONS)
        .map(raw_poll_options)
        .unwrap_or_default()
}

impl StoryDraft {
    fn from_record(values: &FlatRecord) -> (Self, Option<i64>) {
        let given_count = values.integer(keys::PAGE_COUNT);
        let page_count = match given_count {
            Some(n) if (1..=MAX_PAGES as i64).contains(&n) => n as usize,
            _ => inferred_page_count(values),
        };
        let pages = (1..=page_count)
            .map(|number| PageDraft {
                number,
                story: values.non_blank(&FlatRecord::page_key(number, keys::PAGE_STORY)),
                choice_id: values.non_blank(&FlatRecord::page_key(number, keys::PAGE_CHOICE_ID)),
                prompt: values.non_blank(&FlatRecord::page_key(number, keys::PAGE_CHOICE_PROMPT)),
                options: read_choice_options(values, number),
            })
            .collect();

        let draft = Self {
            title: values.non_blank(keys::STORY_NAME),
            series: values.non_blank(keys::SERIES),
            chapter: values.integer(keys::CHAPTER),
            page_count,
            pages,
            poll_question: values.non_blank(keys::POLL_QUESTION),
            poll_options: read_poll_options(values),
        };
        (draft, given_count)
    }

    fn check(&self, values: &FlatRecord, given_count: Option<i64>, report: &mut AuthoringReport) {
        if self.title.is_none() {
            report.add(ViolationKind::MissingTitle, None, "Story name is required");
        }
        if self.series.is_none() {
            report.add(ViolationKind::MissingSeries, None, "Series name is required");
        }
        if !self.chapter.is_some_and(|c| c >= 1) {
            report.add(
                ViolationKind::InvalidChapter,
                None,
                "Chapter number must be 1 or greater",
            );
        }
        let count_given = values.contains(keys::PAGE_COUNT);
        if count_given && !given_count.is_some_and(|n| (1..=MAX_PAGES as i64).contains(&n)) {
            report.add(
                ViolationKind::InvalidPageCount,
                None,
                format!("Page count must be between 1 and {}", MAX_PAGES),
            );
        }

        for page in &self.pages {
            check_page(page, report);
        }
        self.check_duplicate_ids(report);
        self.check_poll(report);
    }

    fn check_duplicate_ids(&self, report: &mut AuthoringReport) {
        let mut seen: Vec<(&str, Vec<usize>)> = Vec::new();
        for page in &self.pages {
            let Some(id) = page.choice_id.as_deref() else {
                continue;
            };
            match seen.iter_mut().find(|(existing, _)| *existing == id) {
                Some((_, pages)) => pages.push(page.number),
                None => seen.push((id, vec![page.number])),
            }
        }
        for (id, pages) in seen.into_iter().filter(|(_, pages)| pages.len() > 1) {
            let listed = pages
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            report.add(
                ViolationKind::DuplicateChoiceId,
                None,
                format!(
                    "Choice id '{}' is duplicated across pages {}; ids must be unique",
                    id, listed
                ),
            );
        }
    }

    fn check_poll(&self, report: &mut AuthoringReport) {
        if self.poll_question.is_none() {
            if !self.poll_options.is_empty() {
                report.add(
                    ViolationKind::OrphanPollOptions,
                    None,
                    "Poll options were given without a poll question",
                );
            }
            return;
        }
        let mut distinct: Vec<&str> = Vec::new();
        for option in &self.poll_options {
            if !distinct.contains(&option.as_str()) {
                distinct.push(option);
            }
        }
        if distinct.len() < MIN_POLL_OPTIONS {
            report.add(
                ViolationKind::PollTooFewOptions,
                None,
                format!("Poll needs at least {} options", MIN_POLL_OPTIONS),
            );
        }
        if distinct.len() > MAX_POLL_OPTIONS {
            report.add(
                ViolationKind::PollTooManyOptions,
                None,
                format!("Poll allows at most {} options", MAX_POLL_OPTIONS),
            );
        }
        let mut reported: Vec<&str> = Vec::new();
        for (i, option) in self.poll_options.iter().enumerate() {
            if self.poll_options[..i].contains(option) && !reported.contains(&option.as_str()) {
                reported.push(option);
                report.add(
                    ViolationKind::DuplicatePollOption,
                    None,
                    format!("Poll option '{}' is listed more than once", option),
                );
            }
        }
    }

    fn into_record(self) -> FlatRecord {
        let mut record = FlatRecord::new();
        record.insert(keys::STORY_NAME, self.title.unwrap_or_default());
        record.insert(keys::SERIES, self.series.unwrap_or_default());
        record.insert(keys::CHAPTER, self.chapter.unwrap_or(1));
        record.insert(keys::PAGE_COUNT, self.page_count as u64);

        for page in self.pages {
            let n = page.number;
            record.insert(
                FlatRecord::page_key(n, keys::PAGE_STORY),
                page.story.unwrap_or_default(),
            );
            let (Some(id), Some(prompt)) = (page.choice_id, page.prompt) else {
                continue;
            };
            let options: Vec<Value> = page
                .options
                .non_blank()
                .into_iter()
                .enumerate()
                .map(|(i, option)| {
                    json!({
                        "id": ChoiceOption::derive_id(&id, i + 1),
                        "text": option.text.trim(),
                    })
                })
                .collect();
            record.insert(
                FlatRecord::page_key(n, keys::PAGE_CHOICE_OPTIONS),
                Value::Array(options).to_string(),
            );
            record.insert(FlatRecord::page_key(n, keys::PAGE_CHOICE_ID), id);
            record.insert(FlatRecord::page_key(n, keys::PAGE_CHOICE_PROMPT), prompt);
        }

        if let Some(question) = self.poll_question {
            record.insert(keys::POLL_QUESTION, question);
            record.insert(keys::POLL_OPTIONS, normalized_poll_options(self.poll_options));
        }
        record
    }
}

fn normalized_poll_options(options: Vec<String>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for option in options {
        if !distinct.contains(&option) {
            distinct.push(option);
        }
    }
    distinct
}

fn check_page(page: &PageDraft, report: &mut AuthoringReport) {
    let n = page.number;
    if page.story.is_none() {
        report.add(
            ViolationKind::MissingPageContent,
            Some(n),
            format!("Page {}: story content is required", n),
        );
    }

    if let Some(id) = page.choice_id.as_deref().filter(|id| !CHOICE_ID.is_match(id)) {
        report.add(
            ViolationKind::InvalidChoiceId,
            Some(n),
            format!(
                "Page {}: choice id '{}' may only contain letters, digits and underscores",
                n, id
            ),
        );
    }

    if page.prompt.is_some() {
        if page.choice_id.is_none() {
            report.add(
                ViolationKind::MissingChoiceId,
                Some(n),
                format!("Page {}: choice id is required when a choice prompt is given", n),
            );
        }
        match &page.options {
            OptionsField::Malformed => report.add(
                ViolationKind::MalformedOptions,
                Some(n),
                format!("Page {}: personal choice options must be a list", n),
            ),
            options => {
                let count = options.non_blank().len();
                if count < MIN_CHOICE_OPTIONS {
                    report.add(
                        ViolationKind::TooFewOptions,
                        Some(n),
                        format!(
                            "Page {}: personal choice needs at least {} options",
                            n, MIN_CHOICE_OPTIONS
                        ),
                    );
                }
                if count > MAX_CHOICE_OPTIONS {
                    report.add(
                        ViolationKind::TooManyOptions,
                        Some(n),
                        format!(
                            "Page {}: personal choice allows at most {} options",
                            n, MAX_CHOICE_OPTIONS
                        ),
                    );
                }
            }
        }
    } else {
        if let Some(id) = page.choice_id.as_deref() {
            report.add(
                ViolationKind::OrphanChoiceId,
                Some(n),
                format!("Page {}: choice id '{}' has no prompt", n, id),
            );
        }
        if !page.options.is_empty() {
            report.add(
                ViolationKind::OrphanOptions,
                Some(n),
                format!("Page {}: choice options were given without a prompt", n),
            );
        }
    }
}

/// Validates an authoring submission, collecting every violation.
///
/// # Examples
///
/// ```
/// use lore_story::{FlatRecord, ViolationKind, validate_submission};
///
/// let mut values = FlatRecord::new();
/// values.insert("story_name", "Man and His Dog");
/// values.insert("series", "Alpha Run");
/// values.insert("chapter", 1);
/// values.insert("page_1_story", "Hello");
/// values.insert("page_1_pc_prompt", "Which collar?");
///
/// let report = validate_submission(&values);
/// assert!(!report.is_valid());
/// assert!(report.violations.iter().any(|v| v.kind == ViolationKind::MissingChoiceId));
/// assert!(report.violations.iter().any(|v| v.kind == ViolationKind::TooFewOptions));
/// ```
#[instrument(skip_all)]
pub fn validate_submission(values: &FlatRecord) -> AuthoringReport {
    let (draft, given_count) = StoryDraft::from_record(values);
    let mut report = AuthoringReport::new();
    draft.check(values, given_count, &mut report);
    debug!(
        pages = draft.page_count,
        violations = report.violations.len(),
        "Submission validated"
    );
    report
}

/// Validates a submission and normalises it into the persisted flat layout.
///
/// Choice options are re-keyed `<choiceId>_option_<n>` and serialized as a
/// JSON string; poll options become a list of strings. Ids (`story_id`,
/// `poll_id`) are not assigned here.
///
/// # Errors
///
/// Returns a [`ValidationError`] carrying every violation message.
#[instrument(skip_all)]
pub fn prepare_story_record(values: &FlatRecord) -> Result<FlatRecord, ValidationError> {
    let (draft, given_count) = StoryDraft::from_record(values);
    let mut report = AuthoringReport::new();
    draft.check(values, given_count, &mut report);
    if !report.is_valid() {
        debug!(violations = report.violations.len(), "Submission rejected");
        return Err(report.into_error());
    }
    Ok(draft.into_record())
}
