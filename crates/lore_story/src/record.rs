//! Flat, numbered-key story records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key names of the flat story layout.
pub mod keys {
    /// Story identifier, written when a story is published
    pub const STORY_ID: &str = "story_id";
    /// Episode title
    pub const STORY_NAME: &str = "story_name";
    /// Series name
    pub const SERIES: &str = "series";
    /// Chapter number
    pub const CHAPTER: &str = "chapter";
    /// Number of pages
    pub const PAGE_COUNT: &str = "page_count";
    /// Poll question
    pub const POLL_QUESTION: &str = "poll_question";
    /// Poll options (sequence of strings)
    pub const POLL_OPTIONS: &str = "poll_options";
    /// Poll ledger id
    pub const POLL_ID: &str = "poll_id";

    /// Suffix of a page's story text: `page_{n}_story`
    pub const PAGE_STORY: &str = "story";
    /// Suffix of a page's choice id: `page_{n}_pc_id`
    pub const PAGE_CHOICE_ID: &str = "pc_id";
    /// Suffix of a page's choice prompt: `page_{n}_pc_prompt`
    pub const PAGE_CHOICE_PROMPT: &str = "pc_prompt";
    /// Suffix of a page's serialized choice options: `page_{n}_pc_options`
    pub const PAGE_CHOICE_OPTIONS: &str = "pc_options";
}

/// A flat story record: the authoring form values or the persisted post data.
///
/// Values are loosely typed JSON; the accessors coerce the way form data
/// arrives (numbers as strings, strings as numbers).
///
/// # Examples
///
/// ```
/// use lore_story::FlatRecord;
///
/// let mut record = FlatRecord::new();
/// record.insert("chapter", "2");
/// record.insert(FlatRecord::page_key(1, "story"), "Once upon a time");
///
/// assert_eq!(record.integer("chapter"), Some(2));
/// assert!(record.contains("page_1_story"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord(Map<String, Value>);

impl FlatRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of a numbered page field, e.g. `page_2_pc_id`.
    pub fn page_key(page: usize, suffix: &str) -> String {
        format!("page_{}_{}", page, suffix)
    }

    /// Sets a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when the field is present and not null.
    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    /// Field as text. Numbers and booleans are rendered; other values are not text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Trimmed field text, `None` when missing or blank.
    pub fn non_blank(&self, key: &str) -> Option<String> {
        self.text(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Field as an integer, accepting numbers and numeric strings.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for FlatRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<FlatRecord> for Value {
    fn from(record: FlatRecord) -> Self {
        Value::Object(record.0)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
