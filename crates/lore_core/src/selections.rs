//! A reader's recorded personal choices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from personal choice id to the *text* of the chosen option.
///
/// The text, not the option id, is stored because placeholders are replaced
/// with exactly what the reader saw.
///
/// # Examples
///
/// ```
/// use lore_core::ChoiceSelections;
///
/// let mut selections = ChoiceSelections::new();
/// selections.insert("collar", "Blue");
/// assert_eq!(selections.get("collar"), Some("Blue"));
/// assert_eq!(selections.get("car"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceSelections(BTreeMap<String, String>);

impl ChoiceSelections {
    /// Creates an empty selection map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the chosen text for a choice.
    pub fn insert(&mut self, choice_id: impl Into<String>, option_text: impl Into<String>) {
        self.0.insert(choice_id.into(), option_text.into());
    }

    /// Chosen text for a choice, if the reader has picked one.
    pub fn get(&self, choice_id: &str) -> Option<&str> {
        self.0.get(choice_id).map(String::as_str)
    }

    /// Number of recorded choices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no choice has been made yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(choice_id, option_text)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ChoiceSelections
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
