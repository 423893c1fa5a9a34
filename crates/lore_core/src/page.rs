//! Pages and the personal choices they may carry.

use serde::{Deserialize, Serialize};

/// One selectable answer of a personal choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct ChoiceOption {
    /// Stable identifier, conventionally `<choiceId>_option_<n>`
    id: String,
    /// Text shown to the reader and echoed into later pages
    text: String,
}

impl ChoiceOption {
    /// Creates an option from its id and display text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Derives the conventional option id for the `index`-th (1-based) option.
    ///
    /// ```
    /// use lore_core::ChoiceOption;
    ///
    /// assert_eq!(ChoiceOption::derive_id("collar", 2), "collar_option_2");
    /// ```
    pub fn derive_id(choice_id: &str, index: usize) -> String {
        format!("{}_option_{}", choice_id, index)
    }
}

/// A reader-specific decision point whose chosen text feeds later placeholders.
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
pub struct PersonalChoice {
    /// Token name referenced as `{{id}}` in later pages
    id: String,
    /// Question put to the reader
    prompt: String,
    /// Ordered options, at least two
    options: Vec<ChoiceOption>,
}

impl PersonalChoice {
    /// Creates a choice from its id, prompt and options.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
        }
    }

    /// Returns a builder for constructing a PersonalChoice.
    pub fn builder() -> PersonalChoiceBuilder {
        PersonalChoiceBuilder::default()
    }

    /// Finds an option by id.
    pub fn option(&self, option_id: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Finds an option by its display text.
    pub fn option_by_text(&self, text: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.text == text)
    }
}

/// One unit of story text.
///
/// Pages with and without a personal choice are distinct variants so readers
/// never have to null-check an optional choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    /// Text only
    Plain {
        /// Page identifier
        id: String,
        /// Raw text, possibly containing `{{token}}` placeholders
        text: String,
    },
    /// Text followed by a personal choice
    WithChoice {
        /// Page identifier
        id: String,
        /// Raw text, possibly containing `{{token}}` placeholders
        text: String,
        /// The decision offered on this page
        choice: PersonalChoice,
    },
}

impl Page {
    /// Creates a page without a personal choice.
    pub fn plain(id: impl Into<String>, text: impl Into<String>) -> Self {
        Page::Plain {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Creates a page offering a personal choice.
    pub fn with_choice(id: impl Into<String>, text: impl Into<String>, choice: PersonalChoice) -> Self {
        Page::WithChoice {
            id: id.into(),
            text: text.into(),
            choice,
        }
    }

    /// Page identifier.
    pub fn id(&self) -> &str {
        match self {
            Page::Plain { id, .. } | Page::WithChoice { id, .. } => id,
        }
    }

    /// Raw page text.
    pub fn text(&self) -> &str {
        match self {
            Page::Plain { text, .. } | Page::WithChoice { text, .. } => text,
        }
    }

    /// The personal choice on this page, if any.
    pub fn personal_choice(&self) -> Option<&PersonalChoice> {
        match self {
            Page::Plain { .. } => None,
            Page::WithChoice { choice, .. } => Some(choice),
        }
    }
}
