//! Parsing of the loosely-typed option fields.
//!
//! Option lists arrive either as literal JSON arrays or as JSON encoded in a
//! string, because form serialization flattens everything to text.

use serde_json::Value;

/// One entry of a personal choice option list before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawOption {
    /// Explicit option id, if the entry carried one
    pub(crate) id: Option<String>,
    /// Option text, possibly blank
    pub(crate) text: String,
}

impl RawOption {
    pub(crate) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Decodes a value that should hold a sequence: arrays pass through, strings
/// are parsed as JSON arrays. `None` means the value is not a sequence.
fn as_sequence(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => serde_json::from_str::<Vec<Value>>(s).ok(),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses a personal choice option list of `{id, text}` objects or plain strings.
///
/// Returns `None` when the value is not a sequence at all.
pub(crate) fn parse_option_list(value: &Value) -> Option<Vec<RawOption>> {
    let items = as_sequence(value)?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::Object(fields) => RawOption {
                    id: fields
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                    text: fields.get("text").and_then(scalar_text).unwrap_or_default(),
                },
                other => RawOption {
                    id: None,
                    text: scalar_text(other).unwrap_or_default(),
                },
            })
            .collect(),
    )
}

/// Poll option strings as supplied, trimmed, blanks kept out, duplicates kept in.
///
/// Accepts an array, a JSON array string, or a newline/comma separated string.
pub(crate) fn raw_poll_options(value: &Value) -> Vec<String> {
    let texts: Vec<String> = match as_sequence(value) {
        Some(items) => items.iter().filter_map(scalar_text).collect(),
        None => match value {
            Value::String(s) => s.split(['\n', ',']).map(str::to_string).collect(),
            other => scalar_text(other).into_iter().collect(),
        },
    };
    texts
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Normalises a stored `poll_options` value into distinct, non-blank strings.
///
/// # Examples
///
/// ```
/// use lore_story::normalize_poll_options;
/// use serde_json::json;
///
/// assert_eq!(normalize_poll_options(&json!(["Car", "SUV"])), vec!["Car", "SUV"]);
/// assert_eq!(normalize_poll_options(&json!("[\"Car\",\"Car\",\"Truck\"]")), vec!["Car", "Truck"]);
/// assert_eq!(normalize_poll_options(&json!("Car, SUV\nTruck")), vec!["Car", "SUV", "Truck"]);
/// ```
pub fn normalize_poll_options(value: &Value) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for option in raw_poll_options(value) {
        if !options.contains(&option) {
            options.push(option);
        }
    }
    options
}
