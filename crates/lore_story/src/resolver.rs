//! `{{token}}` placeholder resolution.

use lore_core::ChoiceSelections;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Two open braces, one or more non-brace characters, two close braces.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]+\}\}").expect("placeholder pattern is valid"));

fn token_name<'t>(caps: &Captures<'t>) -> &'t str {
    let token = caps.get(0).map_or("", |m| m.as_str());
    &token[2..token.len() - 2]
}

/// Replaces every `{{name}}` whose `name` has a selection with the chosen text.
///
/// Tokens without a selection are left verbatim so an author can see which
/// choices a reader has not made yet. Substitution is a single literal pass:
/// inserted text is never rescanned or escaped.
///
/// # Examples
///
/// ```
/// use lore_core::ChoiceSelections;
/// use lore_story::resolve;
///
/// let selections: ChoiceSelections = [("x", "Z")].into_iter().collect();
/// assert_eq!(resolve("A {{x}} B {{x}} C", &selections), "A Z B Z C");
/// assert_eq!(resolve("A {{y}} B", &selections), "A {{y}} B");
/// ```
pub fn resolve(text: &str, selections: &ChoiceSelections) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match selections.get(token_name(caps)) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholder_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = token_name(&caps);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Placeholder names in `text` that `selections` cannot resolve.
pub fn unresolved_placeholders(text: &str, selections: &ChoiceSelections) -> Vec<String> {
    placeholder_names(text)
        .into_iter()
        .filter(|name| selections.get(name).is_none())
        .collect()
}
