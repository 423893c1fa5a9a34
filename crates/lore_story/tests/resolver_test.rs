//! Tests for placeholder resolution.

use lore_core::ChoiceSelections;
use lore_story::{placeholder_names, resolve, unresolved_placeholders};

fn selections(pairs: &[(&str, &str)]) -> ChoiceSelections {
    pairs.iter().copied().collect()
}

#[test]
fn test_text_without_tokens_is_unchanged() {
    let text = "John walked { down } the {street}.";
    assert_eq!(resolve(text, &ChoiceSelections::new()), text);
    assert_eq!(resolve(text, &selections(&[("street", "x")])), text);
}

#[test]
fn test_all_occurrences_substituted() {
    assert_eq!(resolve("A {{x}} B {{x}} C", &selections(&[("x", "Z")])), "A Z B Z C");
}

#[test]
fn test_unresolved_token_preserved() {
    assert_eq!(resolve("A {{x}} B", &ChoiceSelections::new()), "A {{x}} B");
}

#[test]
fn test_mixed_resolved_and_unresolved() {
    let s = selections(&[("collar", "Blue")]);
    assert_eq!(
        resolve("{{collar}} collar, {{car}} car", &s),
        "Blue collar, {{car}} car"
    );
    assert_eq!(unresolved_placeholders("{{collar}} and {{car}}", &s), vec!["car"]);
}

#[test]
fn test_value_containing_braces_inserted_verbatim() {
    let s = selections(&[("x", "{{y}}"), ("y", "nope")]);
    assert_eq!(resolve("a {{x}} b", &s), "a {{y}} b");
}

#[test]
fn test_resolution_is_idempotent() {
    let cases = [
        ("A {{x}} B {{y}}", selections(&[("x", "Z")])),
        ("{{x}}{{x}}", selections(&[("x", "1"), ("y", "2")])),
        ("plain", selections(&[])),
        ("{{ spaced }} {{x}}", selections(&[(" spaced ", "S")])),
    ];
    for (text, s) in cases {
        let once = resolve(text, &s);
        assert_eq!(resolve(&once, &s), once, "text = {}", text);
    }
}

#[test]
fn test_placeholder_names_in_first_appearance_order() {
    assert_eq!(
        placeholder_names("{{b}} {{a}} {{b}}"),
        vec!["b".to_string(), "a".to_string()]
    );
}
