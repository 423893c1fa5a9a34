//! Tests for assembling stories from flat records.

use lore_core::Page;
use lore_error::StoryErrorKind;
use lore_story::{FlatRecord, build_story, sample_story_record};
use serde_json::json;

fn record_with_pages(count: usize) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert("story_name", "Counting");
    for n in 1..=count {
        record.insert(FlatRecord::page_key(n, "story"), format!("Page {}", n));
    }
    record
}

#[test]
fn test_page_count_follows_contiguous_pages() {
    for k in 1..=10 {
        let story = build_story(&record_with_pages(k)).unwrap();
        assert_eq!(story.page_count(), k, "k = {}", k);
    }
}

#[test]
fn test_scan_stops_at_ten_pages() {
    let story = build_story(&record_with_pages(11)).unwrap();
    assert_eq!(story.page_count(), 10);
    assert_eq!(story.pages()[9].id(), "p10");
}

#[test]
fn test_no_pages_is_malformed() {
    let err = build_story(&record_with_pages(0)).unwrap_err();
    assert_eq!(err.kind(), &StoryErrorKind::MalformedStory);
}

#[test]
fn test_gap_truncates_story() {
    let mut record = FlatRecord::new();
    record.insert("page_1_story", "First");
    record.insert("page_3_story", "Third");

    let story = build_story(&record).unwrap();
    assert_eq!(story.page_count(), 1);
    assert_eq!(story.pages()[0].text(), "First");
}

#[test]
fn test_page_count_field_does_not_govern_scan() {
    let mut record = record_with_pages(2);
    record.insert("page_count", 5);

    assert_eq!(build_story(&record).unwrap().page_count(), 2);
}

#[test]
fn test_metadata_and_defaults() {
    let mut record = record_with_pages(1);
    record.insert("series", "Alpha Run");
    record.insert("chapter", "0");

    let story = build_story(&record).unwrap();
    assert_eq!(story.id(), "");
    assert_eq!(story.title(), "Counting");
    assert_eq!(story.series(), "Alpha Run");
    assert_eq!(*story.chapter(), 1);
    assert_eq!(story.pages()[0].id(), "p1");
    assert!(story.poll().is_none());
}

#[test]
fn test_personal_choice_from_json_string() {
    let story = build_story(&sample_story_record()).unwrap();

    let choice = story.pages()[0].personal_choice().unwrap();
    assert_eq!(choice.id(), "collar");
    assert_eq!(choice.options().len(), 3);
    assert_eq!(choice.options()[1].id(), "collar_option_2");
    assert_eq!(choice.options()[1].text(), "Red");
    assert!(matches!(story.pages()[1], Page::Plain { .. }));
}

#[test]
fn test_choice_options_without_ids_get_derived_ids() {
    let mut record = record_with_pages(1);
    record.insert("page_1_pc_id", "color");
    record.insert("page_1_pc_prompt", "Pick");
    record.insert("page_1_pc_options", json!(["Blue", {"text": "Red"}]));

    let story = build_story(&record).unwrap();
    let choice = story.pages()[0].personal_choice().unwrap();
    assert_eq!(choice.options()[0].id(), "color_option_1");
    assert_eq!(choice.options()[1].id(), "color_option_2");
}

#[test]
fn test_unusable_choice_leaves_plain_page() {
    let mut record = record_with_pages(2);
    record.insert("page_1_pc_id", "color");
    record.insert("page_1_pc_options", "not a list");
    record.insert("page_2_pc_id", "size");
    record.insert("page_2_pc_options", json!([{"id": "size_option_1", "text": "Big"}]));

    let story = build_story(&record).unwrap();
    assert!(story.pages()[0].personal_choice().is_none());
    assert!(story.pages()[1].personal_choice().is_none());
}

#[test]
fn test_repeated_choice_id_keeps_first_choice() {
    let mut record = record_with_pages(3);
    record.insert("page_1_pc_id", "color");
    record.insert("page_1_pc_prompt", "Pick a color");
    record.insert("page_1_pc_options", json!(["Blue", "Red"]));
    record.insert("page_2_pc_id", "color");
    record.insert("page_2_pc_prompt", "Pick again");
    record.insert("page_2_pc_options", json!(["Green", "Gold"]));
    record.insert("page_3_pc_id", "size");
    record.insert("page_3_pc_prompt", "Pick a size");
    record.insert("page_3_pc_options", json!(["Big", "Small"]));

    let story = build_story(&record).unwrap();
    let ids: Vec<&str> = story.personal_choices().map(|c| c.id().as_str()).collect();
    assert_eq!(ids, vec!["color", "size"]);
    assert_eq!(
        story.pages()[0].personal_choice().unwrap().prompt(),
        "Pick a color"
    );
    assert!(matches!(story.pages()[1], Page::Plain { .. }));
}

#[test]
fn test_missing_choice_id_means_no_choice() {
    let mut record = record_with_pages(1);
    record.insert("page_1_pc_prompt", "Pick");
    record.insert("page_1_pc_options", json!(["A", "B"]));

    assert!(build_story(&record).unwrap().pages()[0].personal_choice().is_none());
}

#[test]
fn test_poll_options_from_serialized_sequence() {
    let mut record = record_with_pages(1);
    record.insert("story_id", "story-1");
    record.insert("poll_question", "Which?");
    record.insert("poll_options", r#"["Car","SUV","Car"]"#);

    let story = build_story(&record).unwrap();
    let poll = story.poll().as_ref().unwrap();
    assert_eq!(poll.id(), "poll-story-1");
    assert_eq!(poll.options(), &vec!["Car".to_string(), "SUV".to_string()]);
}

#[test]
fn test_poll_absent_without_question_or_options() {
    let mut record = record_with_pages(1);
    record.insert("poll_options", json!(["Car", "SUV"]));
    assert!(build_story(&record).unwrap().poll().is_none());

    record.insert("poll_question", "Which?");
    record.insert("poll_options", json!([]));
    assert!(build_story(&record).unwrap().poll().is_none());
}

#[test]
fn test_sample_story_poll() {
    let story = build_story(&sample_story_record()).unwrap();
    let poll = story.poll().as_ref().unwrap();

    assert_eq!(story.id(), "ep1");
    assert_eq!(poll.id(), "ep1-final");
    assert!(poll.has_option("Truck"));
}
