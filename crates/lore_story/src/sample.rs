//! The bundled sample story, in persisted flat form.

use crate::record::{FlatRecord, keys};
use serde_json::{Value, json};

/// Story id of the sample story.
pub const SAMPLE_STORY_ID: &str = "ep1";
/// Poll id of the sample story.
pub const SAMPLE_POLL_ID: &str = "ep1-final";

const PAGES: [&str; 4] = [
    "John kneeled beside his dog, Scout, before they left the house. Today was the day he'd \
     finally buy a car, and Scout needed a new collar for the big day.",
    "The sun was shining as John locked the door behind them. Scout trotted proudly in his new \
     {{collar}} collar, tail wagging all the way to the curb.",
    "They turned into the dealership lot, rows of shiny vehicles sparkling under the morning sun. \
     John couldn't help but notice how the {{collar}} gleamed under the light. Maybe it was a sign.",
    "The salesperson waved. \"Looking for something sporty, rugged, or roomy?\" John grinned, \
     scratching Scout's chin. \"Let's find out.\"",
];

/// "Man and His Dog": four pages, a collar choice on page 1 echoed on pages 2
/// and 3, and a closing test-drive poll.
pub fn sample_story_record() -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert(keys::STORY_ID, SAMPLE_STORY_ID);
    record.insert(keys::STORY_NAME, "Man and His Dog");
    record.insert(keys::SERIES, "Alpha Run");
    record.insert(keys::CHAPTER, 1);
    record.insert(keys::PAGE_COUNT, PAGES.len() as u64);
    for (index, text) in PAGES.iter().enumerate() {
        record.insert(FlatRecord::page_key(index + 1, keys::PAGE_STORY), *text);
    }

    record.insert(FlatRecord::page_key(1, keys::PAGE_CHOICE_ID), "collar");
    record.insert(
        FlatRecord::page_key(1, keys::PAGE_CHOICE_PROMPT),
        "Which collar does John choose for Scout?",
    );
    let options: Value = json!([
        {"id": "collar_option_1", "text": "Blue"},
        {"id": "collar_option_2", "text": "Red"},
        {"id": "collar_option_3", "text": "Green"},
    ]);
    record.insert(
        FlatRecord::page_key(1, keys::PAGE_CHOICE_OPTIONS),
        options.to_string(),
    );

    record.insert(keys::POLL_QUESTION, "What should John test drive first?");
    record.insert(keys::POLL_OPTIONS, json!(["Car", "SUV", "Truck"]));
    record.insert(keys::POLL_ID, SAMPLE_POLL_ID);
    record
}
