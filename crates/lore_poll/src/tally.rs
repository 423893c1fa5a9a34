//! Display tallies built from stored counts.

use crate::ledger::pct;
use lore_core::Poll;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parses a stored counter, treating anything unparseable as 0.
pub(crate) fn parse_count(raw: &str) -> u64 {
    raw.trim().parse::<i64>().map_or(0, |n| n.max(0) as u64)
}

/// Coerces a count received over the wire: numbers or numeric strings.
///
/// ```
/// use lore_poll::coerce_count;
/// use serde_json::json;
///
/// assert_eq!(coerce_count(&json!("3")), 3);
/// assert_eq!(coerce_count(&json!(4)), 4);
/// assert_eq!(coerce_count(&json!("many")), 0);
/// ```
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => parse_count(s),
        _ => 0,
    }
}

/// One option's line in a tally.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_new::new)]
pub struct TallyRow {
    /// Option text
    option: String,
    /// Votes counted for it
    count: u64,
    /// Whole-number share of the total
    pct: u32,
    /// Whether this is the reader's own vote
    selected: bool,
}

/// Vote counts for a poll, zero-filled over its configured options.
///
/// Configured options come first in poll order; options that only exist in
/// the stored counts follow in name order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollTally {
    counts: Vec<(String, u64)>,
}

impl PollTally {
    /// All configured options at zero.
    pub fn zeroed(poll: &Poll) -> Self {
        Self::from_counts(poll, &BTreeMap::new())
    }

    /// Merges counts over the poll's options.
    pub fn from_counts(poll: &Poll, counts: &BTreeMap<String, u64>) -> Self {
        let mut merged: Vec<(String, u64)> = poll
            .options()
            .iter()
            .map(|option| (option.clone(), counts.get(option).copied().unwrap_or(0)))
            .collect();
        for (option, count) in counts {
            if !poll.has_option(option) {
                merged.push((option.clone(), *count));
            }
        }
        Self { counts: merged }
    }

    /// Merges a wire `counts` object (values as stored) over the poll's options.
    pub fn from_wire(poll: &Poll, counts: &serde_json::Map<String, Value>) -> Self {
        let counts: BTreeMap<String, u64> = counts
            .iter()
            .map(|(option, value)| (option.clone(), coerce_count(value)))
            .collect();
        Self::from_counts(poll, &counts)
    }

    /// Votes for `option`.
    pub fn count(&self, option: &str) -> u64 {
        self.counts
            .iter()
            .find(|(o, _)| o == option)
            .map_or(0, |(_, c)| *c)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// Whole-number share of `option`.
    pub fn pct(&self, option: &str) -> u32 {
        pct(self.count(option), self.total())
    }

    /// Rows in display order, none selected.
    pub fn rows(&self) -> Vec<TallyRow> {
        let total = self.total();
        self.counts
            .iter()
            .map(|(option, count)| TallyRow::new(option.clone(), *count, pct(*count, total), false))
            .collect()
    }

    /// Adds one vote for `option`.
    pub(crate) fn bump(&mut self, option: &str) {
        match self.counts.iter_mut().find(|(o, _)| o == option) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((option.to_string(), 1)),
        }
    }
}
