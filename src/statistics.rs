//! counters describing what a run of the extractor did
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use console::style;
use serde::{Deserialize, Serialize};

use crate::{traits::WideSerialize, utils::fmt_err};

/// default Stats type for use in json output
fn serialized_type() -> String {
    String::from("statistics")
}

/// Which counter to bump
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatField {
    /// a fetch was issued
    Requests,

    /// a subreddit was skipped before any fetch was issued
    SkippedSources,

    /// a response reached the response handler
    Responses,

    /// a response arrived with a non-2xx status or not at all
    FailedResponses,

    /// a style block was appended to the head
    BlocksInjected,

    /// css fragments were appended to the head
    FragmentsInjected,
}

/// Data collection of statistics related to a run
#[derive(Deserialize, Debug, Serialize)]
pub struct Stats {
    #[serde(rename = "type", default = "serialized_type")]
    /// Name of this type of struct, used for serialization, i.e. `{"type":"statistics"}`
    kind: String,

    /// tracker for total number of fetches issued
    requests: AtomicUsize,

    /// tracker for subreddits that never made it to a fetch (invalid name, no transport, ...)
    skipped_sources: AtomicUsize,

    /// tracker for total number of responses handed to the response handler
    responses: AtomicUsize,

    /// tracker for responses with a non-2xx status or a transport failure
    failed_responses: AtomicUsize,

    /// tracker for total number of style blocks appended to the head
    blocks_injected: AtomicUsize,

    /// tracker for total number of css fragments appended to the head
    fragments_injected: AtomicUsize,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            kind: serialized_type(),
            requests: AtomicUsize::new(0),
            skipped_sources: AtomicUsize::new(0),
            responses: AtomicUsize::new(0),
            failed_responses: AtomicUsize::new(0),
            blocks_injected: AtomicUsize::new(0),
            fragments_injected: AtomicUsize::new(0),
        }
    }
}

impl Stats {
    /// create a new, zeroed Stats
    pub fn new() -> Self {
        Self::default()
    }

    /// atomic reference to the counter behind `field`
    fn counter(&self, field: StatField) -> &AtomicUsize {
        match field {
            StatField::Requests => &self.requests,
            StatField::SkippedSources => &self.skipped_sources,
            StatField::Responses => &self.responses,
            StatField::FailedResponses => &self.failed_responses,
            StatField::BlocksInjected => &self.blocks_injected,
            StatField::FragmentsInjected => &self.fragments_injected,
        }
    }

    /// add `value` to the counter behind `field`
    pub fn add_to_field(&self, field: StatField, value: usize) {
        self.counter(field).fetch_add(value, Ordering::Relaxed);
    }

    /// add one to the counter behind `field`
    pub fn increment(&self, field: StatField) {
        self.add_to_field(field, 1);
    }

    /// current value of the counter behind `field`
    pub fn get(&self, field: StatField) -> usize {
        self.counter(field).load(Ordering::Relaxed)
    }
}

impl WideSerialize for Stats {
    /// one line summary of the run
    fn as_str(&self) -> String {
        format!(
            "{} requested, {} skipped, {} responses ({} failed), {} blocks / {} fragments injected\n",
            style(self.get(StatField::Requests)).cyan(),
            style(self.get(StatField::SkippedSources)).cyan(),
            style(self.get(StatField::Responses)).cyan(),
            style(self.get(StatField::FailedResponses)).red(),
            style(self.get(StatField::BlocksInjected)).green(),
            style(self.get(StatField::FragmentsInjected)).green(),
        )
    }

    /// Create an NDJSON representation of the Stats
    fn as_json(&self) -> Result<String> {
        let mut json = serde_json::to_string(&self)
            .with_context(|| fmt_err("Could not convert statistics to JSON"))?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// counters start at zero and only the touched field moves
    fn add_to_field_updates_single_counter() {
        let stats = Stats::new();

        stats.increment(StatField::Requests);
        stats.add_to_field(StatField::FragmentsInjected, 3);

        assert_eq!(stats.get(StatField::Requests), 1);
        assert_eq!(stats.get(StatField::FragmentsInjected), 3);
        assert_eq!(stats.get(StatField::Responses), 0);
        assert_eq!(stats.get(StatField::BlocksInjected), 0);
    }

    #[test]
    /// json output carries the type tag and every counter
    fn stats_as_json() {
        let stats = Stats::new();
        stats.increment(StatField::BlocksInjected);

        let json = stats.as_json().unwrap();
        assert!(json.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "statistics");
        assert_eq!(value["blocks_injected"], 1);
        assert_eq!(value["requests"], 0);
    }

    #[test]
    /// text output mentions each counter
    fn stats_as_str() {
        let stats = Stats::new();
        stats.add_to_field(StatField::Requests, 2);

        let text = console::strip_ansi_codes(&stats.as_str()).to_string();
        assert!(text.starts_with("2 requested"));
        assert!(text.ends_with("injected\n"));
    }
}
