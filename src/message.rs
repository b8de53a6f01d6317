use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use console::{style, Color};
use log::{Level, Record};
use serde::{Deserialize, Serialize};

use crate::traits::WideSerialize;
use crate::utils::fmt_err;

/// target prefix shared by every record this crate logs
const CRATE_TARGET: &str = "wide_emotes::";

#[derive(Serialize, Deserialize, Default, Debug)]
/// One log record, rendered as a terminal line or as NDJSON for `--debug-log`
pub struct WideMessage {
    #[serde(rename = "type")]
    /// Name of this type of struct, used for serialization, i.e. `{"type":"log"}`
    pub(crate) kind: String,

    /// The log message
    pub(crate) message: String,

    /// The log level
    pub(crate) level: String,

    /// The number of seconds elapsed since the logger was initialized
    pub(crate) time_offset: f32,

    /// The module from which log::* was called
    pub(crate) module: String,
}

impl WideMessage {
    /// capture `record`, logged `elapsed` after the logger started
    pub(crate) fn from_record(record: &Record<'_>, elapsed: Duration) -> Self {
        Self {
            kind: "log".to_string(),
            message: record.args().to_string(),
            level: record.level().to_string(),
            time_offset: elapsed.as_secs_f32(),
            module: record.target().to_string(),
        }
    }

    /// three letter tag and background colour for the record's level
    fn level_tag(&self) -> (&'static str, Color) {
        match Level::from_str(&self.level) {
            Ok(Level::Error) => ("ERR", Color::Red),
            Ok(Level::Warn) => ("WRN", Color::Red),
            Ok(Level::Info) => ("INF", Color::Cyan),
            Ok(Level::Debug) => ("DBG", Color::Yellow),
            Ok(Level::Trace) => ("TRC", Color::Magenta),
            Err(_) => ("MSG", Color::White),
        }
    }

    /// module path without this crate's own prefix; other crates keep their full target
    fn short_module(&self) -> &str {
        self.module
            .strip_prefix(CRATE_TARGET)
            .unwrap_or(&self.module)
    }
}

impl WideSerialize for WideMessage {
    /// Create a string representation of the log message
    ///
    /// ex:  DBG      0.125 extractor::container injected 1 style blocks from fffffffuuuuuuuuuuuu
    fn as_str(&self) -> String {
        let (tag, color) = self.level_tag();

        format!(
            "{} {:10.03} {} {}\n",
            style(tag).bg(color).black(),
            style(self.time_offset).dim(),
            style(self.short_module()).cyan(),
            self.message,
        )
    }

    /// Create an NDJSON representation of the log message; the module keeps its full target
    ///
    /// (expanded for clarity)
    /// ex:
    /// {
    ///   "type": "log",
    ///   "message": "GET https://www.reddit.com/r/pics/stylesheet.css",
    ///   "level": "DEBUG",
    ///   "time_offset": 0.86333454,
    ///   "module": "wide_emotes::fetcher"
    /// }\n
    fn as_json(&self) -> anyhow::Result<String> {
        let mut json = serde_json::to_string(&self)
            .with_context(|| fmt_err(&format!("Could not convert log record {} to JSON", self.message)))?;
        json.push('\n');
        Ok(json)
    }
}
