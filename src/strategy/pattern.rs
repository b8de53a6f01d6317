use super::Extraction;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::fmt_err;

/// A compiled regular expression used to pull css fragments out of raw stylesheet text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionPattern {
    /// compiled expression
    #[serde(with = "serde_regex")]
    compiled: Regex,
}

impl ExtractionPattern {
    /// compile `raw` into a new pattern
    pub fn new(raw: &str) -> Result<Self> {
        let compiled = Regex::new(raw)
            .with_context(|| fmt_err(&format!("Could not compile {raw} into a regex")))?;

        Ok(Self { compiled })
    }

    /// the pattern as written
    pub fn as_str(&self) -> &str {
        self.compiled.as_str()
    }

    /// every non-overlapping match of this pattern in `text`, in order of occurrence
    pub fn find_all<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.compiled.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// run this pattern against `text`, recording which pattern produced the fragments
    pub fn extract<'a>(&self, text: &'a str) -> Extraction<'a> {
        Extraction {
            pattern: self.as_str().to_string(),
            fragments: self.find_all(text),
        }
    }
}

impl From<Regex> for ExtractionPattern {
    fn from(compiled: Regex) -> Self {
        Self { compiled }
    }
}

/// PartialEq implementation for ExtractionPattern
impl PartialEq for ExtractionPattern {
    /// Simple comparison of the raw strings the patterns were compiled from
    fn eq(&self, other: &ExtractionPattern) -> bool {
        self.as_str() == other.as_str()
    }
}

/// An extra pattern that only applies to one subreddit's stylesheet
///
/// specified using `--pattern SUBREDDIT=REGEX` or a `[[patterns]]` table in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePattern {
    /// subreddit the pattern applies to
    pub source: String,

    /// pattern to run against that subreddit's stylesheet
    pub regex: ExtractionPattern,
}

impl SourcePattern {
    /// parse the `SUBREDDIT=REGEX` form used on the command line
    ///
    /// only the first `=` separates the two halves, the regex may contain more of them
    pub fn parse(value: &str) -> Result<Self> {
        let (source, raw) = value
            .split_once('=')
            .with_context(|| fmt_err(&format!("{value} is not of the form SUBREDDIT=REGEX")))?;

        let source = source.trim();

        if source.is_empty() {
            anyhow::bail!(fmt_err(&format!("{value} is missing a subreddit name")));
        }

        Ok(Self {
            source: source.to_string(),
            regex: ExtractionPattern::new(raw)?,
        })
    }
}
