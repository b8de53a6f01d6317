use super::{Extraction, ExtractionPattern, ExtractionStrategy};
use crate::DEFAULT_EMOTE_REGEX;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// [DEFAULT_EMOTE_REGEX](../constant.DEFAULT_EMOTE_REGEX.html) compiled once
    static ref EMOTE_REGEX: Regex = Regex::new(DEFAULT_EMOTE_REGEX).unwrap();
}

/// Default strategy: pull every anchor rule targeting a relative href, for every subreddit
///
/// there is no per-subreddit behavior here; see [`PerSourceStrategy`](super::PerSourceStrategy)
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorStrategy {
    /// the anchor pattern
    pattern: ExtractionPattern,
}

impl Default for AnchorStrategy {
    fn default() -> Self {
        Self {
            pattern: ExtractionPattern::from(EMOTE_REGEX.clone()),
        }
    }
}

impl AnchorStrategy {
    /// the default anchor strategy
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtractionStrategy for AnchorStrategy {
    fn extract<'a>(&self, text: &'a str, source: &str) -> Vec<Extraction<'a>> {
        log::trace!("enter: extract({} bytes, {})", text.len(), source);

        let extraction = self.pattern.extract(text);

        log::trace!("exit: extract -> {} fragments", extraction.fragments.len());
        vec![extraction]
    }
}
