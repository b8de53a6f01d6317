use std::collections::HashMap;

use super::{AnchorStrategy, Extraction, ExtractionPattern, ExtractionStrategy, SourcePattern};

/// Strategy that wraps another strategy and runs extra patterns for specific subreddits
///
/// the wrapped strategy always runs first; each extra pattern registered for the subreddit then
/// runs in registration order and produces its own extraction, i.e. its own style block.
#[derive(Debug)]
pub struct PerSourceStrategy {
    /// strategy applied to every subreddit
    base: Box<dyn ExtractionStrategy>,

    /// extra patterns, keyed by subreddit
    extra: HashMap<String, Vec<ExtractionPattern>>,
}

impl Default for PerSourceStrategy {
    fn default() -> Self {
        Self::new(Box::new(AnchorStrategy::default()))
    }
}

impl PerSourceStrategy {
    /// wrap `base` with no extra patterns
    pub fn new(base: Box<dyn ExtractionStrategy>) -> Self {
        Self {
            base,
            extra: HashMap::new(),
        }
    }

    /// add `pattern` for the subreddit named `source`
    pub fn with_pattern(mut self, source: &str, pattern: ExtractionPattern) -> Self {
        self.add_pattern(source, pattern);
        self
    }

    /// add `pattern` for the subreddit named `source`
    pub fn add_pattern(&mut self, source: &str, pattern: ExtractionPattern) {
        log::debug!("registering extra pattern {} for {}", pattern.as_str(), source);
        self.extra
            .entry(source.to_string())
            .or_default()
            .push(pattern);
    }

    /// anchor strategy plus every rule in `rules`
    pub fn from_rules(rules: &[SourcePattern]) -> Self {
        rules.iter().fold(Self::default(), |strategy, rule| {
            strategy.with_pattern(&rule.source, rule.regex.clone())
        })
    }

    /// number of extra patterns registered for `source`
    pub fn patterns_for(&self, source: &str) -> usize {
        self.extra.get(source).map_or(0, Vec::len)
    }
}

impl ExtractionStrategy for PerSourceStrategy {
    fn extract<'a>(&self, text: &'a str, source: &str) -> Vec<Extraction<'a>> {
        log::trace!("enter: extract({} bytes, {})", text.len(), source);

        let mut extractions = self.base.extract(text, source);

        if let Some(patterns) = self.extra.get(source) {
            extractions.extend(patterns.iter().map(|pattern| pattern.extract(text)));
        }

        log::trace!("exit: extract -> {} extractions", extractions.len());
        extractions
    }
}
