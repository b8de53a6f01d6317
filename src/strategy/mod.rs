//! everything that decides which parts of a fetched stylesheet get injected
mod anchor;
mod pattern;
mod per_source;

pub use self::anchor::AnchorStrategy;
pub use self::pattern::{ExtractionPattern, SourcePattern};
pub use self::per_source::PerSourceStrategy;

use std::fmt::Debug;

/// Fragments matched by a single pattern in a single stylesheet
///
/// each `Extraction` becomes (at most) one injected style block. Fragments borrow from the
/// stylesheet text, so nothing that isn't in the original response can end up injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// pattern that produced the fragments, as written
    pub pattern: String,

    /// non-overlapping matches, in order of occurrence
    pub fragments: Vec<&'a str>,
}

impl<'a> Extraction<'a> {
    /// whether the pattern matched anything at all
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// ExtractionStrategy trait; decides which patterns run against the stylesheet of a given
/// subreddit
///
/// the extractor holds exactly one strategy; per-source behavior is added by composing
/// strategies rather than by replacing the extractor.
pub trait ExtractionStrategy: Debug + Send + Sync {
    /// run every applicable pattern against `text`, fetched from `source`'s stylesheet
    ///
    /// returns one [`Extraction`] per pattern that ran, in the order they ran; extractions
    /// without fragments are allowed and are simply not injected
    fn extract<'a>(&self, text: &'a str, source: &str) -> Vec<Extraction<'a>>;
}
