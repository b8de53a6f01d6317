//! request subreddit stylesheets and inject the rules a strategy extracts from them
mod builder;
mod container;

pub use self::builder::ExtractorBuilder;
pub use self::container::Extractor;

use serde::{Deserialize, Serialize};

/// How repeated calls to [`Extractor::request`] treat subreddits that were already requested
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionMode {
    /// every call re-fetches and re-injects everything, duplicating blocks
    #[default]
    Always,

    /// a subreddit is requested at most once per extractor, unless the request is forced
    OncePerSource,
}

/// Lifecycle of an extractor; there is no terminal state since completion isn't tracked
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtractorState {
    /// nothing has been requested yet
    Idle,

    /// at least one fetch has been issued
    Requesting,
}
