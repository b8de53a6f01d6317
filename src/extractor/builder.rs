use super::container::Extractor;
use super::InjectionMode;
use crate::{
    document::StyleSink,
    fetcher::Fetcher,
    sources::SourceSet,
    statistics::Stats,
    strategy::{AnchorStrategy, ExtractionStrategy},
};
use anyhow::{bail, Result};
use std::collections::HashSet;
use std::sync::{atomic::AtomicBool, Arc, Mutex};

/// responsible for building an `Extractor`
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    /// subreddits whose stylesheets get requested
    sources: SourceSet,

    /// decides which fragments of each stylesheet get injected
    strategy: Option<Box<dyn ExtractionStrategy>>,

    /// issues the requests
    fetcher: Option<Fetcher>,

    /// where style blocks end up
    sink: Option<Arc<dyn StyleSink>>,

    /// run-wide counters
    stats: Option<Arc<Stats>>,

    /// how repeated requests are treated
    mode: InjectionMode,
}

/// ExtractorBuilder implementation
impl ExtractorBuilder {
    /// builder call to set `sources`
    pub fn sources(&mut self, sources: SourceSet) -> &mut Self {
        self.sources = sources;
        self
    }

    /// builder call to set `strategy`
    pub fn strategy(&mut self, strategy: Box<dyn ExtractionStrategy>) -> &mut Self {
        self.strategy = Some(strategy);
        self
    }

    /// builder call to set `fetcher`
    pub fn fetcher(&mut self, fetcher: Fetcher) -> &mut Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// builder call to set `sink`
    pub fn sink(&mut self, sink: Arc<dyn StyleSink>) -> &mut Self {
        self.sink = Some(sink);
        self
    }

    /// builder call to set `stats`
    pub fn stats(&mut self, stats: Arc<Stats>) -> &mut Self {
        self.stats = Some(stats);
        self
    }

    /// builder call to set `mode`
    pub fn mode(&mut self, mode: InjectionMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// finalize configuration of `ExtractorBuilder` and return an `Extractor`
    ///
    /// requires both `fetcher` and `sink` to have been used in the build process; the strategy
    /// defaults to [`AnchorStrategy`]
    pub fn build(&mut self) -> Result<Extractor> {
        let (Some(fetcher), Some(sink)) = (self.fetcher.take(), self.sink.take()) else {
            bail!("Extractor requires both a Fetcher and a StyleSink be specified")
        };

        Ok(Extractor {
            sources: std::mem::take(&mut self.sources),
            strategy: self
                .strategy
                .take()
                .unwrap_or_else(|| Box::new(AnchorStrategy::default())),
            fetcher,
            sink,
            stats: self.stats.take().unwrap_or_default(),
            mode: self.mode,
            requested: Mutex::new(HashSet::new()),
            requesting: AtomicBool::new(false),
        })
    }
}
