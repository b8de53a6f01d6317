use super::{ExtractorState, InjectionMode};
use crate::{
    document::{StyleBlock, StyleSink},
    fetcher::{FetchContext, Fetcher, RawResponse},
    sources::SourceSet,
    statistics::{StatField, Stats},
    strategy::{ExtractionPattern, ExtractionStrategy},
};
use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tokio::task::JoinHandle;

/// Handles all logic related to requesting subreddit stylesheets and injecting what gets
/// extracted from them
#[derive(Debug)]
pub struct Extractor {
    /// subreddits whose stylesheets get requested, fixed for the extractor's lifetime
    pub(super) sources: SourceSet,

    /// decides which fragments of each stylesheet get injected
    pub(super) strategy: Box<dyn ExtractionStrategy>,

    /// prototype fetcher; cloned once per request
    pub(super) fetcher: Fetcher,

    /// where style blocks end up
    pub(super) sink: Arc<dyn StyleSink>,

    /// run-wide counters
    pub(super) stats: Arc<Stats>,

    /// how repeated requests are treated
    pub(super) mode: InjectionMode,

    /// subreddits already requested; only consulted in `InjectionMode::OncePerSource`
    pub(super) requested: Mutex<HashSet<String>>,

    /// flipped on the first issued fetch, never flipped back
    pub(super) requesting: AtomicBool,
}

/// Extractor implementation
impl Extractor {
    /// subreddits this extractor requests
    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    /// current lifecycle state
    pub fn state(&self) -> ExtractorState {
        if self.requesting.load(Ordering::Acquire) {
            ExtractorState::Requesting
        } else {
            ExtractorState::Idle
        }
    }

    /// run-wide counters
    pub fn stats(&self) -> Arc<Stats> {
        self.stats.clone()
    }

    /// request the stylesheet of every subreddit, without waiting on any of them
    ///
    /// each completed request runs [`handle_response`](Self::handle_response) on the response
    /// body. Returns `None` when there are no subreddits to request; otherwise the handles of
    /// the fetches that were actually issued, which callers are free to ignore.
    pub fn request(self: &Arc<Self>) -> Option<Vec<JoinHandle<()>>> {
        self.issue_requests(false)
    }

    /// same as [`request`](Self::request), but subreddits already requested are requested
    /// again even in `InjectionMode::OncePerSource`
    pub fn request_forced(self: &Arc<Self>) -> Option<Vec<JoinHandle<()>>> {
        self.issue_requests(true)
    }

    /// shared implementation of `request` and `request_forced`
    fn issue_requests(self: &Arc<Self>, force: bool) -> Option<Vec<JoinHandle<()>>> {
        log::trace!("enter: issue_requests(force: {})", force);

        if self.sources.is_empty() {
            log::debug!("no subreddits configured; nothing to request");
            log::trace!("exit: issue_requests -> None");
            return None;
        }

        let mut handles = Vec::with_capacity(self.sources.len());

        for source in self.sources.iter() {
            if source.trim().is_empty() {
                log::warn!("skipping empty subreddit name");
                self.stats.increment(StatField::SkippedSources);
                continue;
            }

            let Some(claimed) = self.should_request(source, force) else {
                log::debug!("{} was already requested, skipping", source);
                continue;
            };

            let path = SourceSet::stylesheet_path(source);
            let extractor = self.clone();
            let fetcher = self.fetcher.clone();

            match fetcher.fetch(
                &path,
                move |response| extractor.handle_response(response),
                FetchContext::new(source),
            ) {
                Some(handle) => {
                    self.requesting.store(true, Ordering::Release);
                    handles.push(handle);
                }
                None => {
                    log::warn!("could not request stylesheet for {}", source);
                    self.stats.increment(StatField::SkippedSources);

                    // give up the claim so a later call can try again
                    if claimed {
                        if let Ok(mut requested) = self.requested.lock() {
                            requested.remove(source);
                        }
                    }
                }
            }
        }

        log::trace!("exit: issue_requests -> {} handles", handles.len());
        Some(handles)
    }

    /// whether `source` should be requested during this call
    ///
    /// `None` skips the subreddit. `Some(claimed)` requests it, where `claimed` says whether
    /// this call took the `InjectionMode::OncePerSource` claim and so must release it if no
    /// fetch gets issued
    fn should_request(&self, source: &str, force: bool) -> Option<bool> {
        match self.mode {
            InjectionMode::Always => Some(false),
            InjectionMode::OncePerSource => match self.requested.lock() {
                Ok(mut requested) => {
                    let claimed = requested.insert(source.to_string());
                    (claimed || force).then_some(claimed)
                }
                Err(e) => {
                    log::error!("could not check previously requested subreddits: {}", e);
                    Some(false)
                }
            },
        }
    }

    /// completion handler for every stylesheet request: run the strategy over the body and
    /// inject each extraction as its own block
    pub fn handle_response(&self, response: RawResponse) {
        log::trace!(
            "enter: handle_response({} bytes, {})",
            response.text.len(),
            response.context.source
        );

        let source = &response.context.source;
        let mut injected = 0;

        for extraction in self.strategy.extract(&response.text, source) {
            if self.inject(source, &extraction.fragments) {
                injected += 1;
            }
        }

        log::debug!("injected {} style blocks from {}", injected, source);
        log::trace!("exit: handle_response");
    }

    /// run a single `pattern` over `text` fetched for `source` and inject whatever matches
    ///
    /// returns whether a block was injected
    pub fn extract_css(&self, text: &str, source: &str, pattern: &ExtractionPattern) -> bool {
        self.inject(source, &pattern.find_all(text))
    }

    /// append one style block holding `fragments`, joined by newlines
    ///
    /// nothing is appended when `fragments` is empty; returns whether a block was appended
    pub fn inject(&self, source: &str, fragments: &[&str]) -> bool {
        let Some(block) = StyleBlock::from_fragments(source, fragments) else {
            return false;
        };

        log::debug!("injecting {} fragments from {}", fragments.len(), source);

        self.sink.append_style(block);
        self.stats.increment(StatField::BlocksInjected);
        self.stats
            .add_to_field(StatField::FragmentsInjected, fragments.len());

        true
    }
}
