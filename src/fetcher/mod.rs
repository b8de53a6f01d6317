//! non-blocking same-origin retrieval of text resources
mod transport;

pub use self::transport::{Fetched, HttpTransport, Transport};
#[cfg(test)]
pub(crate) use self::transport::testing;

use std::sync::Arc;

use reqwest::Client;
use tokio::{runtime::Handle, task::JoinHandle};
use url::Url;

use crate::statistics::{StatField, Stats};

/// Context threaded through a fetch to its completion handler
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchContext {
    /// subreddit whose stylesheet was requested
    pub source: String,
}

impl FetchContext {
    /// context for a request made on behalf of `source`
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }
}

/// Body text of a completed fetch, along with whatever context the caller supplied
///
/// the context is carried through from the caller, it is never derived from the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse<C = FetchContext> {
    /// body of the response; empty when the request failed outright
    pub text: String,

    /// context given to [`Fetcher::fetch`]
    pub context: C,
}

/// Issues GET requests against a single origin and hands the body text to a callback
///
/// a `Fetcher` without a transport is inert: every fetch is skipped
#[derive(Debug, Clone)]
pub struct Fetcher {
    /// networking primitive, if one is available
    transport: Option<Arc<dyn Transport>>,

    /// origin every request is resolved against and must stay on
    origin: Url,

    /// run-wide counters
    stats: Arc<Stats>,
}

impl Fetcher {
    /// create a fetcher for `origin` using `transport`
    pub fn new(transport: Option<Arc<dyn Transport>>, origin: Url, stats: Arc<Stats>) -> Self {
        Self {
            transport,
            origin,
            stats,
        }
    }

    /// create a fetcher for `origin` backed by a reqwest client
    pub fn with_client(client: Client, origin: Url, stats: Arc<Stats>) -> Self {
        Self::new(Some(Arc::new(HttpTransport::new(client))), origin, stats)
    }

    /// whether fetches can actually be issued
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// origin requests are resolved against
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// resolve `path` against the origin; `None` if `path` is empty or leads off-origin
    pub fn resolve(&self, path: &str) -> Option<Url> {
        if path.trim().is_empty() {
            return None;
        }

        match self.origin.join(path) {
            Ok(url) if url.origin() == self.origin.origin() => Some(url),
            Ok(url) => {
                log::warn!("refusing to fetch {}: not on {}", url, self.origin);
                None
            }
            Err(e) => {
                log::warn!("could not resolve {} against {}: {}", path, self.origin, e);
                None
            }
        }
    }

    /// GET `path` in the background and call `handler` with the body text and `context` once
    /// the request completes
    ///
    /// returns `None` without touching the network when there is no transport, no tokio runtime
    /// to run on, or `path` doesn't resolve to a same-origin url. Otherwise the returned handle
    /// resolves after `handler` has run.
    ///
    /// every completion is delivered the same way: a non-2xx status hands over its body as-is,
    /// and a request that fails outright hands over an empty body. Neither is reported to
    /// `handler` as an error.
    pub fn fetch<C, F>(&self, path: &str, handler: F, context: C) -> Option<JoinHandle<()>>
    where
        C: Send + 'static,
        F: FnOnce(RawResponse<C>) + Send + 'static,
    {
        log::trace!("enter: fetch({})", path);

        let Some(transport) = self.transport.clone() else {
            log::debug!("no transport available, skipping {}", path);
            return None;
        };

        let url = self.resolve(path)?;

        let Ok(runtime) = Handle::try_current() else {
            log::warn!("no async runtime available, skipping {}", url);
            return None;
        };

        let stats = self.stats.clone();
        stats.increment(StatField::Requests);
        log::debug!("GET {}", url);

        let handle = runtime.spawn(async move {
            let text = match transport.get_text(url.clone()).await {
                Ok(fetched) => {
                    if !fetched.status.is_success() {
                        log::warn!("{} returned {}", url, fetched.status);
                        stats.increment(StatField::FailedResponses);
                    }
                    fetched.text
                }
                Err(e) => {
                    log::warn!("request to {} failed: {}", url, e);
                    stats.increment(StatField::FailedResponses);
                    String::new()
                }
            };

            stats.increment(StatField::Responses);
            handler(RawResponse { text, context });
        });

        log::trace!("exit: fetch -> Some(JoinHandle)");
        Some(handle)
    }
}
