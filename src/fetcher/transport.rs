use std::fmt::Debug;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, StatusCode};
use url::Url;

/// What came back from a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// status line of the response
    pub status: StatusCode,

    /// the response body, decoded as text
    pub text: String,
}

/// Transport trait; the networking primitive a [`Fetcher`](super::Fetcher) issues requests
/// through
pub trait Transport: Debug + Send + Sync {
    /// GET `url` and return its body as text
    ///
    /// a response with any status is `Ok`; `Err` is reserved for requests that never produced
    /// a response at all
    fn get_text(&self, url: Url) -> BoxFuture<'static, Result<Fetched>>;
}

/// [`Transport`] backed by a [reqwest::Client](https://docs.rs/reqwest/latest/reqwest/struct.Client.html)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// configured client; cloning it is cheap (it's an Arc internally)
    client: Client,
}

impl HttpTransport {
    /// wrap an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: Url) -> BoxFuture<'static, Result<Fetched>> {
        let client = self.client.clone();

        async move {
            log::trace!("enter: get_text({})", url);

            let response = client.get(url).send().await?;
            let status = response.status();
            let text = response.text().await?;

            log::trace!("exit: get_text -> {} ({} bytes)", status, text.len());
            Ok(Fetched { status, text })
        }
        .boxed()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Transport that serves canned bodies by path and records every url it was asked for
    ///
    /// unknown paths get a 404 with an empty body
    #[derive(Debug, Default)]
    pub(crate) struct StaticTransport {
        /// path -> (status, body)
        responses: HashMap<String, (StatusCode, String)>,

        /// every url requested, in request order
        pub(crate) requested: Mutex<Vec<Url>>,
    }

    impl StaticTransport {
        /// serve `body` with a 200 at `path`
        pub(crate) fn with_body(mut self, path: &str, body: &str) -> Self {
            self.responses
                .insert(path.to_string(), (StatusCode::OK, body.to_string()));
            self
        }

        /// serve `body` with `status` at `path`
        pub(crate) fn with_status(mut self, path: &str, status: StatusCode, body: &str) -> Self {
            self.responses
                .insert(path.to_string(), (status, body.to_string()));
            self
        }

        /// paths requested so far
        pub(crate) fn requested_paths(&self) -> Vec<String> {
            self.requested
                .lock()
                .unwrap()
                .iter()
                .map(|url| url.path().to_string())
                .collect()
        }
    }

    impl Transport for StaticTransport {
        fn get_text(&self, url: Url) -> BoxFuture<'static, Result<Fetched>> {
            self.requested.lock().unwrap().push(url.clone());

            let (status, text) = self
                .responses
                .get(url.path())
                .cloned()
                .unwrap_or((StatusCode::NOT_FOUND, String::new()));

            async move { Ok(Fetched { status, text }) }.boxed()
        }
    }

    /// Transport whose requests always fail before a response arrives
    #[derive(Debug, Default)]
    pub(crate) struct BrokenTransport;

    impl Transport for BrokenTransport {
        fn get_text(&self, url: Url) -> BoxFuture<'static, Result<Fetched>> {
            async move { Err(anyhow::anyhow!("connection refused: {}", url)) }.boxed()
        }
    }
}
