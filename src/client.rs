use anyhow::Result;
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client, Proxy};
use std::collections::HashMap;
use std::convert::TryInto;
use std::time::Duration;
use url::Url;

/// Configuration struct for initializing a reqwest client
pub struct ClientConfig<'a> {
    /// The timeout for requests in seconds; 0 disables the timeout
    pub timeout: u64,
    /// The User-Agent string to use for requests
    pub user_agent: &'a str,
    /// Whether to follow redirects
    pub redirects: bool,
    /// Whether to allow insecure connections
    pub insecure: bool,
    /// Headers to include in requests
    pub headers: &'a HashMap<String, String>,
    /// Proxy server to use for requests
    pub proxy: Option<&'a str>,
    /// origin every redirect must stay on
    pub origin: &'a Url,
}

/// Create a redirect policy based on the provided config
///
/// stylesheets are same-origin resources, so redirects are only followed while they stay on
/// the configured origin
fn create_redirect_policy(config: &ClientConfig<'_>) -> Policy {
    if !config.redirects {
        return Policy::none();
    }

    let origin = config.origin.origin();

    Policy::custom(move |attempt| {
        if attempt.previous().len() >= 10 {
            attempt.error("too many redirects")
        } else if attempt.url().origin() == origin {
            attempt.follow()
        } else {
            attempt.stop()
        }
    })
}

/// Create and return an instance of [reqwest::Client](https://docs.rs/reqwest/latest/reqwest/struct.Client.html)
pub fn initialize(config: ClientConfig<'_>) -> Result<Client> {
    let policy = create_redirect_policy(&config);

    let header_map: HeaderMap = config.headers.try_into()?;

    let mut client = Client::builder()
        .user_agent(config.user_agent)
        .danger_accept_invalid_certs(config.insecure)
        .default_headers(header_map)
        .redirect(policy);

    if config.timeout > 0 {
        client = client.timeout(Duration::from_secs(config.timeout));
    }

    if let Some(some_proxy) = config.proxy {
        if !some_proxy.is_empty() {
            // it's not an empty string; set the proxy
            let proxy_obj = Proxy::all(some_proxy)?;
            client = client.proxy(proxy_obj);
        }
    }

    Ok(client.build()?)
}
