pub mod config;
mod client;
pub mod document;
pub mod extractor;
pub mod fetcher;
pub mod logger;
mod message;
mod parser;
pub mod sources;
pub mod statistics;
pub mod strategy;
pub mod traits;
pub mod utils;

/// Version pulled from Cargo.toml at compile time
pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default filename for config file settings
///
/// Searched for in `/etc/wide-emotes/`, the user's config directory, the directory of the
/// binary, and finally the current working directory.
pub const DEFAULT_CONFIG_NAME: &str = "wide-emotes.toml";

/// Default site whose subreddit stylesheets are fetched; every request stays on this origin
pub const DEFAULT_ORIGIN: &str = "https://www.reddit.com";

/// Path template for a subreddit's stylesheet; `{}` is replaced by the subreddit name
pub const STYLESHEET_PATH_TEMPLATE: &str = "/r/{}/stylesheet.css";

/// `title` attribute placed on every injected `<style>` element so the block can be attributed
/// to this tool when a page is inspected
pub const STYLE_TITLE: &str = "applied_subreddit_stylesheet";

/// `type` attribute placed on every injected `<style>` element
pub const STYLE_TYPE: &str = "text/css";

/// Regular expression matching anchor rules that target relative hrefs, through to the next
/// closing brace
///
/// matches `a[href="/rage1"]{...}`, `a[href^='/rage']{...}` and `a[href|="/rage"]{...}`
pub const DEFAULT_EMOTE_REGEX: &str = r#"a\[href[\^|]?=['"]/[^}]+\}"#;
