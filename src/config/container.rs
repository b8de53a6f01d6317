use super::utils::{
    origin, parse_headers, parse_patterns, report_and_exit, serialized_type, user_agent,
};
use crate::{
    client::{self, ClientConfig},
    extractor::InjectionMode,
    parser,
    sources::SourceSet,
    strategy::SourcePattern,
    traits::WideSerialize,
    utils::fmt_err,
    DEFAULT_CONFIG_NAME,
};
use anyhow::{anyhow, Context, Result};
use clap::{parser::ValueSource, ArgMatches};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    env::{current_dir, current_exe},
    fs::read_to_string,
    path::{Path, PathBuf},
};
use url::Url;

/// macro helper to abstract away repetitive configuration updates
macro_rules! update_config_if_present {
    ($conf_val:expr, $matches:ident, $arg_name:expr, $arg_type:ty) => {
        match $matches.get_one::<$arg_type>($arg_name) {
            Some(value) => *$conf_val = value.to_owned(), // Update value
            None => {}
        }
    };
}

/// macro helper to abstract away repetitive if not default: update checks
macro_rules! update_if_not_default {
    ($old:expr, $new:expr, $default:expr) => {
        if $new != $default {
            *$old = $new;
        }
    };
}

/// macro helper to abstract away repetitive checks to see if the user has specified a value
/// for a given argument from the commandline or if we just had a default value in the parser
macro_rules! came_from_cli {
    ($matches:ident, $arg_name:expr) => {
        matches!(
            $matches.value_source($arg_name),
            Some(ValueSource::CommandLine)
        )
    };
}

/// macro helper to abstract away repetitive if not default: update checks, specifically for
/// values that are number types, i.e. usize, u64, etc
macro_rules! update_config_with_num_type_if_present {
    ($conf_val:expr, $matches:ident, $arg_name:expr, $arg_type:ty) => {
        if let Some(val) = $matches.get_one::<String>($arg_name) {
            match val.parse::<$arg_type>() {
                Ok(v) => *$conf_val = v,
                Err(_) => {
                    report_and_exit(&format!(
                        "Invalid value for --{}, must be a positive integer",
                        $arg_name
                    ));
                }
            }
        }
    };
}

/// Represents the final, global configuration of the program.
///
/// This struct is the combination of the following:
/// - default configuration values
/// - plus overrides read from configuration files
/// - plus command-line options
///
/// In that order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Configuration {
    #[serde(rename = "type", default = "serialized_type")]
    /// Name of this type of struct, used for serialization, i.e. `{"type":"configuration"}`
    pub kind: String,

    /// Path to the config file used
    #[serde(default)]
    pub config: String,

    /// Subreddits whose stylesheets are requested
    #[serde(default)]
    pub sources: SourceSet,

    /// Site the stylesheets are requested from (default: https://www.reddit.com)
    #[serde(default = "origin")]
    pub origin: String,

    /// Extra patterns applied to specific subreddits
    #[serde(default)]
    pub patterns: Vec<SourcePattern>,

    /// Request each subreddit at most once instead of re-injecting on every request
    #[serde(default)]
    pub once_per_source: bool,

    /// Instance of [reqwest::Client](https://docs.rs/reqwest/latest/reqwest/struct.Client.html)
    #[serde(skip)]
    pub client: Client,

    /// Number of seconds before a request times out; 0 means requests never time out
    #[serde(default)]
    pub timeout: u64,

    /// Level of verbosity, equates to log level
    #[serde(default)]
    pub verbosity: u8,

    /// Store injected style blocks and log output as NDJSON
    #[serde(default)]
    pub json: bool,

    /// Output file to write the resulting head to (default: stdout)
    #[serde(default)]
    pub output: String,

    /// File in which to store debug output, used in conjunction with verbosity to dictate which
    /// logs are written
    #[serde(default)]
    pub debug_log: String,

    /// Sets the User-Agent (default: wide-emotes/VERSION)
    #[serde(default = "user_agent")]
    pub user_agent: String,

    /// Proxy to use for requests (ex: http(s)://host:port, socks5(h)://host:port)
    #[serde(default)]
    pub proxy: String,

    /// Follow redirects, as long as they stay on the origin
    #[serde(default)]
    pub redirects: bool,

    /// Disables TLS certificate validation
    #[serde(default)]
    pub insecure: bool,

    /// HTTP headers to be used in each request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for Configuration {
    /// Builds the default Configuration for wide-emotes
    fn default() -> Self {
        let origin = origin();
        let user_agent = user_agent();
        let headers = HashMap::new();

        let client = Url::parse(&origin)
            .map_err(anyhow::Error::from)
            .and_then(|parsed| {
                client::initialize(ClientConfig {
                    timeout: 0,
                    user_agent: &user_agent,
                    redirects: false,
                    insecure: false,
                    headers: &headers,
                    proxy: None,
                    origin: &parsed,
                })
            })
            .unwrap_or_default();

        Configuration {
            kind: serialized_type(),
            config: String::new(),
            sources: SourceSet::default(),
            origin,
            patterns: Vec::new(),
            once_per_source: false,
            client,
            timeout: 0,
            verbosity: 0,
            json: false,
            output: String::new(),
            debug_log: String::new(),
            user_agent,
            proxy: String::new(),
            redirects: false,
            insecure: false,
            headers,
        }
    }
}

impl Configuration {
    /// Creates a [Configuration](struct.Configuration.html) object with the following
    /// built-in default values
    ///
    /// - **sources**: none
    /// - **origin**: `https://www.reddit.com`
    /// - **patterns**: none
    /// - **once_per_source**: `false`
    /// - **timeout**: `0` (no timeout)
    /// - **verbosity**: `0` (no logging enabled)
    /// - **json**: `false`
    /// - **output**: `None` (print to stdout)
    /// - **debug_log**: `None` (don't write logs to a file)
    /// - **user_agent**: `wide-emotes/VERSION`
    /// - **proxy**: `None`
    /// - **redirects**: `false`
    /// - **insecure**: `false` (don't be insecure, i.e. don't allow invalid certs)
    /// - **headers**: `None`
    ///
    /// After which, any values defined in a
    /// [wide-emotes.toml](constant.DEFAULT_CONFIG_NAME.html) config file will override the
    /// built-in defaults.
    ///
    /// `wide-emotes.toml` can be placed in any of the following locations (in the order shown):
    /// - `/etc/wide-emotes/`
    /// - `CONFIG_DIR/wide-emotes/`
    /// - The same directory as the `wide-emotes` executable
    /// - The user's current working directory
    ///
    /// A file given with `--config` is merged last.
    ///
    /// If more than one valid configuration file is found, each one overwrites the values found
    /// previously.
    ///
    /// Finally, any options/arguments given on the commandline will override both built-in and
    /// config-file specified values.
    pub fn new() -> Result<Self> {
        // when compiling for test, we want to eliminate the runtime dependency of the parser
        if cfg!(test) {
            return Ok(Configuration::default());
        }

        let args = parser::initialize().get_matches();

        // Get the default configuration, this is what will apply if nothing
        // else is specified.
        let mut config = Configuration::default();

        // read in all config files
        Self::parse_config_files(&mut config)?;

        if let Some(config_file) = args.get_one::<String>("config") {
            let path = PathBuf::from(config_file);

            if !path.exists() {
                report_and_exit(&format!("Could not find config file {config_file}"));
            }

            Self::parse_and_merge_config(path, &mut config)?;
        }

        let cli_config = Self::parse_cli_args(&args);

        // merge the cli options into the config file options and return the result
        Self::merge_config(&mut config, cli_config);

        // rebuild client is the last step
        Self::try_rebuild_client(&mut config)?;

        Ok(config)
    }

    /// Parse all possible versions of the wide-emotes.toml file, adhering to the order of
    /// precedence outlined above
    fn parse_config_files(config: &mut Self) -> Result<()> {
        // merge a config found at /etc/wide-emotes/wide-emotes.toml
        let config_file = Path::new("/etc/wide-emotes").join(DEFAULT_CONFIG_NAME);
        Self::parse_and_merge_config(config_file, config)?;

        // merge a config found at ~/.config/wide-emotes/wide-emotes.toml
        // config_dir() resolves to one of the following
        //   - linux: $XDG_CONFIG_HOME or $HOME/.config
        //   - macOS: $HOME/Library/Application Support
        //   - windows: {FOLDERID_RoamingAppData}
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow!("Couldn't load config"))?;
        let config_file = config_dir.join("wide-emotes").join(DEFAULT_CONFIG_NAME);
        Self::parse_and_merge_config(config_file, config)?;

        // merge a config found in same the directory as wide-emotes executable
        let exe_path = current_exe()?;
        let bin_dir = exe_path
            .parent()
            .ok_or_else(|| anyhow!("Couldn't load config"))?;
        let config_file = bin_dir.join(DEFAULT_CONFIG_NAME);
        Self::parse_and_merge_config(config_file, config)?;

        // merge a config found in the user's current working directory
        let cwd = current_dir()?;
        let config_file = cwd.join(DEFAULT_CONFIG_NAME);
        Self::parse_and_merge_config(config_file, config)?;

        Ok(())
    }

    /// Given a set of ArgMatches read from the CLI, update and return the default Configuration
    /// settings
    pub(super) fn parse_cli_args(args: &ArgMatches) -> Self {
        let mut config = Configuration::default();

        update_config_with_num_type_if_present!(&mut config.timeout, args, "timeout", u64);
        update_config_if_present!(&mut config.output, args, "output", String);
        update_config_if_present!(&mut config.debug_log, args, "debug_log", String);
        update_config_if_present!(&mut config.user_agent, args, "user_agent", String);
        update_config_if_present!(&mut config.proxy, args, "proxy", String);

        if let Some(arg) = args.get_many::<String>("sources") {
            config.sources = SourceSet::new(arg.cloned());
        }

        if let Some(arg) = args.get_one::<String>("origin") {
            if let Err(e) = Url::parse(arg) {
                report_and_exit(&format!("Invalid value for --origin ({arg}): {e}"));
            }
            arg.clone_into(&mut config.origin);
        }

        if let Some(arg) = args.get_many::<String>("patterns") {
            config.patterns = parse_patterns(arg);
        }

        if let Some(arg) = args.get_many::<String>("headers") {
            config.headers = parse_headers(arg);
        }

        if came_from_cli!(args, "once_per_source") {
            config.once_per_source = true;
        }

        if came_from_cli!(args, "json") {
            config.json = true;
        }

        if came_from_cli!(args, "redirects") {
            config.redirects = true;
        }

        if came_from_cli!(args, "insecure") {
            config.insecure = true;
        }

        if came_from_cli!(args, "verbosity") {
            config.verbosity = args.get_count("verbosity");
        }

        config
    }

    /// the request client needs to be rebuilt whenever a value that affects it differs from
    /// its default
    fn try_rebuild_client(configuration: &mut Configuration) -> Result<()> {
        let origin_url = configuration.origin_url()?;

        let proxy = if configuration.proxy.is_empty() {
            None
        } else {
            Some(configuration.proxy.as_str())
        };

        if proxy.is_some()
            || configuration.timeout != 0
            || configuration.user_agent != user_agent()
            || configuration.redirects
            || configuration.insecure
            || !configuration.headers.is_empty()
            || configuration.origin != origin()
        {
            configuration.client = client::initialize(ClientConfig {
                timeout: configuration.timeout,
                user_agent: &configuration.user_agent,
                redirects: configuration.redirects,
                insecure: configuration.insecure,
                headers: &configuration.headers,
                proxy,
                origin: &origin_url,
            })
            .with_context(|| fmt_err("Could not rebuild client"))?;
        }

        Ok(())
    }

    /// Given a configuration file's location and an instance of `Configuration`, read in
    /// the config file if found and update the current settings with the settings found therein
    fn parse_and_merge_config(config_file: PathBuf, config: &mut Self) -> Result<()> {
        if config_file.exists() {
            // save off a string version of the path before it goes out of scope
            let conf_str = config_file.to_str().unwrap_or("").to_string();
            let settings = Self::parse_config(config_file)?;

            // set the config used for viewing in the debug log
            config.config = conf_str;

            // update the settings
            Self::merge_config(config, settings);
        }
        Ok(())
    }

    /// Given two Configurations, overwrite `conf` with values found in `new`
    ///
    /// patterns accumulate rather than overwrite, every other value is replaced when `new`
    /// holds something other than its default
    pub(super) fn merge_config(conf: &mut Self, new: Self) {
        // does not include the following Configuration fields, as they don't make sense here
        //  - kind
        //  - client
        //  - config
        update_if_not_default!(&mut conf.sources, new.sources, SourceSet::default());
        update_if_not_default!(&mut conf.origin, new.origin, origin());
        update_if_not_default!(&mut conf.once_per_source, new.once_per_source, false);
        update_if_not_default!(&mut conf.timeout, new.timeout, 0);
        update_if_not_default!(&mut conf.verbosity, new.verbosity, 0);
        update_if_not_default!(&mut conf.json, new.json, false);
        update_if_not_default!(&mut conf.output, new.output, "");
        update_if_not_default!(&mut conf.debug_log, new.debug_log, "");
        update_if_not_default!(&mut conf.user_agent, new.user_agent, user_agent());
        update_if_not_default!(&mut conf.proxy, new.proxy, "");
        update_if_not_default!(&mut conf.redirects, new.redirects, false);
        update_if_not_default!(&mut conf.insecure, new.insecure, false);
        update_if_not_default!(&mut conf.headers, new.headers, HashMap::new());
        conf.patterns.extend(new.patterns);
    }

    /// If present, read in `DEFAULT_CONFIG_NAME` and deserialize the specified values
    ///
    /// uses serde to deserialize the toml into a `Configuration` struct
    pub(super) fn parse_config(config_file: PathBuf) -> Result<Self> {
        let content = read_to_string(&config_file)
            .with_context(|| fmt_err(&format!("Could not read {}", config_file.display())))?;

        let config: Self = toml::from_str(content.as_str())
            .with_context(|| fmt_err(&format!("Could not parse {}", config_file.display())))?;

        Ok(config)
    }

    /// the origin as a parsed url
    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin)
            .with_context(|| fmt_err(&format!("{} is not a valid origin", self.origin)))
    }

    /// how repeated requests should treat subreddits already requested
    pub fn injection_mode(&self) -> InjectionMode {
        if self.once_per_source {
            InjectionMode::OncePerSource
        } else {
            InjectionMode::Always
        }
    }
}

/// Implementation of WideSerialize for Configuration
impl WideSerialize for Configuration {
    /// Pretty-printed debug representation
    fn as_str(&self) -> String {
        format!("{:#?}\n", *self)
    }

    /// Create an NDJSON representation of the current Configuration
    ///
    /// (expanded for clarity)
    /// ex:
    /// {
    ///    "type":"configuration",
    ///    "config":"/home/user/.config/wide-emotes/wide-emotes.toml",
    ///    "sources":["fffffffuuuuuuuuuuuu"],
    ///    "origin":"https://www.reddit.com",
    ///    "patterns":[],
    /// ...
    /// }\n
    fn as_json(&self) -> Result<String> {
        let mut json = serde_json::to_string(&self)
            .with_context(|| fmt_err("Could not convert Configuration to JSON"))?;
        json.push('\n');
        Ok(json)
    }
}
