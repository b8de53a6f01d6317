use clap::{Arg, ArgAction, Command, ValueHint};

/// Create and return an instance of [clap::Command](https://docs.rs/clap/latest/clap/struct.Command.html), i.e. the Command Line Interface's configuration
pub fn initialize() -> Command {
    let app = Command::new("wide-emotes")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Paul McMonagle <mcmonagle.paul@gmail.com>")
        .about("Fetch subreddit stylesheets and re-apply their emote rules anywhere on the site");

    /////////////////////////////////////////////////////////////////////
    // group - target selection
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("sources")
                .value_name("SUBREDDIT")
                .num_args(1..)
                .help("Subreddit(s) whose stylesheet emotes should be applied (ex: fffffffuuuuuuuuuuuu)")
                .help_heading("Target selection"),
        )
        .arg(
            Arg::new("origin")
                .short('u')
                .long("origin")
                .value_name("URL")
                .value_hint(ValueHint::Url)
                .help("Site the stylesheets are requested from (default: https://www.reddit.com)")
                .help_heading("Target selection"),
        );

    /////////////////////////////////////////////////////////////////////
    // group - extraction settings
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("patterns")
                .short('e')
                .long("pattern")
                .value_name("SUBREDDIT=REGEX")
                .num_args(1)
                .action(ArgAction::Append)
                .help("Extra regex to run against one subreddit's stylesheet; each pattern injects its own style block (ex: -e 'mylittlepony=\\.flair-[a-z]+\\{[^}]*\\}')")
                .help_heading("Extraction settings"),
        )
        .arg(
            Arg::new("once_per_source")
                .long("once-per-source")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .help("Request each subreddit at most once, even if it is listed more than once")
                .help_heading("Extraction settings"),
        );

    /////////////////////////////////////////////////////////////////////
    // group - request settings
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("user_agent")
                .short('a')
                .long("user-agent")
                .value_name("USER_AGENT")
                .num_args(1)
                .help("Sets the User-Agent (default: wide-emotes/VERSION)")
                .help_heading("Request settings"),
        )
        .arg(
            Arg::new("headers")
                .short('H')
                .long("headers")
                .value_name("HEADER")
                .num_args(1)
                .action(ArgAction::Append)
                .help("Specify HTTP headers to be used in each request (ex: -H Header:val -H 'stuff: things')")
                .help_heading("Request settings"),
        )
        .arg(
            Arg::new("proxy")
                .short('p')
                .long("proxy")
                .value_name("PROXY")
                .num_args(1)
                .value_hint(ValueHint::Url)
                .help("Proxy to use for requests (ex: http(s)://host:port, socks5(h)://host:port)")
                .help_heading("Request settings"),
        )
        .arg(
            Arg::new("timeout")
                .short('T')
                .long("timeout")
                .value_name("SECONDS")
                .num_args(1)
                .help("Number of seconds before a request times out (default: never)")
                .help_heading("Request settings"),
        )
        .arg(
            Arg::new("redirects")
                .short('r')
                .long("redirects")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .help("Allow client to follow redirects that stay on the origin")
                .help_heading("Request settings"),
        )
        .arg(
            Arg::new("insecure")
                .short('k')
                .long("insecure")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .help("Disables TLS certificate validation in the client")
                .help_heading("Request settings"),
        );

    /////////////////////////////////////////////////////////////////////
    // group - output settings
    /////////////////////////////////////////////////////////////////////
    let app = app
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0)
                .action(ArgAction::Count)
                .help("Increase verbosity level (use -vv or more for greater effect. [CAUTION] 4 -v's is probably too much)")
                .help_heading("Output settings"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .num_args(1)
                .help("Output file to write the resulting <head> to (default: stdout)")
                .help_heading("Output settings"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .help("Emit JSON logs and style blocks to --output and --debug-log instead of html/text")
                .help_heading("Output settings"),
        )
        .arg(
            Arg::new("debug_log")
                .long("debug-log")
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .num_args(1)
                .help("Output file to write log entries (use w/ --json for JSON entries)")
                .help_heading("Output settings"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_hint(ValueHint::FilePath)
                .num_args(1)
                .help("Read settings from this config file after any wide-emotes.toml found on the system")
                .help_heading("Output settings"),
        );

    /////////////////////////////////////////////////////////////////////
    // usage examples
    /////////////////////////////////////////////////////////////////////
    app.after_long_help(
        "EXAMPLES:
    Apply rage-face emotes from r/fffffffuuuuuuuuuuuu:
        ./wide-emotes fffffffuuuuuuuuuuuu

    Pony emotes from two subreddits, plus a tokenized section only r/mylittlepony has:
        ./wide-emotes mylittlepony mylittleonions -e 'mylittlepony=//===IMAGINARY CSS TOKEN===[\\s\\S]*//===END IMAGINARY CSS TOKEN==='

    Write the injected blocks as NDJSON to a file, with debug logging:
        ./wide-emotes fffffffuuuuuuuuuuuu --json -o blocks.json -vvv
    ",
    )
}
