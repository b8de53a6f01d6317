use crate::{
    strategy::SourcePattern,
    utils::{module_colorizer, status_colorizer},
    DEFAULT_ORIGIN, VERSION,
};
use std::collections::HashMap;
#[cfg(not(test))]
use std::process::exit;

/// simple helper to clean up some code reuse below; panics under test / exits in prod
pub(super) fn report_and_exit(err: &str) -> ! {
    eprintln!(
        "{} {}: {}",
        status_colorizer("ERROR"),
        module_colorizer("Configuration::new"),
        err
    );

    #[cfg(test)]
    panic!();
    #[cfg(not(test))]
    exit(1);
}

// functions origin, user_agent, and serialized_type are used to provide defaults in the event
// that a wide-emotes.toml is found but one or more of the values below aren't listed in the
// config.  This way, we get the correct defaults upon Deserialization

/// default Configuration type for use in json output
pub(super) fn serialized_type() -> String {
    String::from("configuration")
}

/// default origin value
pub(super) fn origin() -> String {
    String::from(DEFAULT_ORIGIN)
}

/// default user-agent
pub(super) fn user_agent() -> String {
    format!("wide-emotes/{VERSION}")
}

/// split a header given on the command line into its name and value
///
/// `Name: value` -> (`Name`, `value`)
pub(super) fn split_header(header: &str) -> (String, String) {
    let mut split_val = header.split(':');

    // explicitly take first split value as header's name
    let name = split_val.next().unwrap_or_default().trim().to_string();

    // all other items in the iterator returned by split, when combined with the
    // original split deliminator (:), make up the header's final value
    let value = split_val.collect::<Vec<&str>>().join(":").trim().to_string();

    (name, value)
}

/// parse every `Name: value` header, exiting on anything without a name
pub(super) fn parse_headers<'a, I>(headers: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a String>,
{
    headers
        .into_iter()
        .map(|header| {
            let (name, value) = split_header(header);

            if name.is_empty() {
                report_and_exit(&format!("Invalid header {header}, expected 'Name: value'"));
            }

            (name, value)
        })
        .collect()
}

/// parse every `SUBREDDIT=REGEX` pattern, exiting on the first bad one
pub(super) fn parse_patterns<'a, I>(patterns: I) -> Vec<SourcePattern>
where
    I: IntoIterator<Item = &'a String>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            SourcePattern::parse(pattern).unwrap_or_else(|e| report_and_exit(&e.to_string()))
        })
        .collect()
}
