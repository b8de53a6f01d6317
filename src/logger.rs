use std::env;
use std::io::Write;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use anyhow::Result;
use env_logger::{Builder, Target};

use crate::{
    config::Configuration,
    message::WideMessage,
    traits::WideSerialize,
    utils::{open_file, write_to},
};

/// map the number of -v's to a RUST_LOG filter
fn verbosity_filter(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("wide_emotes=debug,info"),
        _ => Some("wide_emotes=trace,info"),
    }
}

/// Create a customized instance of
/// [env_logger::Logger](https://docs.rs/env_logger/latest/env_logger/struct.Logger.html)
/// with timer offset/color and set the log level based on `verbosity`
pub fn initialize(config: Arc<Configuration>) -> Result<()> {
    // use occurrences of -v on commandline or verbosity = N in wide-emotes.toml to set
    // log level for the application; respects already specified RUST_LOG environment variable
    if env::var("RUST_LOG").is_err() {
        if let Some(filter) = verbosity_filter(config.verbosity) {
            env::set_var("RUST_LOG", filter);
        }
    }

    let start = Instant::now();
    let mut builder = Builder::from_default_env();

    let file = if !config.debug_log.is_empty() {
        let mut writer = open_file(&config.debug_log)?;

        // the running configuration goes first in the debug log
        write_to(&*config, &mut writer, config.json)?;

        Some(Arc::new(RwLock::new(writer)))
    } else {
        None
    };

    builder
        .format(move |buf, record| {
            let log_entry = WideMessage::from_record(record, start.elapsed());

            write!(buf, "{}", log_entry.as_str())?;

            if let Some(buffered_file) = file.clone() {
                if let Ok(mut unlocked) = buffered_file.write() {
                    let _ = write_to(&log_entry, &mut *unlocked, config.json);
                }
            }

            Ok(())
        })
        // stdout carries the head
        .target(Target::Stderr)
        .init();

    Ok(())
}
