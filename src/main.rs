use std::{
    io::{stdout, Write},
    sync::Arc,
};

use anyhow::{Context, Result};
use futures::future::join_all;

use wide_emotes::{
    config::Configuration,
    document::Head,
    extractor::{Extractor, ExtractorBuilder},
    fetcher::Fetcher,
    logger,
    statistics::Stats,
    strategy::PerSourceStrategy,
    traits::WideSerialize,
    utils::{fmt_err, open_file, write_to},
};

/// write the finished head to `writer`; html by default, one NDJSON entry per block with --json
fn write_head(head: &Head, writer: &mut dyn Write, json: bool) -> Result<()> {
    log::trace!("enter: write_head({}, {})", head.len(), json);

    if json {
        for block in head.blocks() {
            write_to(&block, writer, true)?;
        }
    } else {
        writer.write_all(head.to_html().as_bytes())?;
        writer.flush()?;
    }

    log::trace!("exit: write_head");
    Ok(())
}

/// wire configuration into an extractor, run every request to completion, and write the head
async fn wrapped_main(config: Arc<Configuration>) -> Result<()> {
    log::trace!("enter: wrapped_main");

    let stats = Arc::new(Stats::new());
    let head = Arc::new(Head::new());

    let fetcher = Fetcher::with_client(config.client.clone(), config.origin_url()?, stats.clone());
    let strategy = PerSourceStrategy::from_rules(&config.patterns);

    let extractor: Arc<Extractor> = Arc::new(
        ExtractorBuilder::default()
            .sources(config.sources.clone())
            .strategy(Box::new(strategy))
            .fetcher(fetcher)
            .sink(head.clone())
            .stats(stats.clone())
            .mode(config.injection_mode())
            .build()?,
    );

    match extractor.request() {
        Some(handles) => {
            for result in join_all(handles).await {
                if let Err(e) = result {
                    log::error!("{}", e);
                }
            }
        }
        None => log::warn!("nothing to do: no subreddits given"),
    }

    if config.output.is_empty() {
        write_head(&head, &mut stdout().lock(), config.json)?;
    } else {
        let mut file = open_file(&config.output)?;
        write_head(&head, &mut file, config.json)?;
    }

    log::debug!("{}", stats.as_str().trim_end());
    log::trace!("exit: wrapped_main");
    Ok(())
}

fn main() -> Result<()> {
    let config = Arc::new(Configuration::new().with_context(|| "Could not create Configuration")?);

    logger::initialize(config.clone())?;

    log::debug!("{:#?}", config);

    let runtime = tokio::runtime::Runtime::new()
        .with_context(|| fmt_err("Could not create tokio runtime"))?;

    let result = runtime.block_on(wrapped_main(config));

    log::trace!("exit: main -> {:?}", result);
    result
}
