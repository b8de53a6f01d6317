mod utils;
use futures::future::join_all;
use httpmock::Method::GET;
use httpmock::MockServer;
use reqwest::Client;
use std::sync::Arc;
use url::Url;
use utils::RAGE_CSS;
use wide_emotes::{
    document::Head,
    extractor::{Extractor, ExtractorBuilder, ExtractorState, InjectionMode},
    fetcher::Fetcher,
    sources::SourceSet,
    statistics::{StatField, Stats},
    strategy::{ExtractionPattern, PerSourceStrategy},
};

/// extractor for `sources` against the mock server, plus the head it injects into
fn setup_extractor(
    srv: &MockServer,
    sources: &[&str],
    strategy: PerSourceStrategy,
    mode: InjectionMode,
) -> (Arc<Extractor>, Arc<Head>, Arc<Stats>) {
    let stats = Arc::new(Stats::new());
    let head = Arc::new(Head::new());
    let origin = Url::parse(&srv.base_url()).unwrap();

    let extractor = ExtractorBuilder::default()
        .sources(SourceSet::new(sources.iter().copied()))
        .strategy(Box::new(strategy))
        .fetcher(Fetcher::with_client(Client::new(), origin, stats.clone()))
        .sink(head.clone())
        .stats(stats.clone())
        .mode(mode)
        .build()
        .unwrap();

    (Arc::new(extractor), head, stats)
}

/// issue every request and wait for all of the handlers to finish
async fn request_and_wait(extractor: &Arc<Extractor>, forced: bool) -> usize {
    let handles = if forced {
        extractor.request_forced()
    } else {
        extractor.request()
    }
    .unwrap_or_default();

    let issued = handles.len();
    for result in join_all(handles).await {
        result.unwrap();
    }
    issued
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
/// each subreddit's stylesheet is requested once and its emotes injected in order
async fn extractor_injects_emotes_from_each_subreddit() {
    let srv = MockServer::start_async().await;

    let rage = srv
        .mock_async(|when, then| {
            when.method(GET).path("/r/fffffffuuuuuuuuuuuu/stylesheet.css");
            then.status(200).body(RAGE_CSS);
        })
        .await;

    let pics = srv
        .mock_async(|when, then| {
            when.method(GET).path("/r/pics/stylesheet.css");
            then.status(200).body(".header{color:blue}");
        })
        .await;

    let (extractor, head, stats) = setup_extractor(
        &srv,
        &["fffffffuuuuuuuuuuuu", "pics"],
        PerSourceStrategy::default(),
        InjectionMode::Always,
    );

    assert_eq!(extractor.state(), ExtractorState::Idle);
    assert_eq!(request_and_wait(&extractor, false).await, 2);
    assert_eq!(extractor.state(), ExtractorState::Requesting);

    assert_eq!(rage.hits_async().await, 1);
    assert_eq!(pics.hits_async().await, 1);

    let blocks = head.blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].source, "fffffffuuuuuuuuuuuu");
    assert_eq!(
        blocks[0].text,
        "a[href=\"/rage1\"]{background:url(x.png)}\na[href^='/rage2']{background:url(y.png)}"
    );
    assert_eq!(stats.get(StatField::Responses), 2);
    assert_eq!(stats.get(StatField::FragmentsInjected), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
/// error pages still reach the handler and are counted, but inject nothing
async fn extractor_counts_failed_responses() {
    let srv = MockServer::start_async().await;

    let gone = srv
        .mock_async(|when, then| {
            when.method(GET).path("/r/gone/stylesheet.css");
            then.status(404).body("<html>not found</html>");
        })
        .await;

    let (extractor, head, stats) = setup_extractor(
        &srv,
        &["gone"],
        PerSourceStrategy::default(),
        InjectionMode::Always,
    );

    request_and_wait(&extractor, false).await;

    assert_eq!(gone.hits_async().await, 1);
    assert!(head.is_empty());
    assert_eq!(stats.get(StatField::Responses), 1);
    assert_eq!(stats.get(StatField::FailedResponses), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
/// an extra pattern for one subreddit adds its own block after the anchor block
async fn extractor_applies_per_subreddit_patterns() {
    let srv = MockServer::start_async().await;
    let css = "a[href=\"/pony\"]{x:1}\n.flair-pony{color:pink}";

    srv.mock_async(|when, then| {
        when.method(GET).path("/r/mylittlepony/stylesheet.css");
        then.status(200).body(css);
    })
    .await;

    srv.mock_async(|when, then| {
        when.method(GET).path("/r/mylittleonions/stylesheet.css");
        then.status(200).body(css);
    })
    .await;

    let strategy = PerSourceStrategy::default().with_pattern(
        "mylittlepony",
        ExtractionPattern::new(r"\.flair-[a-z]+\{[^}]*\}").unwrap(),
    );

    let (extractor, head, _stats) = setup_extractor(
        &srv,
        &["mylittlepony", "mylittleonions"],
        strategy,
        InjectionMode::Always,
    );

    request_and_wait(&extractor, false).await;

    let blocks = head.blocks();
    assert_eq!(blocks.len(), 3);

    let pony: Vec<&str> = blocks
        .iter()
        .filter(|block| block.source == "mylittlepony")
        .map(|block| block.text.as_str())
        .collect();
    let onions: Vec<&str> = blocks
        .iter()
        .filter(|block| block.source == "mylittleonions")
        .map(|block| block.text.as_str())
        .collect();

    assert_eq!(pony, ["a[href=\"/pony\"]{x:1}", ".flair-pony{color:pink}"]);
    assert_eq!(onions, ["a[href=\"/pony\"]{x:1}"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
/// default mode re-requests and re-injects, once-per-source only does so when forced
async fn extractor_repeat_requests_follow_injection_mode() {
    let srv = MockServer::start_async().await;

    let rage = srv
        .mock_async(|when, then| {
            when.method(GET).path("/r/fffffffuuuuuuuuuuuu/stylesheet.css");
            then.status(200).body(RAGE_CSS);
        })
        .await;

    let (always, always_head, _) = setup_extractor(
        &srv,
        &["fffffffuuuuuuuuuuuu"],
        PerSourceStrategy::default(),
        InjectionMode::Always,
    );

    request_and_wait(&always, false).await;
    request_and_wait(&always, false).await;

    assert_eq!(always_head.len(), 2);
    assert_eq!(always_head.blocks()[0], always_head.blocks()[1]);
    assert_eq!(rage.hits_async().await, 2);

    let (once, once_head, stats) = setup_extractor(
        &srv,
        &["fffffffuuuuuuuuuuuu"],
        PerSourceStrategy::default(),
        InjectionMode::OncePerSource,
    );

    assert_eq!(request_and_wait(&once, false).await, 1);
    assert_eq!(request_and_wait(&once, false).await, 0);
    assert_eq!(once_head.len(), 1);
    assert_eq!(stats.get(StatField::Requests), 1);

    assert_eq!(request_and_wait(&once, true).await, 1);
    assert_eq!(once_head.len(), 2);
    assert_eq!(rage.hits_async().await, 4);
}
