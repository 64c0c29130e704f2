use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobscout::app::JobScoutError;
use jobscout::domain::{SelectorMap, SiteConfig};
use jobscout::fetcher::config::HttpConfig;
use jobscout::fetcher::http_fetcher::HttpFetcher;
use jobscout::fetcher::{FetchFailure, FetchResult, Fetcher, SiteFetcher};
use jobscout::orchestrator::{Orchestrator, ScrapeRequest, SourceState};
use jobscout::registry::SiteRegistry;

fn listing(jobs: &[(&str, &str)]) -> String {
    let cards: String = jobs
        .iter()
        .enumerate()
        .map(|(i, (title, company))| {
            format!(
                r#"<div class="job">
                     <h2><a class="title" href="/job/{i}">{title}</a></h2>
                     <span class="company">{company}</span>
                     <span class="loc">Cape Town</span>
                     <time datetime="2024-03-0{day}T08:00:00Z">recent</time>
                   </div>"#,
                day = i + 1
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn site(id: &str, server: &MockServer, route: &str) -> SiteConfig {
    SiteConfig {
        id: id.to_string(),
        name: id.to_uppercase(),
        base_url: server.uri(),
        search_url: format!("{}{}?q={{query}}&l={{location}}&p={{page}}", server.uri(), route),
        selectors: SelectorMap {
            container: ".job".into(),
            title: ".title".into(),
            company: ".company".into(),
            location: Some(".loc".into()),
            link: Some(".title".into()),
            date_posted: Some("time".into()),
            ..Default::default()
        },
        rate_limit_secs: 0.0,
        max_pages: 5,
        page_size: 10,
        fetch_mode: Default::default(),
        enabled: true,
    }
}

fn orchestrator(sites: Vec<SiteConfig>) -> Orchestrator {
    let registry = Arc::new(SiteRegistry::from_sites(sites).unwrap());
    let http: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_defaults().unwrap());
    Orchestrator::new(registry, SiteFetcher::new(http))
}

#[tokio::test]
async fn test_fetch_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::with_defaults().unwrap();
    let result = fetcher.fetch(&format!("{}/jobs", server.uri())).await;

    assert_eq!(
        result,
        FetchResult::Content {
            body: "<html>ok</html>".to_string()
        }
    );
}

#[tokio::test]
async fn test_non_success_status_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::with_defaults().unwrap();
    let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;

    assert_eq!(result, FetchResult::Failed(FetchFailure::Status(404)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = HttpConfig {
        total_timeout_secs: 1,
        ..Default::default()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();
    let result = fetcher.fetch(&format!("{}/slow", server.uri())).await;

    assert_eq!(result, FetchResult::Failed(FetchFailure::Timeout));
}

#[tokio::test]
async fn test_scrape_against_live_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("p", "1"))
        .and(query_param("q", "rust developer"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[
            ("Rust Engineer", "Acme"),
            ("Backend Developer", "Globex"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[
            ("Rust Engineer", "Acme"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(vec![
        site("board", &server, "/jobs"),
        site("broken", &server, "/broken"),
    ]);
    let request = ScrapeRequest::new("rust developer", "Cape Town", 10);
    let report = orchestrator.run(&request, CancellationToken::new()).await.unwrap();

    let titles: Vec<_> = report.jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Backend Developer", "Rust Engineer"]);
    assert_eq!(report.jobs[1].link, format!("{}/job/0", server.uri()));
    assert_eq!(report.jobs[1].source, "board");

    let board = report.sources.iter().find(|s| s.site_id == "board").unwrap();
    assert_eq!(board.state, SourceState::Exhausted);
    assert_eq!(board.pages_fetched, 2);

    let broken = report.sources.iter().find(|s| s.site_id == "broken").unwrap();
    assert_eq!(broken.state, SourceState::Failed);
    assert_eq!(broken.failure.as_deref(), Some("HTTP status 500"));
}

#[tokio::test]
async fn test_every_site_failing_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(vec![site("a", &server, "/a"), site("b", &server, "/b")]);
    let request = ScrapeRequest::new("rust", "Durban", 5);
    let err = orchestrator
        .run(&request, CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        JobScoutError::NoResults(report) => {
            assert_eq!(report.sources.len(), 2);
            assert_eq!(report.failed_sources().count(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}
