//! Integration tests for the scraper
//!
//! These tests use wiremock to serve listing pages and run the full
//! fetch/extract/paginate cycle end-to-end.

use blog_scrape::config::{parse_config, OutputConfig, OutputFormat, OutputGrouping};
use blog_scrape::output::write_report;
use blog_scrape::scrape::{ScrapeReport, Scraper, Seed, SessionError};
use blog_scrape::{FetchError, ParseError, StopReason};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a configuration with one site covering the mock server's host
fn create_test_config(max_pages: u32) -> blog_scrape::Config {
    config_with(&format!("max-pages = {}", max_pages))
}

/// Like [`create_test_config`], with extra `[scraper]` keys
fn config_with(scraper_keys: &str) -> blog_scrape::Config {
    let toml = format!(
        r#"
[scraper]
delay-ms = 0
timeout-secs = 5
{scraper_keys}

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"

[[site]]
name = "mag"
domain = "127.0.0.1"

[site.selectors]
container = "article"
title = "h2"
date = [{{ css = "time", attr = "datetime" }}, "span.date"]
author = ".author"
content = ".body"
next-page = "a[rel='next']"
"#
    );
    parse_config(&toml).expect("test config is valid")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Mag</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

fn article(title: &str, content: &str) -> String {
    format!(
        r#"<article><h2>{}</h2><time datetime="2024-03-01">March 1</time>
        <span class="author">Ada</span><div class="body"><p>{}</p></div></article>"#,
        title, content
    )
}

async fn run_seed(max_pages: u32, seed: &str) -> ScrapeReport {
    run_seed_with(&format!("max-pages = {}", max_pages), seed).await
}

async fn run_seed_with(scraper_keys: &str, seed: &str) -> ScrapeReport {
    let scraper = Scraper::new(&config_with(scraper_keys)).unwrap();
    let seeds = vec![Seed::new(Url::parse(seed).unwrap())];
    scraper.run(&seeds).await
}

fn redirect(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(301).insert_header("location", location)
}

#[tokio::test]
async fn test_two_page_magazine() {
    let mock_server = MockServer::start().await;

    // Page 2 is mounted first so the query matcher wins over the bare path
    Mock::given(method("GET"))
        .and(path("/mag"))
        .and(query_param("page", "2"))
        .respond_with(html(&format!(
            "{}{}",
            article("Four", "Fourth post"),
            article("Five", "Fifth post")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}{}{}<a rel="next" href="/mag?page=2">Older</a>"#,
            article("One", "First post"),
            article("Two", "Second post"),
            article("Three", "Third post")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/mag", mock_server.uri());
    let report = run_seed(10, &seed).await;

    assert_eq!(report.sessions.len(), 1);
    let session = &report.sessions[0];
    assert_eq!(session.site.as_deref(), Some("mag"));
    assert_eq!(session.pages_fetched, 2);
    assert_eq!(session.stop_reason, Some(StopReason::Exhausted));
    assert!(session.errors.is_empty());

    let titles: Vec<&str> = session.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two", "Three", "Four", "Five"]);

    let first = &session.records[0];
    assert_eq!(first.date.as_deref(), Some("2024-03-01"));
    assert_eq!(first.author.as_deref(), Some("Ada"));
    assert_eq!(first.content, "First post");
    assert_eq!(first.source_url, seed);

    assert_eq!(
        session.records[4].source_url,
        format!("{}/mag?page=2", mock_server.uri())
    );
}

#[tokio::test]
async fn test_self_referencing_next_link_fetches_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(html(&format!(
            r#"{}<a rel="next" href="/loop#older">Older</a>"#,
            article("Only", "Only post")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed(10, &format!("{}/loop", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 1);
    assert_eq!(session.records.len(), 1);
    assert_eq!(session.stop_reason, Some(StopReason::CycleDetected));
}

#[tokio::test]
async fn test_max_pages_bounds_fetches() {
    let mock_server = MockServer::start().await;

    for n in 1..=5 {
        Mock::given(method("GET"))
            .and(path(format!("/p/{}", n)))
            .respond_with(html(&format!(
                r#"{}<a rel="next" href="/p/{}">Next</a>"#,
                article(&format!("Post {}", n), "Body"),
                n + 1
            )))
            .mount(&mock_server)
            .await;
    }

    let report = run_seed(2, &format!("{}/p/1", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 2);
    assert_eq!(session.records.len(), 2);
    assert_eq!(session.stop_reason, Some(StopReason::PageLimit));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_fetch_failure_keeps_earlier_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}{}<a rel="next" href="/broken">Older</a>"#,
            article("One", "First post"),
            article("Two", "Second post")
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed(10, &format!("{}/mag", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.records.len(), 2);
    assert_eq!(session.pages_fetched, 1);
    assert_eq!(session.stop_reason, Some(StopReason::FetchFailed));
    assert_eq!(session.errors.len(), 1);
    assert!(matches!(
        &session.errors[0],
        SessionError::Fetch(FetchError::HttpStatus { code: 500, .. })
    ));
    assert_eq!(report.failed_seeds(), 1);
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"posts":[]}"#, "application/json"))
        .mount(&mock_server)
        .await;

    let report = run_seed(10, &format!("{}/feed", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert!(session.records.is_empty());
    assert_eq!(session.pages_fetched, 0);
    assert_eq!(session.stop_reason, Some(StopReason::FetchFailed));
    assert!(matches!(
        &session.errors[0],
        SessionError::Fetch(FetchError::UnsupportedContentType { .. })
    ));
}

#[tokio::test]
async fn test_off_site_next_link_stops() {
    let mock_server = MockServer::start().await;
    let port = Url::parse(&mock_server.uri()).unwrap().port().unwrap();

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}<a rel="next" href="http://localhost:{}/mag?page=2">Older</a>"#,
            article("One", "First post"),
            port
        )))
        .mount(&mock_server)
        .await;

    let report = run_seed(10, &format!("{}/mag", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 1);
    assert_eq!(session.stop_reason, Some(StopReason::OffSite));
    assert!(session.errors.is_empty());
}

#[tokio::test]
async fn test_unmatched_seed_does_not_stop_others() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&article("One", "First post")))
        .mount(&mock_server)
        .await;

    let scraper = Scraper::new(&create_test_config(5)).unwrap();
    let seeds = vec![
        Seed::new(Url::parse("https://unknown.example/blog").unwrap()),
        Seed::new(Url::parse(&format!("{}/mag", mock_server.uri())).unwrap()),
    ];

    let report = scraper.run(&seeds).await;

    assert_eq!(report.sessions.len(), 2);
    assert_eq!(report.sessions[0].stop_reason, Some(StopReason::ConfigError));
    assert!(matches!(
        &report.sessions[0].errors[0],
        SessionError::Config(blog_scrape::ConfigError::NoMatchingSite { .. })
    ));
    assert_eq!(report.sessions[1].records.len(), 1);
    assert_eq!(report.total_records(), 1);
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(html(&article("One", "First post")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed(5, &format!("{}/mag", mock_server.uri())).await;

    assert_eq!(report.sessions[0].records.len(), 1);
}

#[tokio::test]
async fn test_scrape_and_write_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            "{}{}",
            article("One", "First post"),
            r#"<article><h2>No body here</h2></article>"#
        )))
        .mount(&mock_server)
        .await;

    let report = run_seed(5, &format!("{}/mag", mock_server.uri())).await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("posts.json");
    let config = OutputConfig {
        format: OutputFormat::Json,
        path: Some(out.to_string_lossy().into_owned()),
        grouping: OutputGrouping::Combined,
        summary_path: None,
    };

    write_report(&report, &config).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "One");
    assert_eq!(items[0]["content"], "First post");
}

#[tokio::test]
async fn test_pagination_follows_redirected_host() {
    let mock_server = MockServer::start().await;
    let port = Url::parse(&mock_server.uri()).unwrap().port().unwrap();
    let landing = format!("http://localhost:{}", port);

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(redirect(&format!("{}/mag", landing)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .and(query_param("page", "2"))
        .respond_with(html(&article("Two", "Second post")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}<a rel="next" href="/mag?page=2">Older</a>"#,
            article("One", "First post")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The seed is on 127.0.0.1; every page after the redirect is on localhost
    let report = run_seed(10, &format!("{}/old", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 2);
    assert_eq!(session.stop_reason, Some(StopReason::Exhausted));
    assert!(session.errors.is_empty());

    let sources: Vec<&str> = session.records.iter().map(|r| r.source_url.as_str()).collect();
    assert_eq!(
        sources,
        vec![format!("{}/mag", landing), format!("{}/mag?page=2", landing)]
    );
}

#[tokio::test]
async fn test_redirect_target_counts_as_visited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(redirect(&format!("{}/mag", mock_server.uri())))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}<a rel="next" href="/mag">Again</a>"#,
            article("One", "First post")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed(10, &format!("{}/old", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 1);
    assert_eq!(session.stop_reason, Some(StopReason::CycleDetected));
    assert_eq!(session.records.len(), 1);
    assert_eq!(
        session.records[0].source_url,
        format!("{}/mag", mock_server.uri())
    );
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mock_server = MockServer::start().await;

    // One 503, then the page
    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&article("One", "First post")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed_with(
        "max-retries = 1\nretry-delay-ms = 0",
        &format!("{}/mag", mock_server.uri()),
    )
    .await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 1);
    assert_eq!(session.records.len(), 1);
    assert_eq!(session.stop_reason, Some(StopReason::Exhausted));
    assert!(session.errors.is_empty());
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed_with(
        "max-retries = 2\nretry-delay-ms = 0",
        &format!("{}/gone", mock_server.uri()),
    )
    .await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 0);
    assert_eq!(session.stop_reason, Some(StopReason::FetchFailed));
    assert!(matches!(
        &session.errors[0],
        SessionError::Fetch(FetchError::HttpStatus { code: 404, .. })
    ));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_empty_page_is_recorded_and_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}{}<a rel="next" href="/blank">Older</a>"#,
            article("One", "First post"),
            article("Two", "Second post")
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("   \n  ", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed(10, &format!("{}/mag", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.records.len(), 2);
    assert_eq!(session.pages_fetched, 2);
    assert_eq!(session.stop_reason, Some(StopReason::Exhausted));
    assert_eq!(session.errors.len(), 1);
    assert!(matches!(
        &session.errors[0],
        SessionError::Parse(ParseError::EmptyDocument { .. })
    ));
}

#[tokio::test]
async fn test_post_limit_spans_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .and(query_param("page", "2"))
        .respond_with(html(&format!(
            r#"{}{}{}<a rel="next" href="/mag?page=3">Older</a>"#,
            article("Four", "Body"),
            article("Five", "Body"),
            article("Six", "Body")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}{}{}<a rel="next" href="/mag?page=2">Older</a>"#,
            article("One", "Body"),
            article("Two", "Body"),
            article("Three", "Body")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed_with(
        "max-pages = 10\nmax-posts = 4",
        &format!("{}/mag", mock_server.uri()),
    )
    .await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 2);
    assert_eq!(session.stop_reason, Some(StopReason::PostLimit));
    let titles: Vec<&str> = session.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two", "Three", "Four"]);
    assert_eq!(report.failed_seeds(), 0);
}

#[tokio::test]
async fn test_post_limit_within_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mag"))
        .respond_with(html(&format!(
            r#"{}{}{}<a rel="next" href="/mag/2">Older</a>"#,
            article("One", "Body"),
            article("Two", "Body"),
            article("Three", "Body")
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_seed_with("max-posts = 2", &format!("{}/mag", mock_server.uri())).await;

    let session = &report.sessions[0];
    assert_eq!(session.pages_fetched, 1);
    assert_eq!(session.records.len(), 2);
    assert_eq!(session.stop_reason, Some(StopReason::PostLimit));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}
