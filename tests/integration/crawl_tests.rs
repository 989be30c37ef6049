//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use pulse_extractor::config::Config;
use pulse_extractor::crawler::{CrawlLimits, Crawler, FetchPolicy, HttpTransport};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no delay and no response cache
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.delay_seconds = 0.0;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.cache.enabled = false;
    config
}

fn create_crawler(config: &Config) -> Crawler {
    let transport = HttpTransport::new(&config.user_agent).expect("Failed to build HTTP client");
    Crawler::new(Arc::new(transport), config).with_fetch_policy(FetchPolicy {
        timeout: Duration::from_secs(5),
        max_retries: 2,
        initial_backoff: Duration::from_millis(10),
        backoff_factor: 1.5,
    })
}

fn html_page(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="/page1#intro">Page 1 intro</a>
            <a href="/page2#top">Page 2</a>
            <a href="{}/pricing">Absolute, not documentation-shaped</a>
            <a href="https://elsewhere.example.org/help">Off-site</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    for page in ["/page1", "/page2"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(format!(
                "<html><body><h1>{}</h1><p>Content</p><a href=\"/\">Home</a></body></html>",
                page
            )))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config();
    let report = create_crawler(&config)
        .crawl(&[format!("{}/", base_url)])
        .await;

    let urls: Vec<&str> = report.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );
    assert_eq!(report.stats.skipped_visited, 1);
    assert_eq!(report.stats.total_pages(), 3);
}

#[tokio::test]
async fn test_single_page_budget_follows_no_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body><a href="/next">Next</a></body></html>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("<html><body>never</body></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let report = create_crawler(&config)
        .with_limits(CrawlLimits::new(1, 1))
        .crawl(&[format!("{}/", base_url)])
        .await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].url, format!("{}/", base_url));
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body>
            <a href="/allowed">Allowed Page</a>
            <a href="/private/page">Private Page</a>
            </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/allowed"))
        .respond_with(html_page("<html><body>Allowed content</body></html>".to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html_page("<html><body>Secret</body></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let report = create_crawler(&config)
        .crawl(&[format!("{}/", base_url)])
        .await;

    assert_eq!(report.pages.len(), 2);
    assert!(report.pages.iter().all(|p| !p.url.contains("/private/")));
    assert_eq!(report.stats.skipped_robots, 1);
}

#[tokio::test]
async fn test_unsupported_content_type_is_not_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body><a href="/download">Download</a></body></html>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3], "application/octet-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let report = create_crawler(&config)
        .crawl(&[format!("{}/", base_url)])
        .await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.stats.skipped_content_type, 1);
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html_page(
            "<html><body><h2>Recovered</h2><p>ok</p></body></html>".to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let report = create_crawler(&config)
        .crawl(&[format!("{}/flaky", base_url)])
        .await;

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages[0].html.contains("Recovered"));
    assert_eq!(report.stats.skipped_transient, 0);
}

#[tokio::test]
async fn test_persistent_failure_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let report = create_crawler(&config)
        .crawl(&[format!("{}/down", base_url)])
        .await;

    assert!(report.pages.is_empty());
    assert_eq!(report.stats.skipped_transient, 1);
}
