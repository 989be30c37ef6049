//! End-to-end pipeline tests
//!
//! Multi-domain scenarios run over `MemoryTransport`, since every wiremock
//! server shares the 127.0.0.1 domain key.

use pulse_extractor::config::Config;
use pulse_extractor::crawler::{CrawlLimits, HttpResponse, HttpTransport, MemoryTransport};
use pulse_extractor::output::{render, OutputFormat};
use pulse_extractor::Pipeline;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.delay_seconds = 0.0;
    config.cache.enabled = false;
    config
}

fn docs_page(title: &str, links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><body><main>{}<h1>{}</h1><p>About {}.</p></main></body></html>",
        anchors, title, title
    )
}

#[tokio::test]
async fn test_pipeline_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/help"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body>
                    <nav class="navbar"><a href="/help/setup.md">Setup</a></nav>
                    <main>
                        <h1>Billing</h1><p>Invoices are sent monthly. Pay by card or transfer</p>
                        <h3>Refunds</h3><p>Refunds take five business days.</p>
                    </main>
                    </body></html>"#,
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/help/setup.md"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "# Billing\n\nShort.\n\n### Invoices\n\nDownload them as PDF.\n",
            "text/markdown",
        ))
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let transport = HttpTransport::new(&config.user_agent).expect("Failed to build HTTP client");
    let pipeline = Pipeline::with_transport(Arc::new(transport), &config);
    let output = pipeline.run(&[format!("{}/help", base_url)]).await;

    assert_eq!(output.pages.len(), 2);
    assert_eq!(output.records.len(), 1);

    let billing = &output.records[0];
    assert_eq!(billing.module, "Billing");
    assert_eq!(
        billing.description,
        "Invoices are sent monthly. Pay by card or transfer."
    );
    let subs: Vec<&str> = billing.submodules.keys().map(String::as_str).collect();
    assert_eq!(subs, vec!["Refunds", "Invoices"]);
    // Both Billing bodies summarize to under 80 characters
    assert_eq!(billing.confidence, 0.4);

    let json = render(&output.records, OutputFormat::Json).unwrap();
    assert!(json.contains("\"Description\""));
}

#[tokio::test]
async fn test_fair_share_across_domains() {
    let alpha_links: Vec<String> = (1..=5).map(|i| format!("/docs/a{}", i)).collect();
    let beta_links: Vec<String> = (1..=5).map(|i| format!("/docs/b{}", i)).collect();

    let mut transport = MemoryTransport::new()
        .with_html("https://docs.alpha.com/", docs_page("Alpha", &alpha_links))
        .with_html("https://help.beta.io/", docs_page("Beta", &beta_links));
    for i in 1..=5 {
        transport = transport
            .with_html(
                &format!("https://docs.alpha.com/docs/a{}", i),
                docs_page(&format!("Alpha {}", i), &[]),
            )
            .with_html(
                &format!("https://help.beta.io/docs/b{}", i),
                docs_page(&format!("Beta {}", i), &[]),
            );
    }

    let config = create_test_config();
    let pipeline = Pipeline::with_transport(Arc::new(transport), &config)
        .map_crawler(|crawler| crawler.with_limits(CrawlLimits::new(4, 0)));
    let output = pipeline
        .run(&[
            "https://docs.alpha.com/".to_string(),
            "https://help.beta.io/".to_string(),
        ])
        .await;

    assert_eq!(output.stats.total_pages(), 4);
    assert_eq!(output.stats.pages_by_domain["docs.alpha.com"], 2);
    assert_eq!(output.stats.pages_by_domain["help.beta.io"], 2);

    let urls: Vec<&str> = output.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://docs.alpha.com/",
            "https://help.beta.io/",
            "https://docs.alpha.com/docs/a1",
            "https://help.beta.io/docs/b1",
        ]
    );

    let names: Vec<&str> = output.records.iter().map(|r| r.module.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Alpha 1", "Beta 1"]);
}

#[tokio::test]
async fn test_unreachable_seed_produces_empty_result() {
    let transport = MemoryTransport::new()
        .with_response("https://docs.example.com/", HttpResponse::status(500));

    let config = create_test_config();
    let pipeline = Pipeline::with_transport(Arc::new(transport), &config)
        .map_crawler(|crawler| {
            crawler.with_fetch_policy(pulse_extractor::crawler::FetchPolicy {
                timeout: std::time::Duration::from_secs(1),
                max_retries: 0,
                initial_backoff: std::time::Duration::from_millis(1),
                backoff_factor: 1.5,
            })
        });
    let output = pipeline.run(&["https://docs.example.com/".to_string()]).await;

    assert!(output.records.is_empty());
    assert_eq!(output.stats.skipped_transient, 1);
}
