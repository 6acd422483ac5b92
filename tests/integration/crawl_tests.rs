//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl-then-rank cycle end-to-end.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use sumi_rank::config::Config;
use sumi_rank::crawler::{crawl_site, StopReason};
use sumi_rank::{rank_site, Interrupts, PageRankSolver, RankError, TransitionMatrix};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with politeness delays turned off
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = 50;
    config.crawler.max_depth = 5;
    config.crawler.max_concurrent_requests = 2;
    config.crawler.request_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts a small site:
///
/// ```text
/// /         -> /a /b /doc.pdf /private /old elsewhere.example
/// /a        -> / /b
/// /b        -> /a
/// /old      -> 301 to /c
/// /c        -> /
/// /doc.pdf  (not HTML)
/// /private  (disallowed by robots.txt)
/// ```
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
    )
    .await;

    mount_page(
        server,
        "/",
        html(
            r#"<a href="/a">A</a>
               <a href="b">B</a>
               <a href="/doc.pdf">PDF</a>
               <a href="/private">Private</a>
               <a href="/old">Old</a>
               <a href="https://elsewhere.example/">Elsewhere</a>"#,
        ),
    )
    .await;
    mount_page(server, "/a", html(r#"<a href="/">Home</a> <a href="/b#top">B</a>"#)).await;
    mount_page(server, "/b", html(r#"<a href="/a">A</a>"#)).await;
    mount_page(server, "/c", html(r#"<a href="/">Home</a>"#)).await;
    mount_page(
        server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/c"),
    )
    .await;
    mount_page(
        server,
        "/doc.pdf",
        ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
    )
    .await;
    mount_page(server, "/private", html(r#"<a href="/secret">Secret</a>"#)).await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let cancel = Arc::new(AtomicBool::new(false));
    let (index, stats) = crawl_site(&base_url, &create_test_config(), cancel)
        .await
        .expect("Crawl should succeed");

    let page = |p: &str| format!("{}{}", base_url, p);

    let mut urls = index.all_urls().to_vec();
    urls.sort();
    assert_eq!(urls, vec![page("/"), page("/a"), page("/b"), page("/c")]);

    // Non-HTML, disallowed and off-site pages are never indexed
    assert!(!index.contains(&page("/doc.pdf")));
    assert!(!index.contains(&page("/private")));
    assert!(!index.contains(&page("/secret")));
    assert!(!index.contains("https://elsewhere.example/"));

    // Links are stored canonically, including links to unindexed pages
    assert!(index.has_outlink(&page("/"), &page("/b")));
    assert!(index.has_outlink(&page("/"), "https://elsewhere.example/"));
    assert!(index.has_outlink(&page("/a"), &page("/b")));
    assert_eq!(index.out_degree(&page("/a")), 2);

    assert_eq!(stats.pages_indexed, 4);
    assert_eq!(stats.skipped_non_html, 1);
    assert_eq!(stats.redirects, 1);
    assert_eq!(stats.robots_disallowed, 1);
    assert_eq!(stats.http_errors, 0);
    assert_eq!(stats.network_errors, 0);
    // /, /a, /b, /c, /doc.pdf and /old
    assert_eq!(stats.requests, 6);
    assert_eq!(stats.stop_reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_crawl_then_rank() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let cancel = Arc::new(AtomicBool::new(false));
    let (mut index, _) = crawl_site(&base_url, &create_test_config(), cancel)
        .await
        .expect("Crawl should succeed");

    index.sort_urls();
    let matrix = TransitionMatrix::from_index(&index).unwrap();
    assert_eq!(matrix.dimension(), 4);
    assert!(matrix.is_row_stochastic(1e-12));

    let result = PageRankSolver::default().solve(&matrix).unwrap();
    assert!(result.error < 0.000001);

    let total: f64 = result.scores.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(result.scores.iter().all(|&p| p > 0.0));
}

#[tokio::test]
async fn test_page_budget_limits_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let mut config = create_test_config();
    config.crawler.max_pages = 2;

    let cancel = Arc::new(AtomicBool::new(false));
    let (index, stats) = crawl_site(&base_url, &config, cancel).await.unwrap();

    assert_eq!(stats.requests, 2);
    assert_eq!(stats.stop_reason, StopReason::PageBudget);
    assert!(index.len() <= 2);
    assert!(index.contains(&format!("{}/", base_url)));
}

#[tokio::test]
async fn test_max_depth_zero_indexes_only_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let mut config = create_test_config();
    config.crawler.max_depth = 0;

    let cancel = Arc::new(AtomicBool::new(false));
    let (index, stats) = crawl_site(&base_url, &config, cancel).await.unwrap();

    assert_eq!(index.all_urls(), [format!("{}/", base_url)]);
    assert_eq!(stats.requests, 1);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html(r#"<a href="/private">Private</a>"#)).await;
    mount_page(&mock_server, "/private", html("")).await;

    let cancel = Arc::new(AtomicBool::new(false));
    let (index, stats) = crawl_site(&base_url, &create_test_config(), cancel)
        .await
        .unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(stats.robots_disallowed, 0);
}

#[tokio::test]
async fn test_http_errors_are_counted_not_indexed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="/missing">Gone</a> <a href="/broken">Broken</a>"#),
    )
    .await;
    mount_page(&mock_server, "/broken", ResponseTemplate::new(500)).await;

    let cancel = Arc::new(AtomicBool::new(false));
    let (index, stats) = crawl_site(&base_url, &create_test_config(), cancel)
        .await
        .unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(stats.http_errors, 2);
}

#[tokio::test]
async fn test_non_html_seed_leaves_nothing_to_rank() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
    )
    .await;

    let cancel = Arc::new(AtomicBool::new(false));
    let (index, stats) = crawl_site(&base_url, &create_test_config(), cancel)
        .await
        .unwrap();

    assert!(index.is_empty());
    assert_eq!(stats.skipped_non_html, 1);
    assert!(matches!(
        TransitionMatrix::from_index(&index),
        Err(RankError::EmptyGraph)
    ));
}

#[tokio::test]
async fn test_cancelled_crawl_indexes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let cancel = Arc::new(AtomicBool::new(true));
    let (index, stats) = crawl_site(&base_url, &create_test_config(), cancel)
        .await
        .unwrap();

    assert!(index.is_empty());
    assert_eq!(stats.requests, 0);
    assert_eq!(stats.stop_reason, StopReason::Cancelled);
}

#[tokio::test]
async fn test_interrupted_crawl_still_ranks_fetched_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(
            r#"<a href="/p1">1</a> <a href="/p2">2</a> <a href="/p3">3</a>
               <a href="/p4">4</a> <a href="/p5">5</a>"#,
        ),
    )
    .await;
    for route in ["/p1", "/p2", "/p3", "/p4", "/p5"] {
        mount_page(
            &mock_server,
            route,
            html(r#"<a href="/">Home</a>"#).set_delay(Duration::from_millis(400)),
        )
        .await;
    }

    let mut config = create_test_config();
    config.crawler.max_concurrent_requests = 1;

    let interrupts = Interrupts::new();
    let handle = interrupts.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.interrupt();
    });

    let report = rank_site(&base_url, &config, &interrupts)
        .await
        .expect("Pages fetched before the interrupt should be ranked");

    assert_eq!(report.crawl.stop_reason, StopReason::Cancelled);
    assert!(report.crawl.pages_indexed >= 1);
    assert!(report.crawl.pages_indexed < 6);
    assert_eq!(report.pages.len(), report.crawl.pages_indexed);
    assert!(report.iterations >= 1);
    assert!((report.total_rank() - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_rank_site_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let report = rank_site(&base_url, &create_test_config(), &Interrupts::new())
        .await
        .unwrap();

    assert_eq!(report.seed, format!("{}/", base_url));
    assert_eq!(report.pages.len(), 4);
    assert!(report.pages.windows(2).all(|w| w[0].page_rank >= w[1].page_rank));
    assert!((report.total_rank() - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let cancel = Arc::new(AtomicBool::new(false));
    let result = crawl_site("ftp://example.com/", &create_test_config(), cancel).await;
    assert!(matches!(result, Err(RankError::UrlError(_))));
}
