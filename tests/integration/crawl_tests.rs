//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the
//! crawl engine end-to-end through `advance` and `run`.

use polite_crawler::config::{load_config, Config};
use polite_crawler::{CrawlError, CrawlState, Crawler, Page, ScopedLinks};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(domain: &str) -> Config {
    let mut config = Config::for_domain("test", domain);
    config.crawl.delay_seconds = 0.01; // Very short for testing
    config.crawl.timeout_seconds = 5;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Drains the crawler, returning fetched URL paths in order
async fn crawl_paths(crawler: &mut Crawler) -> Vec<String> {
    let mut paths = Vec::new();
    while let Some(page) = crawler.advance().await {
        paths.push(page.url().path().to_string());
    }
    paths
}

#[tokio::test]
async fn test_spec_catalogue_scenario() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /admin\n").await;
    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/catalogue/a.html">A</a>
               <a href="{}/catalogue/a.html">A again</a>
               <a href="/admin/x">Admin</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/catalogue/a.html", "<p>no links</p>", 1).await;
    mount_page(&mock_server, "/admin/x", "secret", 0).await;

    let mut crawler = Crawler::new(&create_test_config(&base_url))
        .await
        .expect("Failed to create crawler");
    assert_eq!(crawler.state(), CrawlState::Seeded);
    assert!(!crawler.robots().is_allowed("/admin/x"));

    let first = crawler.advance().await.expect("seed page");
    assert_eq!(first.url().as_str(), format!("{}/", base_url));
    assert_eq!(crawler.frontier_len(), 1);
    assert_eq!(crawler.state(), CrawlState::Running);

    let second = crawler.advance().await.expect("catalogue page");
    assert_eq!(second.url().path(), "/catalogue/a.html");
    assert_eq!(crawler.frontier_len(), 0);

    assert!(crawler.advance().await.is_none());
    assert_eq!(crawler.state(), CrawlState::Exhausted);
    assert_eq!(crawler.pages_fetched(), 2);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\nDisallow:\n").await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/a", r#"<a href="/c">C</a>"#, 1).await;
    mount_page(&mock_server, "/b", r#"<a href="/">home</a>"#, 1).await;
    mount_page(&mock_server, "/c", r#"<a href="/a">A</a>"#, 1).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    let paths = crawl_paths(&mut crawler).await;
    assert_eq!(paths, vec!["/", "/a", "/b", "/c"]);
    assert_eq!(crawler.visited_len(), 4);
}

#[tokio::test]
async fn test_each_url_fetched_at_most_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/dup">1</a><a href="/dup">2</a><a href="{}/dup">3</a>
               <a href="/dup#section">4</a><a href=" /dup ">5</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/dup", r#"<a href="/">back</a><a href="/dup">self</a>"#, 1).await;

    let mut crawler = Crawler::new(&create_test_config(&base_url))
        .await
        .expect("Failed to create crawler");

    let paths = crawl_paths(&mut crawler).await;
    assert_eq!(paths, vec!["/", "/dup"]);
    assert!(crawler.has_visited(&format!("{}/dup", base_url)));
}

#[tokio::test]
async fn test_relative_and_bare_links_normalize_to_same_url() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/foo.html">abs</a><a href="foo.html">bare</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/foo.html", "foo", 1).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    assert_eq!(crawl_paths(&mut crawler).await, vec!["/", "/foo.html"]);
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        "# rules\nUser-agent: *\nDisallow: /private\nAllow: /private/open\n",
    )
    .await;
    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/public">ok</a>
               <a href="/private/page">no</a>
               <a href="/private/open">allow is inert</a>
               <a href="{}/private/abs">absolute</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/public",
        r#"<a href="/private/page">again</a><a href="private/bare">bare</a><a href="/more">more</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/more",
        r#"<a href="/private/page">third time</a><a href="/public">back</a>"#,
        1,
    )
    .await;

    // Should never be called
    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex("^/private"))
        .respond_with(html("private"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(&create_test_config(&base_url))
        .await
        .expect("Failed to create crawler");

    assert_eq!(crawl_paths(&mut crawler).await, vec!["/", "/public", "/more"]);
    assert_eq!(crawler.robots().len(), 1);
    assert!(!crawler.has_visited(&format!("{}/private/page", base_url)));
    assert_eq!(crawler.visited_len(), 3);
}

#[tokio::test]
async fn test_robots_missing_allows_everything() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", r#"<a href="/admin">admin</a>"#, 1).await;
    mount_page(&mock_server, "/admin", "admin", 1).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    assert!(crawler.robots().is_empty());
    assert_eq!(crawl_paths(&mut crawler).await, vec!["/", "/admin"]);
}

#[tokio::test]
async fn test_robots_for_other_agent_only_is_ignored() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: OtherBot\nDisallow: /\n").await;
    mount_page(&mock_server, "/", r#"<a href="/page">p</a>"#, 1).await;
    mount_page(&mock_server, "/page", "page", 1).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    assert!(crawler.robots().is_empty());
    assert_eq!(crawl_paths(&mut crawler).await, vec!["/", "/page"]);
}

#[tokio::test]
async fn test_exhausted_is_idempotent() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "<p>leaf</p>", 1).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    assert!(crawler.advance().await.is_some());
    for _ in 0..3 {
        assert!(crawler.advance().await.is_none());
        assert_eq!(crawler.state(), CrawlState::Exhausted);
    }
    assert_eq!(crawler.pages_fetched(), 1);
}

#[tokio::test]
async fn test_failed_fetches_are_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">gone</a><a href="/empty">empty</a><a href="/broken">500</a><a href="/ok">ok</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "fine", 1).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    assert_eq!(crawl_paths(&mut crawler).await, vec!["/", "/ok"]);
    assert_eq!(crawler.pages_fetched(), 2);
    assert_eq!(crawler.state(), CrawlState::Exhausted);
}

#[tokio::test]
async fn test_non_http_and_external_links_are_discarded() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r##"<a href="mailto:someone@example.com">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="#top">top</a>
            <a href="">empty</a>
            <a href="https://elsewhere.invalid/page">external</a>
            <a href="/inside">inside</a>"##,
        1,
    )
    .await;
    mount_page(&mock_server, "/inside", "inside", 1).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    assert_eq!(crawl_paths(&mut crawler).await, vec!["/", "/inside"]);
    assert_eq!(crawler.visited_len(), 2);
}

#[tokio::test]
async fn test_cancel_before_advance_suspends() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "never", 0).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    crawler.cancellation_token().cancel();
    assert!(crawler.advance().await.is_none());
    assert_eq!(crawler.state(), CrawlState::Suspended);
    assert!(crawler.advance().await.is_none());
    assert_eq!(crawler.state(), CrawlState::Suspended);
    assert_eq!(crawler.frontier_len(), 1);
}

#[tokio::test]
async fn test_cancel_interrupts_in_flight_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("slow").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    let token = crawler.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let started = std::time::Instant::now();
    assert!(crawler.advance().await.is_none());
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(crawler.state(), CrawlState::Suspended);
    assert_eq!(crawler.pages_fetched(), 0);
}

#[tokio::test]
async fn test_run_respects_page_limit() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/a", "a", 1).await;
    mount_page(&mock_server, "/b", "b", 0).await;
    mount_page(&mock_server, "/c", "c", 0).await;

    let mut crawler = Crawler::new(&create_test_config(&mock_server.uri()))
        .await
        .expect("Failed to create crawler");

    let mut seen = Vec::new();
    let mut collect = |page: Page| seen.push(page.url().path().to_string());
    let delivered = crawler.run(&mut collect, Some(2)).await;

    assert_eq!(delivered, 2);
    assert_eq!(seen, vec!["/", "/a"]);
    assert_eq!(crawler.state(), CrawlState::Running);
    assert_eq!(crawler.frontier_len(), 2);
}

#[tokio::test]
async fn test_scoped_collector_limits_links() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<nav><a href="/about">About</a></nav>
           <article class="product_pod"><h3><a href="/book-1">Book</a></h3></article>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/book-1", "book", 1).await;
    mount_page(&mock_server, "/about", "about", 0).await;

    let collector = ScopedLinks::new("article.product_pod").expect("valid selector");
    let mut crawler =
        Crawler::with_collector(&create_test_config(&mock_server.uri()), collector)
            .await
            .expect("Failed to create crawler");

    assert_eq!(crawl_paths(&mut crawler).await, vec!["/", "/book-1"]);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/logo.png">logo</a><a href="/list?page=2">next</a><a href="/item">item</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/item", "<title>Item</title>", 1).await;
    mount_page(&mock_server, "/logo.png", "png", 0).await;
    mount_page(&mock_server, "/list", "list", 0).await;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
[crawl]
name = "file-test"
domain = "{}/"
delay-seconds = 0.01

[collector]
skip-images = true
skip-query-links = true
"#,
        mock_server.uri()
    )
    .expect("write config");

    let config = load_config(file.path()).expect("Failed to load config");
    let mut crawler = Crawler::new(&config).await.expect("Failed to create crawler");
    assert_eq!(crawler.main_domain(), mock_server.uri());

    let mut titles = Vec::new();
    let mut collect = |page: Page| titles.push(page.title());
    crawler.run(&mut collect, None).await;

    assert_eq!(titles, vec![None, Some("Item".to_string())]);
    assert_eq!(crawler.state(), CrawlState::Exhausted);
}

#[tokio::test]
async fn test_invalid_domain_rejected() {
    let config = create_test_config("not a url");
    assert!(matches!(
        Crawler::new(&config).await,
        Err(CrawlError::Config(_))
    ));

    let config = create_test_config("ftp://example.com");
    assert!(Crawler::new(&config).await.is_err());
}

#[tokio::test]
async fn test_bad_selector_rejected() {
    let mut config = create_test_config("http://127.0.0.1:1");
    config.collector.selector = Some("[[".to_string());
    assert!(matches!(
        Crawler::new(&config).await,
        Err(CrawlError::Selector { .. })
    ));
}
