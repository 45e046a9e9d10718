//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use seo_crawler::config::{load_config, Config};
use seo_crawler::crawler::{crawl, CrawlNode, Coordinator, PageRecord};
use seo_crawler::output::{write_report, CrawlStatistics};
use seo_crawler::{ConfigError, CrawlError};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given depth and a short timeout
fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.timeout_secs = 5;
    config
}

fn html_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1><p>Some text here.</p>{}</body></html>",
        title, title, anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
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

fn child_paths(node: &CrawlNode) -> Vec<String> {
    node.children
        .iter()
        .map(|child| {
            url::Url::parse(child.record.url())
                .map(|u| u.path().to_string())
                .unwrap_or_default()
        })
        .collect()
}

#[tokio::test]
async fn test_full_crawl_builds_tree() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    mount_page(&mock_server, "/", html_page("Home", &["/about", "/blog", "https://other.com/x"])).await;
    mount_page(&mock_server, "/about", html_page("About", &["/"])).await;
    mount_page(&mock_server, "/blog", html_page("Blog", &["/blog/post"])).await;
    mount_page(&mock_server, "/blog/post", html_page("Post", &["../about"])).await;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(create_test_config(3), &base).await.unwrap();

    let root = result.root.as_ref().expect("root should be analyzed");
    let report = root.record.report().expect("root should succeed");
    assert_eq!(report.depth, 0);
    assert_eq!(report.links.len(), 2, "external link must be filtered");
    assert_eq!(child_paths(root), vec!["/about", "/blog"]);

    let blog = &root.children[1];
    assert_eq!(blog.record.depth(), 1);
    assert_eq!(child_paths(blog), vec!["/blog/post"]);
    assert_eq!(blog.children[0].record.depth(), 2);

    // Every node sits one level below its parent
    for node in result.pages() {
        for child in &node.children {
            assert_eq!(child.record.depth(), node.record.depth() + 1);
        }
    }

    assert_eq!(result.visited.len(), 4);
    assert_eq!(result.pages().len(), 4);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Root", &["/level1"])).await;
    mount_page(&mock_server, "/level1", html_page("L1", &["/level2"])).await;
    mount_page(&mock_server, "/level2", html_page("L2", &["/level3"])).await;
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page("L3", &[]), "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(create_test_config(2), &base).await.unwrap();

    let pages = result.pages();
    assert_eq!(pages.len(), 3, "Expected exactly 3 analyzed pages");
    assert!(pages.iter().all(|node| node.record.depth() <= 2));

    let deepest = pages
        .iter()
        .find(|node| node.record.depth() == 2)
        .expect("depth 2 page");
    assert!(deepest.children.is_empty());
    assert_eq!(deepest.record.report().unwrap().links.len(), 1);
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /private/").await;

    mount_page(
        &mock_server,
        "/",
        html_page("Home", &["/private/page", "/public", "/private/other"]),
    )
    .await;
    mount_page(&mock_server, "/public", html_page("Public", &[])).await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page("Secret", &[]), "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(create_test_config(2), &base).await.unwrap();

    let root = result.root.as_ref().unwrap();
    assert_eq!(child_paths(root), vec!["/public"]);
    assert_eq!(root.record.report().unwrap().links.len(), 3);
    assert_eq!(result.robots_denied.len(), 2);
    assert!(result
        .pages()
        .iter()
        .all(|node| !node.record.url().contains("/private/")));
}

#[tokio::test]
async fn test_ignore_robots_fetches_disallowed_pages() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/", html_page("Home", &["/private/page"])).await;
    mount_page(&mock_server, "/private/page", html_page("Secret", &[])).await;

    let mut config = create_test_config(1);
    config.crawler.ignore_robots = true;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(config, &base).await.unwrap();

    let root = result.root.as_ref().unwrap();
    assert_eq!(child_paths(root), vec!["/private/page"]);
    assert!(result.robots_denied.is_empty());
}

#[tokio::test]
async fn test_disallowed_base_url_yields_empty_report() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /").await;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(create_test_config(2), &base).await.unwrap();

    assert!(result.root.is_none());
    assert!(result.visited.is_empty());
    assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
}

#[tokio::test]
async fn test_shared_links_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/a", "/b", "/a", "/shared"])).await;
    mount_page(&mock_server, "/a", html_page("A", &["/shared", "/"])).await;
    mount_page(&mock_server, "/b", html_page("B", &["/shared", "/a"])).await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page("Shared", &[]), "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(create_test_config(3), &base).await.unwrap();

    let mut urls: Vec<String> = result
        .pages()
        .iter()
        .map(|node| node.record.url().to_string())
        .collect();
    let total = urls.len();
    urls.sort();
    urls.dedup();

    assert_eq!(urls.len(), total, "no URL may appear twice in the tree");
    assert_eq!(urls, result.visited);
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_failed_page_recorded_without_children() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Home", &["/broken", "/ok", "/data"])).await;
    mount_page(&mock_server, "/ok", html_page("Ok", &[])).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(create_test_config(2), &base).await.unwrap();

    let root = result.root.as_ref().unwrap();
    assert_eq!(child_paths(root), vec!["/broken", "/ok", "/data"]);

    let broken = &root.children[0];
    assert!(matches!(broken.record, PageRecord::Failed { .. }));
    assert!(broken.record.error().unwrap().contains("500"));
    assert!(broken.children.is_empty());

    assert!(root.children[1].record.report().is_some());
    assert!(root.children[2].record.error().unwrap().contains("application/json"));

    let stats = CrawlStatistics::from_result(&result);
    assert_eq!(stats.pages_analyzed, 2);
    assert_eq!(stats.pages_failed, 2);
}

#[tokio::test]
async fn test_unreachable_base_url_is_not_fatal() {
    let result = crawl(create_test_config(1), "http://127.0.0.1:9/")
        .await
        .unwrap();
    let root = result.root.unwrap();
    assert!(root.record.error().is_some());
    assert!(root.children.is_empty());
}

#[tokio::test]
async fn test_invalid_base_url_is_fatal() {
    let err = crawl(create_test_config(1), "not-a-url").await.unwrap_err();
    assert!(matches!(err, CrawlError::Config(ConfigError::InvalidUrl(_))));

    let err = Coordinator::new(create_test_config(1), "mailto:me@ex.com").err();
    assert!(err.is_some());
}

#[tokio::test]
async fn test_report_written_with_stable_key_order() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_page("Home", &["/next"])).await;
    mount_page(&mock_server, "/next", html_page("Next", &[])).await;

    let base = format!("{}/", mock_server.uri());
    let result = crawl(create_test_config(1), &base).await.unwrap();

    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("seo_report.json");
    write_report(&result, &report_path).unwrap();

    let written = std::fs::read_to_string(&report_path).unwrap();
    // Top-level keys of a pretty-printed object are indented by two spaces
    let positions: Vec<usize> = [
        "url",
        "depth",
        "seo_metrics",
        "performance_metrics",
        "content_metrics",
        "links",
        "children",
    ]
    .iter()
    .map(|key| {
        written
            .find(&format!("\n  \"{}\":", key))
            .expect("key present")
    })
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["depth"], 0);
    assert_eq!(value["children"][0]["depth"], 1);
    assert_eq!(value["seo_metrics"]["headings"]["has_h1"], true);
    assert_eq!(
        value["performance_metrics"]["load_time"]["load_time_acceptable"],
        true
    );
}

#[tokio::test]
async fn test_config_file_drives_crawl() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_page("Home", &["/a"])).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page("A", &[]), "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[crawler]\nmax-depth = 0\nmax-concurrent = 2\ntimeout-secs = 5\n\n[user-agent]\nrobots-agent = \"seo-crawler\""
    )
    .unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.crawler.max_depth, 0);

    let base = format!("{}/", mock_server.uri());
    let result = crawl(config, &base).await.unwrap();
    assert_eq!(result.pages().len(), 1);
}
