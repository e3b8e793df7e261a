//! Integration tests for URL discovery
//!
//! These tests use wiremock to serve robots.txt, sitemaps and pages, and a
//! fake page fetcher where the link graph has to be exact.

use async_trait::async_trait;
use seo_survey::config::Config;
use seo_survey::crawler::{FetchedPage, PageFetcher, RetryPolicy};
use seo_survey::pipeline::{DiscoverySource, Pipeline};
use seo_survey::{FetchError, FetchResult, SurveyError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration for the mock site with a small worker pool
fn create_test_config(base_url: &str, max_depth: u32) -> Config {
    let mut config = Config::for_site(base_url);
    config.crawler.workers = 2;
    config.crawler.max_depth = max_depth;
    config.crawler.fetch_timeout_secs = 5;
    config
}

fn create_test_pipeline(config: Config) -> Pipeline {
    Pipeline::new(config)
        .unwrap()
        .with_retry(RetryPolicy::no_retry())
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

async fn mount_text(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Page fetcher over a fixed link graph that records every request
struct LinkGraph {
    links: HashMap<String, Vec<String>>,
    requested: Mutex<Vec<String>>,
}

impl LinkGraph {
    fn new(edges: &[(&str, &[&str])]) -> Self {
        Self {
            links: edges
                .iter()
                .map(|(from, to)| {
                    (
                        from.to_string(),
                        to.iter().map(|link| link.to_string()).collect(),
                    )
                })
                .collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for LinkGraph {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.links.get(url) {
            Some(anchors) => Ok(FetchedPage {
                url: url.to_string(),
                final_url: url.to_string(),
                status_code: 200,
                html: String::new(),
                anchors: anchors.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[tokio::test]
async fn test_sitemap_urlset_is_used_without_crawling() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![
        format!("{}/a", base),
        format!("{}/b", base),
        format!("{}/c", base),
    ];
    let mut locs = pages.clone();
    locs.push(format!("{}/logo.png", base));

    mount_text(&server, "/sitemap.xml", 200, &urlset(&locs)).await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let graph = Arc::new(LinkGraph::new(&[]));
    let pipeline = create_test_pipeline(create_test_config(&base, 2))
        .with_fetcher(Arc::clone(&graph) as Arc<dyn PageFetcher>);

    let discovery = pipeline.discover().await.unwrap();

    assert_eq!(discovery.source, DiscoverySource::Sitemap);
    assert_eq!(discovery.urls, pages);
    assert!(graph.requested().is_empty());
}

#[tokio::test]
async fn test_missing_sitemaps_fall_back_to_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_text(&server, "/sitemap.xml", 404, "").await;
    mount_text(&server, "/sitemap_index.xml", 404, "").await;
    mount_text(
        &server,
        "/",
        200,
        r#"<html><body><a href="/about">About</a></body></html>"#,
    )
    .await;
    mount_text(&server, "/about", 200, "<html><body>About us</body></html>").await;

    let pipeline = create_test_pipeline(create_test_config(&base, 2));
    let discovery = pipeline.discover().await.unwrap();

    assert_eq!(discovery.source, DiscoverySource::Crawl);
    let mut urls = discovery.urls;
    urls.sort();
    assert_eq!(urls, vec![base.clone(), format!("{}/about", base)]);
}

#[tokio::test]
async fn test_robots_disallow_filters_sitemap_urls() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_text(&server, "/robots.txt", 200, "User-agent: *\nDisallow: /private\n").await;
    mount_text(
        &server,
        "/sitemap.xml",
        200,
        &urlset(&[
            format!("{}/private/page", base),
            format!("{}/public/page", base),
        ]),
    )
    .await;

    let pipeline = create_test_pipeline(create_test_config(&base, 2));
    let discovery = pipeline.discover().await.unwrap();

    assert_eq!(discovery.urls, vec![format!("{}/public/page", base)]);
}

#[tokio::test]
async fn test_robots_wildcard_rules_filter_sitemap_urls() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_text(
        &server,
        "/robots.txt",
        200,
        "User-agent: *\nDisallow: /*/private\nDisallow: /*.php$\nDisallow: /search?q=\n",
    )
    .await;
    mount_text(
        &server,
        "/sitemap.xml",
        200,
        &urlset(&[
            format!("{}/en/private/x", base),
            format!("{}/index.php", base),
            format!("{}/search?q=compost", base),
            format!("{}/en/about", base),
        ]),
    )
    .await;

    let pipeline = create_test_pipeline(create_test_config(&base, 2));
    let discovery = pipeline.discover().await.unwrap();

    assert_eq!(discovery.urls, vec![format!("{}/en/about", base)]);
}

#[tokio::test]
async fn test_robots_disallow_filters_crawled_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_text(&server, "/robots.txt", 200, "User-agent: *\nDisallow: /private\n").await;
    mount_text(
        &server,
        "/",
        200,
        r#"<a href="/private/page">Hidden</a><a href="/public/page">Shown</a>"#,
    )
    .await;
    mount_text(&server, "/public/page", 200, "<p>public</p>").await;
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = create_test_pipeline(create_test_config(&base, 2));
    let discovery = pipeline.discover().await.unwrap();

    assert_eq!(discovery.source, DiscoverySource::Crawl);
    assert!(discovery.urls.contains(&format!("{}/public/page", base)));
    assert!(!discovery.urls.contains(&format!("{}/private/page", base)));
}

#[tokio::test]
async fn test_crawl_depth_limit() {
    let server = MockServer::start().await;
    let a = server.uri();
    let b = format!("{}/b", a);
    let c = format!("{}/c", a);

    let graph = Arc::new(LinkGraph::new(&[
        (a.as_str(), &[b.as_str()]),
        (b.as_str(), &[c.as_str()]),
        (c.as_str(), &[]),
    ]));
    let pipeline = create_test_pipeline(create_test_config(&a, 1))
        .with_fetcher(Arc::clone(&graph) as Arc<dyn PageFetcher>);

    let discovery = pipeline.discover().await.unwrap();

    let mut urls = discovery.urls;
    urls.sort();
    assert_eq!(urls, vec![a.clone(), b.clone()]);
    assert!(!graph.requested().contains(&c));
}

#[tokio::test]
async fn test_crawl_respects_page_budget() {
    let server = MockServer::start().await;
    let base = server.uri();
    let children: Vec<String> = (0..10).map(|i| format!("{}/p{}", base, i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();

    let mut edges: Vec<(&str, &[&str])> = vec![(base.as_str(), child_refs.as_slice())];
    for child in &child_refs {
        edges.push((*child, &[]));
    }
    let graph = Arc::new(LinkGraph::new(&edges));

    let mut config = create_test_config(&base, 3);
    config.crawler.max_pages = 4;
    let pipeline =
        create_test_pipeline(config).with_fetcher(Arc::clone(&graph) as Arc<dyn PageFetcher>);

    let discovery = pipeline.discover().await.unwrap();

    assert_eq!(discovery.urls.len(), 4);
    assert!(graph.requested().len() <= 4);
}

#[tokio::test]
async fn test_nothing_discoverable_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_text(&server, "/robots.txt", 200, "User-agent: *\nDisallow: /\n").await;

    let graph = Arc::new(LinkGraph::new(&[]));
    let pipeline = create_test_pipeline(create_test_config(&base, 2))
        .with_fetcher(Arc::clone(&graph) as Arc<dyn PageFetcher>);

    let result = pipeline.discover().await;

    assert!(matches!(
        result,
        Err(SurveyError::NoUrlsDiscovered { .. })
    ));
    assert!(graph.requested().is_empty());
}
