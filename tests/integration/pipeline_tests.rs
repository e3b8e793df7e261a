//! End-to-end tests for a full survey run
//!
//! A wiremock server plays the surveyed site. Performance scoring is faked so
//! no external service is involved.

use async_trait::async_trait;
use seo_survey::config::{load_config_with_hash, Config};
use seo_survey::crawler::RetryPolicy;
use seo_survey::output::{RunSummary, SITEWIDE_URL};
use seo_survey::performance::{PerformanceResult, PerformanceScorer, Strategy};
use seo_survey::pipeline::{DiscoverySource, EventSink, Phase, Pipeline, PipelineEvent};
use std::io::Write;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FixedPerformance {
    mobile: u32,
    desktop: u32,
}

#[async_trait]
impl PerformanceScorer for FixedPerformance {
    async fn score(&self, _url: &str, strategy: Strategy) -> PerformanceResult {
        match strategy {
            Strategy::Mobile => PerformanceResult::scored(self.mobile),
            Strategy::Desktop => PerformanceResult::scored(self.desktop),
        }
    }
}

fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::for_site(base_url);
    config.crawler.workers = 3;
    config.crawler.fetch_timeout_secs = 5;
    config
}

fn create_test_pipeline(config: Config) -> Pipeline {
    Pipeline::new(config)
        .unwrap()
        .with_retry(RetryPolicy::no_retry())
        .with_performance_scorer(Arc::new(FixedPerformance {
            mobile: 95,
            desktop: 92,
        }))
}

/// A page that satisfies every scoring rule apart from word count
fn optimized_page(base: &str) -> String {
    format!(
        r#"<html><head>
<title>Organic vegetable gardening for small urban backyards</title>
<meta name="description" content="{}">
<link rel="canonical" href="{}/organic-vegetable-gardening">
<script type="application/ld+json">{{"@type": "Article"}}</script>
</head><body>
<h1>Organic gardening</h1>
<h2>Soil</h2><h2>Compost</h2>
<img src="tomato.png" alt="Tomatoes">
<p>Compost enriches garden soil.</p>
</body></html>"#,
        "d".repeat(140),
        base
    )
}

async fn mount_site(server: &MockServer) {
    let base = server.uri();
    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/pages.xml</loc></sitemap>
</sitemapindex>"#
    );
    let pages = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/organic-vegetable-gardening</loc></url>
  <url><loc>{base}/compost</loc></url>
  <url><loc>{base}/broken</loc></url>
</urlset>"#
    );

    for (route, status, body) in [
        ("/sitemap.xml", 200, sitemap),
        ("/pages.xml", 200, pages),
        ("/organic-vegetable-gardening", 200, optimized_page(&base)),
        (
            "/compost",
            200,
            "<html><body><p>Compost compost compost garden</p></body></html>".to_string(),
        ),
        ("/broken", 500, String::new()),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_full_survey() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let report = create_test_pipeline(create_test_config(&base))
        .run()
        .await
        .unwrap();

    assert_eq!(report.discovery, DiscoverySource::Sitemap);
    let urls: Vec<&str> = report
        .rows
        .iter()
        .map(|row| row.features.url.as_str())
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/broken", base),
            format!("{}/compost", base),
            format!("{}/organic-vegetable-gardening", base),
        ]
    );
    assert!(report.finished_at >= report.started_at);

    let broken = &report.rows[0];
    assert!(broken.features.error.as_deref().unwrap().contains("500"));
    assert_eq!(broken.score.score, 0);
    assert!(broken.score.recommendations.is_empty());

    let optimized = &report.rows[2];
    assert_eq!(optimized.features.h1_count, 1);
    assert_eq!(optimized.features.performance_score_mobile, Some(95));
    assert_eq!(optimized.features.performance_score_desktop, Some(92));
    assert_eq!(
        optimized.score.recommendations,
        vec!["Add more textual content (300+ words).".to_string()]
    );
    assert_eq!(optimized.score.score, 85);
}

#[tokio::test]
async fn test_sitewide_row_aggregates_successful_pages() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let report = create_test_pipeline(create_test_config(&server.uri()))
        .run()
        .await
        .unwrap();

    let sitewide = &report.sitewide;
    assert_eq!(sitewide.features.url, SITEWIDE_URL);
    let page_words: u64 = report.rows.iter().map(|row| row.features.word_count).sum();
    assert_eq!(sitewide.features.word_count, page_words);
    assert_eq!(sitewide.features.keywords[0].0, "compost");
    assert!(sitewide.features.keywords.len() <= 10);
    assert_eq!(sitewide.features.h1_count, 0);

    let summary = RunSummary::from_report(&report, 5);
    assert_eq!(summary.total_pages, 3);
    assert_eq!(summary.pages_failed, 1);
}

#[tokio::test]
async fn test_events_report_progress() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let (events, mut receiver) = EventSink::channel();
    let pipeline = create_test_pipeline(create_test_config(&server.uri())).with_events(events);
    pipeline.run().await.unwrap();
    drop(pipeline);

    let mut analysis_progress = Vec::new();
    while let Some(event) = receiver.recv().await {
        if let PipelineEvent::Progress {
            phase: Phase::Analysis,
            current,
            total,
        } = event
        {
            analysis_progress.push((current, total));
        }
    }

    assert_eq!(analysis_progress, vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_run_from_config_file() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[site]
base-url = "{}"

[crawler]
max-pages = 2
workers = 2
"#,
        server.uri()
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    assert_eq!(hash.len(), 64);

    let report = create_test_pipeline(config).run().await.unwrap();
    assert_eq!(report.rows.len(), 2);
}
