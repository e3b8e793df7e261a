//! Concurrent page analysis
//!
//! W worker tasks drain a shared URL queue. Each worker fetches a page,
//! extracts its features, asks the performance scorer for mobile and desktop
//! scores, scores the page, and sends the record plus the page's keyword
//! counter to a single collector. The collector owns the site-wide aggregate
//! and merges counters one at a time, in whatever order pages finish.

use crate::analysis::counter::{KeywordAggregate, KeywordCounter};
use crate::analysis::extractor::FeatureExtractor;
use crate::analysis::features::PageFeatures;
use crate::crawler::PageFetcher;
use crate::output::PageReport;
use crate::performance::{PerformanceScorer, Strategy};
use crate::pipeline::{EventSink, Phase};
use crate::scoring::{score, ScoreReport};
use crate::state::WorkerState;
use crate::SurveyError;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

/// Everything the analysis stage produced
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    /// One report per analyzed URL, sorted by URL
    pub reports: Vec<PageReport>,

    /// Site-wide keyword totals over every successfully analyzed page
    pub keywords: KeywordCounter,

    /// Pages whose record carries an error
    pub failures: usize,
}

/// The page analysis worker pool
pub struct AnalysisPipeline {
    fetcher: Arc<dyn PageFetcher>,
    performance: Arc<dyn PerformanceScorer>,
    extractor: Arc<FeatureExtractor>,
    workers: usize,
    stop: Arc<AtomicBool>,
    events: EventSink,
}

impl AnalysisPipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        performance: Arc<dyn PerformanceScorer>,
        extractor: Arc<FeatureExtractor>,
        workers: usize,
    ) -> Self {
        Self {
            fetcher,
            performance,
            extractor,
            workers: workers.max(1),
            stop: Arc::new(AtomicBool::new(false)),
            events: EventSink::disabled(),
        }
    }

    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Analyzes every URL in `urls`
    ///
    /// Failed pages are kept with their `error` set. Only an aggregation
    /// conflict or a worker state violation fails the whole stage.
    pub async fn run(&self, urls: Vec<String>) -> Result<AnalysisOutcome, SurveyError> {
        let total = urls.len();
        if total == 0 {
            return Ok(AnalysisOutcome::default());
        }

        let worker_count = self.workers.min(total);
        tracing::info!("Analyzing {} page(s) with {} workers", total, worker_count);
        self.events
            .status(format!("Analyzing {} pages", total));

        let queue = Arc::new(Mutex::new(VecDeque::from(urls)));
        let (tx, mut rx) = unbounded_channel::<(PageReport, KeywordCounter)>();
        let mut handles = Vec::with_capacity(worker_count);

        for id in 0..worker_count {
            let worker = AnalysisWorker {
                id,
                queue: Arc::clone(&queue),
                fetcher: Arc::clone(&self.fetcher),
                performance: Arc::clone(&self.performance),
                extractor: Arc::clone(&self.extractor),
                stop: Arc::clone(&self.stop),
                results: tx.clone(),
            };
            handles.push(tokio::spawn(worker.run()));
        }
        drop(tx);

        let aggregate = KeywordAggregate::new();
        let mut reports: HashMap<String, PageReport> = HashMap::with_capacity(total);
        let mut failures = 0;

        while let Some((report, counter)) = rx.recv().await {
            aggregate.merge(&counter)?;
            if report.features.is_failed() {
                failures += 1;
            }
            reports.insert(report.features.url.clone(), report);
            self.events.progress(Phase::Analysis, reports.len(), total);
        }

        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(e),
                Err(e) => tracing::error!("Analysis worker panicked: {}", e),
            }
        }

        let mut reports: Vec<PageReport> = reports.into_values().collect();
        reports.sort_by(|a, b| a.features.url.cmp(&b.features.url));

        tracing::info!(
            "Analysis finished: {} page(s), {} failed",
            reports.len(),
            failures
        );

        Ok(AnalysisOutcome {
            reports,
            keywords: aggregate.into_inner(),
            failures,
        })
    }
}

struct AnalysisWorker {
    id: usize,
    queue: Arc<Mutex<VecDeque<String>>>,
    fetcher: Arc<dyn PageFetcher>,
    performance: Arc<dyn PerformanceScorer>,
    extractor: Arc<FeatureExtractor>,
    stop: Arc<AtomicBool>,
    results: UnboundedSender<(PageReport, KeywordCounter)>,
}

impl AnalysisWorker {
    async fn run(self) -> Result<(), SurveyError> {
        let mut state = WorkerState::Idle;

        loop {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }

            let next = self
                .queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            let Some(url) = next else {
                break;
            };

            state = state.transition(WorkerState::Fetching)?;
            tracing::debug!("Analysis worker {} fetching {}", self.id, url);

            let (report, counter) = match self.fetcher.fetch(&url).await {
                Ok(page) => {
                    state = state.transition(WorkerState::Analyzing)?;
                    self.analyze(&url, &page.html).await
                }
                Err(e) => {
                    tracing::warn!("Failed to analyze {}: {}", url, e);
                    let report = PageReport {
                        features: PageFeatures::failed(&url, e.to_string()),
                        score: ScoreReport::unscored(),
                    };
                    (report, KeywordCounter::new())
                }
            };
            state = state.transition(WorkerState::Idle)?;

            if self.results.send((report, counter)).is_err() {
                break;
            }
        }

        state.transition(WorkerState::Stopped)?;
        Ok(())
    }

    async fn analyze(&self, url: &str, html: &str) -> (PageReport, KeywordCounter) {
        let (mut features, counter) = self.extractor.extract(url, html);

        let (mobile, desktop) = tokio::join!(
            self.performance.score(url, Strategy::Mobile),
            self.performance.score(url, Strategy::Desktop)
        );
        features.performance_score_mobile = mobile.performance_score;
        features.performance_score_desktop = desktop.performance_score;

        let score = score(&features, self.extractor.tokenizer().stop_words());
        (PageReport { features, score }, counter)
    }
}
