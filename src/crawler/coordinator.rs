//! Breadth-first fallback crawler
//!
//! Runs W worker tasks over a shared [`Frontier`]. Each worker claims a URL,
//! fetches it through the [`PageFetcher`], and offers every crawlable,
//! query-stripped anchor back to the frontier at `depth + 1`. The crawl ends
//! when the page budget is spent, the frontier drains, or the stop flag is
//! raised.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{Claim, Frontier};
use crate::pipeline::{EventSink, Phase};
use crate::policy::PolicyContext;
use crate::state::WorkerState;
use crate::url::clean_url;
use crate::SurveyError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long an idle worker waits before re-checking the frontier
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Result of a fallback crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Every claimed URL in claim order, including ones whose fetch failed
    pub visited: Vec<String>,

    /// Number of fetches that returned an error
    pub failures: usize,

    /// True if the stop flag ended the crawl early
    pub cancelled: bool,
}

/// Concurrent frontier crawler
pub struct FrontierCrawler {
    fetcher: Arc<dyn PageFetcher>,
    policy: Arc<PolicyContext>,
    workers: usize,
    stop: Arc<AtomicBool>,
    events: EventSink,
}

impl FrontierCrawler {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page source shared by all workers
    /// * `policy` - Crawlability rules plus page and depth limits
    /// * `workers` - Number of worker tasks (at least one is used)
    pub fn new(fetcher: Arc<dyn PageFetcher>, policy: Arc<PolicyContext>, workers: usize) -> Self {
        Self {
            fetcher,
            policy,
            workers: workers.max(1),
            stop: Arc::new(AtomicBool::new(false)),
            events: EventSink::disabled(),
        }
    }

    /// Shares an existing stop flag (e.g. one wired to Ctrl-C)
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Crawls outward from `base_url`
    ///
    /// The seed itself must pass the policy filter, otherwise nothing is
    /// fetched.
    pub async fn crawl(&self, base_url: &str) -> Result<CrawlOutcome, SurveyError> {
        let seed = clean_url(base_url);
        let frontier = Arc::new(Frontier::new(
            self.policy.max_pages(),
            self.policy.max_depth(),
        ));

        if self.policy.is_crawlable(&seed) {
            frontier.offer(&seed, 0);
        } else {
            tracing::warn!("Base URL {} is not crawlable under the current policy", seed);
        }

        tracing::info!(
            "Starting fallback crawl of {} with {} workers (max {} pages, depth {})",
            seed,
            self.workers,
            self.policy.max_pages(),
            self.policy.max_depth()
        );
        self.events.status(format!("Crawling {}", seed));

        let start_time = Instant::now();
        let failures = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::with_capacity(self.workers);

        for worker_id in 0..self.workers {
            let worker = CrawlWorker {
                id: worker_id,
                fetcher: Arc::clone(&self.fetcher),
                policy: Arc::clone(&self.policy),
                frontier: Arc::clone(&frontier),
                stop: Arc::clone(&self.stop),
                failures: Arc::clone(&failures),
                events: self.events.clone(),
            };
            handles.push(tokio::spawn(worker.run()));
        }

        let mut first_error = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!("Crawl worker failed: {}", e);
                    first_error.get_or_insert(e);
                }
                Err(e) => tracing::error!("Crawl worker panicked: {}", e),
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let outcome = CrawlOutcome {
            visited: frontier.visited(),
            failures: failures.load(Ordering::SeqCst),
            cancelled: self.stop.load(Ordering::SeqCst),
        };

        tracing::info!(
            "Crawl completed: {} pages visited ({} failed) in {:?}",
            outcome.visited.len(),
            outcome.failures,
            start_time.elapsed()
        );

        Ok(outcome)
    }
}

struct CrawlWorker {
    id: usize,
    fetcher: Arc<dyn PageFetcher>,
    policy: Arc<PolicyContext>,
    frontier: Arc<Frontier>,
    stop: Arc<AtomicBool>,
    failures: Arc<AtomicUsize>,
    events: EventSink,
}

impl CrawlWorker {
    async fn run(self) -> Result<(), SurveyError> {
        let mut state = WorkerState::Idle;

        loop {
            if self.stop.load(Ordering::SeqCst) || self.frontier.is_full() {
                break;
            }

            let target = match self.frontier.claim() {
                Claim::Target(target) => target,
                Claim::Wait => {
                    self.frontier.wait(IDLE_POLL).await;
                    continue;
                }
                Claim::Exhausted => break,
            };

            state = state.transition(WorkerState::Fetching)?;
            tracing::debug!("Worker {} fetching {} (depth {})", self.id, target.url, target.depth);
            let result = self.fetcher.fetch(&target.url).await;

            match result {
                Ok(page) if !self.stop.load(Ordering::SeqCst) && !self.frontier.is_full() => {
                    state = state.transition(WorkerState::ExtractingLinks)?;
                    let next_depth = target.depth + 1;
                    let mut queued = 0;
                    for href in &page.anchors {
                        let link = clean_url(href);
                        if self.policy.is_crawlable(&link) && self.frontier.offer(&link, next_depth)
                        {
                            queued += 1;
                        }
                    }
                    tracing::debug!("{} queued {} new link(s)", target.url, queued);
                }
                Ok(_) => {
                    // Budget spent or stop requested while fetching
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", target.url, e);
                    self.failures.fetch_add(1, Ordering::SeqCst);
                }
            }

            state = state.transition(WorkerState::Idle)?;
            self.frontier.complete();
            self.events.progress(
                Phase::Discovery,
                self.frontier.visited_count(),
                self.frontier.max_pages(),
            );
        }

        state.transition(WorkerState::Stopped)?;
        Ok(())
    }
}
