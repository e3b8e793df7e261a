//! Shared crawl frontier for the breadth-first fallback crawl
//!
//! The frontier owns three pieces of state behind a single lock:
//! - A FIFO queue of `(url, depth)` targets
//! - The visited set, which a URL joins the moment a worker claims it
//! - A count of claims that are still being fetched
//!
//! Claiming is check-then-add under that lock, so two workers can never
//! claim the same URL and the visited set never grows past `max_pages`.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;

/// A URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: String,
    /// Link distance from the base URL (base = 0)
    pub depth: u32,
}

/// What a worker gets when it asks for work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// A URL now owned by the caller; call [`Frontier::complete`] when done
    Target(CrawlTarget),

    /// Queue is empty but other workers may still add links
    Wait,

    /// Nothing left to do: budget reached, or queue empty with nothing in flight
    Exhausted,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<CrawlTarget>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    visit_order: Vec<String>,
    in_flight: usize,
}

/// Thread-safe FIFO frontier with a visited set
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify: Notify,
    max_pages: usize,
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(max_pages: usize, max_depth: u32) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            notify: Notify::new(),
            max_pages,
            max_depth,
        }
    }

    /// Creates a frontier holding only `seed` at depth 0
    pub fn seeded(seed: &str, max_pages: usize, max_depth: u32) -> Self {
        let frontier = Self::new(max_pages, max_depth);
        frontier.offer(seed, 0);
        frontier
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a discovered link
    ///
    /// Rejected when the URL was already visited or queued, when `depth`
    /// exceeds `max_depth`, or when visited plus queued has reached
    /// `max_pages`.
    ///
    /// # Returns
    ///
    /// `true` if the URL was queued
    pub fn offer(&self, url: &str, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let mut state = self.lock();
        if state.visited.contains(url) || state.queued.contains(url) {
            return false;
        }
        if state.visited.len() + state.queue.len() >= self.max_pages {
            return false;
        }

        state.queued.insert(url.to_string());
        state.queue.push_back(CrawlTarget {
            url: url.to_string(),
            depth,
        });
        drop(state);

        self.notify.notify_one();
        true
    }

    /// Claims the next unvisited URL in FIFO order
    ///
    /// The claimed URL is added to the visited set before this returns.
    pub fn claim(&self) -> Claim {
        let mut state = self.lock();

        loop {
            if state.visited.len() >= self.max_pages {
                return Claim::Exhausted;
            }

            let Some(target) = state.queue.pop_front() else {
                return if state.in_flight > 0 {
                    Claim::Wait
                } else {
                    Claim::Exhausted
                };
            };
            state.queued.remove(&target.url);

            if target.depth > self.max_depth || state.visited.contains(&target.url) {
                continue;
            }

            state.visited.insert(target.url.clone());
            state.visit_order.push(target.url.clone());
            state.in_flight += 1;
            return Claim::Target(target);
        }
    }

    /// Marks a claimed URL as finished (successfully or not)
    pub fn complete(&self) {
        {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.notify.notify_waiters();
    }

    /// Waits for new links or a completed claim, at most `timeout`
    pub async fn wait(&self, timeout: Duration) {
        let _ = tokio::time::timeout(timeout, self.notify.notified()).await;
    }

    /// Returns true once the page budget has been spent
    pub fn is_full(&self) -> bool {
        self.lock().visited.len() >= self.max_pages
    }

    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn queued_count(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Visited URLs in claim order
    pub fn visited(&self) -> Vec<String> {
        self.lock().visit_order.clone()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}
