//! State module for tracking worker progress
//!
//! # Components
//!
//! - `WorkerState`: What a crawl or analysis worker is doing (idle, fetching, extracting links, analyzing)

mod worker_state;

pub use worker_state::WorkerState;
