//! Keyword frequency counters and the site-wide aggregate
//!
//! A [`KeywordCounter`] remembers the order in which each key was first seen
//! so that [`KeywordCounter::most_common`] can break ties deterministically.
//! Equality only compares counts.

use crate::SurveyError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mapping of stem to occurrence count
#[derive(Debug, Clone, Default)]
pub struct KeywordCounter {
    counts: HashMap<String, u64>,
    first_seen: Vec<String>,
}

impl KeywordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `key`
    pub fn add(&mut self, key: &str) {
        self.add_n(key, 1);
    }

    fn add_n(&mut self, key: &str, n: u64) {
        match self.counts.get_mut(key) {
            Some(count) => *count += n,
            None => {
                self.counts.insert(key.to_string(), n);
                self.first_seen.push(key.to_string());
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of every count
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Keys in first-occurrence order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.first_seen.iter().map(String::as_str)
    }

    /// The `n` most frequent keys, highest count first
    ///
    /// Equal counts keep first-occurrence order.
    pub fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .first_seen
            .iter()
            .map(|key| (key.clone(), self.get(key)))
            .collect();
        // sort_by is stable, so ties stay in first-seen order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }

    /// Adds every count of `other` into `self`
    ///
    /// All-or-nothing: if any count would overflow, `self` is left untouched
    /// and [`SurveyError::AggregationConflict`] is returned.
    pub fn merge(&mut self, other: &KeywordCounter) -> Result<(), SurveyError> {
        let overflows = other
            .counts
            .iter()
            .any(|(key, n)| self.get(key).checked_add(*n).is_none());
        if overflows {
            return Err(SurveyError::AggregationConflict);
        }

        for key in &other.first_seen {
            self.add_n(key, other.get(key));
        }
        Ok(())
    }
}

impl PartialEq for KeywordCounter {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl Eq for KeywordCounter {}

impl<S: AsRef<str>> FromIterator<S> for KeywordCounter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.add(key.as_ref());
        }
        counter
    }
}

/// The site-wide counter shared by every analysis worker
///
/// One lock guards the whole counter, so each merge is atomic.
#[derive(Debug, Default)]
pub struct KeywordAggregate {
    inner: Mutex<KeywordCounter>,
}

impl KeywordAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, KeywordCounter> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merges one page's counter into the aggregate
    pub fn merge(&self, partial: &KeywordCounter) -> Result<(), SurveyError> {
        self.lock().merge(partial)
    }

    /// A copy of the current totals
    pub fn snapshot(&self) -> KeywordCounter {
        self.lock().clone()
    }

    pub fn into_inner(self) -> KeywordCounter {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
