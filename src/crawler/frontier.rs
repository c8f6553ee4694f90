//! Breadth-first crawl frontier
//!
//! FIFO queue plus the visited and queued sets, keyed by normalized URL.
//! Owned by the single task driving a crawl, so no locking is needed.

use std::collections::{HashSet, VecDeque};
use url::Url;

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Appends a URL unless it was already visited or is already queued
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: Url) -> bool {
        let key = url.as_str().to_string();
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return false;
        }
        self.queued.insert(key);
        self.queue.push_back(url);
        true
    }

    /// Pops the next URL not yet visited and marks it visited
    pub fn pop_unvisited(&mut self) -> Option<Url> {
        while let Some(url) = self.queue.pop_front() {
            let key = url.as_str().to_string();
            self.queued.remove(&key);
            if self.visited.insert(key) {
                return Some(url);
            }
        }
        None
    }

    /// Records a URL as visited without fetching it (e.g. a redirect target)
    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(url.as_str().to_string());
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Number of URLs waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
