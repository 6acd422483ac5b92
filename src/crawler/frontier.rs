//! Crawl frontier: the breadth-first queue of URLs still to fetch
//!
//! The frontier remembers every URL it has ever accepted, so a page is
//! queued (and therefore fetched and indexed) at most once per crawl.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The canonical URL to fetch
    pub url: Url,

    /// Link distance from the seed
    pub depth: u32,
}

/// FIFO frontier with a visited set
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<QueuedUrl>,

    /// Every URL ever accepted
    seen: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed, 0);
        frontier
    }

    /// Queues a URL unless it was queued before
    ///
    /// Returns true if the URL was new.
    pub fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }

        tracing::trace!("Queued {} at depth {}", url, depth);
        self.queue.push_back(QueuedUrl { url, depth });
        true
    }

    /// Takes the oldest queued URL
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    /// Returns the number of URLs waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of distinct URLs ever queued
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Drops everything still waiting (the visited set is kept)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
