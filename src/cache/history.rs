//! Bounded search result memo with FIFO eviction.

use std::collections::{HashMap, VecDeque};

use crate::types::ProductRecord;

/// Query string → matching records, bounded to `max_size` entries.
///
/// Eviction follows insertion order, not access order: lookups never
/// refresh an entry. Inserting an existing key replaces its value and
/// counts as a new insertion.
#[derive(Debug)]
pub struct SearchHistory {
    order: VecDeque<String>,
    entries: HashMap<String, Vec<ProductRecord>>,
    max_size: usize,
}

impl SearchHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(max_size.min(1024)),
            entries: HashMap::new(),
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn get(&self, query: &str) -> Option<&[ProductRecord]> {
        self.entries.get(query).map(Vec::as_slice)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    /// Store `results` under `query`, returning the keys evicted to stay in bound.
    pub fn insert(&mut self, query: String, results: Vec<ProductRecord>) -> Vec<String> {
        if self.entries.insert(query.clone(), results).is_some() {
            self.order.retain(|k| *k != query);
        }
        self.order.push_back(query);

        let mut evicted = Vec::new();
        while self.order.len() > self.max_size {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted.push(oldest);
        }
        evicted
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}
