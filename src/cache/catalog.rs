//! Single-slot TTL cache for the most recent catalog payload.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::CatalogPayload;

#[derive(Debug)]
struct CatalogEntry {
    payload: Arc<CatalogPayload>,
    fetched_at: Instant,
}

/// Holds at most one payload, valid while `now - fetched_at < ttl`.
///
/// Methods take the current time explicitly so callers decide which clock
/// applies; [`CacheLayer`](super::CacheLayer) passes `Instant::now()`.
#[derive(Debug)]
pub struct CatalogSlot {
    entry: Option<CatalogEntry>,
    ttl: Duration,
}

impl CatalogSlot {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| now.saturating_duration_since(e.fetched_at) < self.ttl)
    }

    /// The stored payload, or `None` if empty or stale. Never returns stale data.
    pub fn get_at(&self, now: Instant) -> Option<Arc<CatalogPayload>> {
        if !self.is_valid_at(now) {
            return None;
        }
        self.entry.as_ref().map(|e| Arc::clone(&e.payload))
    }

    /// Replace the slot unconditionally and restart the TTL at `now`.
    pub fn put_at(&mut self, payload: Arc<CatalogPayload>, now: Instant) {
        self.entry = Some(CatalogEntry {
            payload,
            fetched_at: now,
        });
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
