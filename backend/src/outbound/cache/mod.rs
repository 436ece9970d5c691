//! In-process listing cache adapter.
//!
//! Tracks a generation counter per view key. Readers pair a render with the
//! generation they observed and re-render when the counter moves on;
//! invalidation is just a bump. This keeps the port honest without an
//! external cache backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{ListingCache, ListingCacheError, ListingView};

/// Generation-counter cache keyed by view.
#[derive(Debug, Default)]
pub struct InProcessListingCache {
    generations: RwLock<HashMap<String, u64>>,
}

impl InProcessListingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current generation of a view. Views never invalidated are at
    /// generation zero.
    pub fn generation(&self, view: &ListingView) -> u64 {
        let generations = self
            .generations
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        generations.get(&view.key()).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ListingCache for InProcessListingCache {
    async fn invalidate(&self, view: &ListingView) -> Result<(), ListingCacheError> {
        let mut generations = self
            .generations
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *generations.entry(view.key()).or_insert(0) += 1;
        Ok(())
    }
}
