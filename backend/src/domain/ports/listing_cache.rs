//! Port for invalidating cached listing views.
//!
//! Workflows name the views a mutation touches; the presentation layer
//! decides what invalidation means (re-render, cache purge, nothing).
//! Invalidation is advisory: workflows log a failed invalidation and carry
//! on, because the mutation itself has already committed.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Slug;

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing cache adapters.
    pub enum ListingCacheError {
        /// The cache backend rejected the invalidation.
        Backend => "listing cache invalidation failed: {message}",
    }
}

/// Cached view keys the workflows know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingView {
    /// Home listing of approved cards.
    Home,
    /// Explore/category listing.
    Explore,
    /// A user's own-submissions listing.
    OwnSubmissions(Uuid),
    /// A single card's detail view, keyed by slug.
    CardDetail(Slug),
}

impl ListingView {
    /// Stable key string used by cache adapters.
    pub fn key(&self) -> String {
        match self {
            Self::Home => "home".to_owned(),
            Self::Explore => "explore".to_owned(),
            Self::OwnSubmissions(user_id) => format!("own-submissions:{user_id}"),
            Self::CardDetail(slug) => format!("card:{slug}"),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Invalidate one cached view.
    async fn invalidate(&self, view: &ListingView) -> Result<(), ListingCacheError>;
}

/// No-op cache for deployments without a cached presentation layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpListingCache;

#[async_trait]
impl ListingCache for NoOpListingCache {
    async fn invalidate(&self, _view: &ListingView) -> Result<(), ListingCacheError> {
        Ok(())
    }
}
