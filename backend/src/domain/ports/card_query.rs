//! Driving port for card read models.

use async_trait::async_trait;

use crate::domain::{Card, Error, Slug, SubjectId};

/// Optional filters applied to the approved-cards listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardListingFilter {
    /// Keep only cards in this category (case-insensitive).
    pub category: Option<String>,
    /// Keep only cards issued by this bank (case-insensitive).
    pub bank: Option<String>,
}

/// Driving port for listings and detail reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardQuery: Send + Sync {
    /// Approved cards for the home/explore listings, newest first.
    async fn approved_listing(&self, filter: CardListingFilter) -> Result<Vec<Card>, Error>;

    /// The acting user's own submissions, every status, newest first.
    async fn own_submissions(&self, subject: SubjectId) -> Result<Vec<Card>, Error>;

    /// Single-card detail by slug.
    ///
    /// # Errors
    ///
    /// - `CardNotFound` when no card carries the slug.
    /// - `TransientError` on connection failures and timeouts.
    async fn detail_by_slug(&self, slug: Slug) -> Result<Card, Error>;
}
