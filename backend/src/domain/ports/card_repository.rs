//! Port abstraction for card persistence adapters and their errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Card, CardStatus, Slug};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by card repository adapters.
    pub enum CardPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection => "card repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "card repository query failed: {message}",
        /// Insert violated the slug uniqueness constraint.
        DuplicateSlug => "card slug already taken: {message}",
    }
}

/// Mutable card fields applied by the ownership-gated update.
///
/// Slug, status, owner, and timestamps are deliberately absent: the update
/// workflow never touches them.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPatch {
    pub name: String,
    pub bank: String,
    pub category: String,
    pub eligibility: String,
    pub benefits: String,
    pub referral_url: String,
    pub joining_fee: i64,
    pub annual_fee: i64,
    pub description: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Fetch a card by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Card>, CardPersistenceError>;

    /// Fetch a card by slug.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Card>, CardPersistenceError>;

    /// Insert a new card, returning the persisted row. The slug uniqueness
    /// constraint is enforced here, not by the allocator's pre-check.
    async fn insert(&self, card: &Card) -> Result<Card, CardPersistenceError>;

    /// Apply `patch` to the card `id` owned by `owner`. The owner predicate
    /// is part of the write's filter; `None` means no row matched, which
    /// covers both a vanished card and an ownership race.
    async fn update_owned(
        &self,
        id: &Uuid,
        owner: &Uuid,
        patch: &CardPatch,
    ) -> Result<Option<Card>, CardPersistenceError>;

    /// Delete the card `id` owned by `owner`, returning the number of rows
    /// removed. Referrals and their clicks cascade at the persistence layer.
    async fn delete_owned(&self, id: &Uuid, owner: &Uuid) -> Result<u64, CardPersistenceError>;

    /// Set the moderation status of a card, returning the updated row.
    async fn update_status(
        &self,
        id: &Uuid,
        status: CardStatus,
    ) -> Result<Option<Card>, CardPersistenceError>;

    /// List cards with the given status, newest first.
    async fn list_by_status(&self, status: CardStatus)
        -> Result<Vec<Card>, CardPersistenceError>;

    /// List a user's own submissions regardless of status, newest first.
    async fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<Card>, CardPersistenceError>;

    /// Delete ownerless cards with the given status (seed-data cleanup),
    /// returning the number of rows removed.
    async fn delete_unowned_with_status(
        &self,
        status: CardStatus,
    ) -> Result<u64, CardPersistenceError>;
}
