//! Driving port for ownership-gated card mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Card, CardFields, Error, SubjectId};

/// Request payload for updating an existing card.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCardRequest {
    /// Target card.
    pub card_id: Uuid,
    /// Subject of the acting identity.
    pub subject: SubjectId,
    /// Replacement values for the mutable fields. The slug is never
    /// regenerated, even when the name changes.
    pub fields: CardFields,
}

/// Request payload for deleting a card.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCardRequest {
    /// Target card.
    pub card_id: Uuid,
    /// Subject of the acting identity.
    pub subject: SubjectId,
}

/// Driving port for update and delete.
///
/// Ownership is checked twice: explicitly against the fetched record, and
/// again as a predicate on the write itself, so an ownership race can at
/// worst make the write affect zero rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardMutation: Send + Sync {
    /// Update a card the acting user owns.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed`, `UserNotFound`, `CardNotFound`.
    /// - `Forbidden` when the card belongs to someone else or to nobody.
    /// - `UpdateFailed` when the guarded write affects no rows.
    /// - `TransientError` on connection failures and timeouts.
    async fn update(&self, request: UpdateCardRequest) -> Result<Card, Error>;

    /// Delete a card the acting user owns. Referrals and their clicks
    /// cascade at the persistence layer.
    ///
    /// # Errors
    ///
    /// - `UserNotFound`, `CardNotFound`, `Forbidden`.
    /// - `DeleteFailed` when the guarded write affects no rows.
    /// - `TransientError` on connection failures and timeouts.
    async fn delete(&self, request: DeleteCardRequest) -> Result<(), Error>;
}
