//! Driving port for administrator moderation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Card, Error, SubjectId};

/// Request payload naming the card under moderation and the acting admin.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationRequest {
    /// Target card.
    pub card_id: Uuid,
    /// Subject of the acting identity; must resolve to an administrator.
    pub subject: SubjectId,
}

/// Driving port for the moderation workflow.
///
/// Status transitions are one-way: `pending → approved` and
/// `pending → rejected`. Re-applying the current status is a no-op;
/// reversing a terminal status is refused. No ownership check applies —
/// administrators act on any card — and field content is not re-validated
/// at approval time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Moderation: Send + Sync {
    /// Approve a pending card.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` when the subject has no local user.
    /// - `Forbidden` when the acting user is not an administrator.
    /// - `CardNotFound`, `UpdateFailed` (invalid transition or lost write).
    /// - `TransientError` on connection failures and timeouts.
    async fn approve(&self, request: ModerationRequest) -> Result<Card, Error>;

    /// Reject a pending card. Same error contract as [`Moderation::approve`].
    async fn reject(&self, request: ModerationRequest) -> Result<Card, Error>;

    /// List the pending-review queue, newest first. Admin-only.
    async fn pending_queue(&self, subject: SubjectId) -> Result<Vec<Card>, Error>;

    /// Delete ownerless approved seed cards, returning the number removed.
    /// Admin-only.
    async fn remove_seed_data(&self, subject: SubjectId) -> Result<u64, Error>;
}
