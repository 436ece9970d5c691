//! Driving port for card submission.

use async_trait::async_trait;

use crate::domain::{Card, CardFields, Error, SubjectId};

/// Request payload for submitting a new card.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitCardRequest {
    /// Subject of the acting, already-signed-in identity.
    pub subject: SubjectId,
    /// Raw submission fields.
    pub fields: CardFields,
}

/// Driving port for the submission workflow.
///
/// Implementations validate the fields, resolve the acting user, allocate a
/// unique slug, persist the card with status `pending`, verify the write by
/// reading the record back, and invalidate affected listing views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardSubmission: Send + Sync {
    /// Submit a new card.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` with per-field details.
    /// - `UserNotFound` when no local user exists for the subject.
    /// - `SlugValidationFailed` when the slug pre-check cannot complete or
    ///   the name yields no usable slug base.
    /// - `DuplicateSlug` when the insert loses the slug race twice.
    /// - `VerificationFailed` when the read-back finds nothing.
    /// - `TransientError` on connection failures and timeouts.
    async fn submit(&self, request: SubmitCardRequest) -> Result<Card, Error>;
}
