//! Driving port for referral commands and reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Referral, ReferralWithClicks, SubjectId};

/// Request payload for attaching a referral to a card.
#[derive(Debug, Clone, PartialEq)]
pub struct AddReferralRequest {
    /// Subject of the acting identity.
    pub subject: SubjectId,
    /// Card the referral targets.
    pub card_id: Uuid,
    /// Absolute HTTP/HTTPS referral link.
    pub referral_url: String,
    /// Optional free-text note.
    pub description: Option<String>,
}

/// Request payload for recording a click against a referral.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordClickRequest {
    /// Referral that was followed.
    pub referral_id: Uuid,
    /// Browser user agent, when known.
    pub user_agent: Option<String>,
    /// Caller IP, when known.
    pub ip_address: Option<String>,
}

/// Driving port for referral workflows.
///
/// Multiple referrals per (user, card) pair are permitted; referrals have
/// no approval gate. Click recording is fire-and-forget for the caller: a
/// failed write is reported but must never block the redirect.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralCommand: Send + Sync {
    /// Attach a referral to a card.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` when the URL is not absolute http/https.
    /// - `UserNotFound`, `CardNotFound`.
    /// - `TransientError` on connection failures and timeouts.
    async fn add(&self, request: AddReferralRequest) -> Result<Referral, Error>;

    /// Delete a referral the acting user owns.
    ///
    /// # Errors
    ///
    /// - `UserNotFound`, `ReferralNotFound`, `Forbidden`, `DeleteFailed`.
    /// - `TransientError` on connection failures and timeouts.
    async fn delete(&self, referral_id: Uuid, subject: SubjectId) -> Result<(), Error>;

    /// Append a click event.
    async fn record_click(&self, request: RecordClickRequest) -> Result<(), Error>;

    /// List a card's referrals with derived click counts.
    async fn list_for_card(&self, card_id: Uuid) -> Result<Vec<ReferralWithClicks>, Error>;
}
