//! Port abstraction for referral and click persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Click, Referral, ReferralWithClicks};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by referral repository adapters.
    pub enum ReferralPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection => "referral repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "referral repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// Insert a new referral, returning the persisted row.
    async fn insert(&self, referral: &Referral) -> Result<Referral, ReferralPersistenceError>;

    /// Fetch a referral by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Referral>, ReferralPersistenceError>;

    /// List a card's referrals with derived click counts, newest first.
    async fn list_for_card(
        &self,
        card_id: &Uuid,
    ) -> Result<Vec<ReferralWithClicks>, ReferralPersistenceError>;

    /// Delete the referral `id` owned by `owner`, returning rows removed.
    /// The owner predicate is part of the write's filter.
    async fn delete_owned(&self, id: &Uuid, owner: &Uuid)
        -> Result<u64, ReferralPersistenceError>;

    /// Append a click event.
    async fn record_click(&self, click: &Click) -> Result<(), ReferralPersistenceError>;
}
