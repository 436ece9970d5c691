//! Referral workflows: attach, list, delete, and click recording.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    AddReferralRequest, CardRepository, RecordClickRequest, ReferralCommand,
    ReferralPersistenceError, ReferralRepository, UserRepository,
};
use crate::domain::submission_service::{map_card_error, resolve_acting_user};
use crate::domain::validation::{FieldErrors, is_valid_referral_url};
use crate::domain::{Click, Error, Referral, ReferralWithClicks, SubjectId};

fn map_referral_error(error: ReferralPersistenceError) -> Error {
    match error {
        ReferralPersistenceError::Connection { message } => {
            Error::transient(format!("referral repository unavailable: {message}"))
        }
        ReferralPersistenceError::Query { message } => {
            Error::internal(format!("referral repository error: {message}"))
        }
    }
}

/// Referral workflow backed by user, card, and referral repositories.
#[derive(Clone)]
pub struct ReferralService<U, C, R> {
    users: Arc<U>,
    cards: Arc<C>,
    referrals: Arc<R>,
}

impl<U, C, R> ReferralService<U, C, R> {
    /// Create a new referral service.
    pub fn new(users: Arc<U>, cards: Arc<C>, referrals: Arc<R>) -> Self {
        Self {
            users,
            cards,
            referrals,
        }
    }
}

#[async_trait]
impl<U, C, R> ReferralCommand for ReferralService<U, C, R>
where
    U: UserRepository,
    C: CardRepository,
    R: ReferralRepository,
{
    async fn add(&self, request: AddReferralRequest) -> Result<Referral, Error> {
        let referral_url = request.referral_url.trim();
        if !is_valid_referral_url(referral_url) {
            let mut errors = FieldErrors::new();
            errors.insert(
                "referralUrl".to_owned(),
                "Referral URL must be an absolute HTTP or HTTPS URL".to_owned(),
            );
            return Err(Error::validation_failed(&errors));
        }

        let user = resolve_acting_user(&self.users, &request.subject).await?;

        // Referrals attach only to cards that actually exist.
        self.cards
            .find_by_id(&request.card_id)
            .await
            .map_err(map_card_error)?
            .ok_or_else(|| {
                Error::card_not_found(format!("card not found: {}", request.card_id))
            })?;

        let referral = Referral {
            id: Uuid::new_v4(),
            user_id: user.id(),
            card_id: request.card_id,
            referral_url: referral_url.to_owned(),
            description: request
                .description
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
            created_at: Utc::now(),
        };

        let created = self
            .referrals
            .insert(&referral)
            .await
            .map_err(map_referral_error)?;

        info!(referral_id = %created.id, card_id = %created.card_id, "referral added");
        Ok(created)
    }

    async fn delete(&self, referral_id: Uuid, subject: SubjectId) -> Result<(), Error> {
        let user = resolve_acting_user(&self.users, &subject).await?;

        let referral = self
            .referrals
            .find_by_id(&referral_id)
            .await
            .map_err(map_referral_error)?
            .ok_or_else(|| {
                Error::referral_not_found(format!("referral not found: {referral_id}"))
            })?;

        if referral.user_id != user.id() {
            return Err(Error::forbidden("you can only delete your own referrals"));
        }

        let removed = self
            .referrals
            .delete_owned(&referral_id, &user.id())
            .await
            .map_err(map_referral_error)?;
        if removed == 0 {
            return Err(Error::delete_failed("referral was not deleted"));
        }

        info!(referral_id = %referral_id, "referral deleted");
        Ok(())
    }

    async fn record_click(&self, request: RecordClickRequest) -> Result<(), Error> {
        let click = Click {
            id: Uuid::new_v4(),
            referral_id: request.referral_id,
            user_agent: request.user_agent,
            ip_address: request.ip_address,
            created_at: Utc::now(),
        };
        self.referrals
            .record_click(&click)
            .await
            .map_err(map_referral_error)
    }

    async fn list_for_card(&self, card_id: Uuid) -> Result<Vec<ReferralWithClicks>, Error> {
        self.referrals
            .list_for_card(&card_id)
            .await
            .map_err(map_referral_error)
    }
}

#[cfg(test)]
#[path = "referral_service_tests.rs"]
mod tests;
