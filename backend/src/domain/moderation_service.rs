//! Administrator moderation workflow.
//!
//! Approve and reject are one-way transitions out of `pending`. The source
//! lifecycle intent is `pending → {approved, rejected}`, so this service
//! guards the state machine explicitly: re-applying the current status is
//! a harmless no-op, and moving a card between terminal states is refused.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::card::{Card, CardStatus};
use crate::domain::ports::{
    CardRepository, ListingCache, ListingView, Moderation, ModerationRequest, UserRepository,
};
use crate::domain::submission_service::{invalidate_views, map_card_error, resolve_acting_user};
use crate::domain::{Error, SubjectId, User};

/// Moderation workflow backed by user and card repositories.
#[derive(Clone)]
pub struct ModerationService<U, C, L> {
    users: Arc<U>,
    cards: Arc<C>,
    cache: Arc<L>,
}

impl<U, C, L> ModerationService<U, C, L> {
    /// Create a new moderation service.
    pub fn new(users: Arc<U>, cards: Arc<C>, cache: Arc<L>) -> Self {
        Self { users, cards, cache }
    }
}

impl<U, C, L> ModerationService<U, C, L>
where
    U: UserRepository,
    C: CardRepository,
    L: ListingCache,
{
    async fn resolve_admin(&self, subject: &SubjectId) -> Result<User, Error> {
        let user = resolve_acting_user(&self.users, subject).await?;
        if !user.is_admin() {
            return Err(Error::forbidden("administrator access required"));
        }
        Ok(user)
    }

    async fn transition(
        &self,
        request: ModerationRequest,
        target: CardStatus,
    ) -> Result<Card, Error> {
        self.resolve_admin(&request.subject).await?;

        let card = self
            .cards
            .find_by_id(&request.card_id)
            .await
            .map_err(map_card_error)?
            .ok_or_else(|| {
                Error::card_not_found(format!("card not found: {}", request.card_id))
            })?;

        if card.status == target {
            // Re-applying the current status changes nothing.
            return Ok(card);
        }
        if card.status != CardStatus::Pending {
            return Err(Error::update_failed(format!(
                "only pending cards can be moderated; card is {}",
                card.status
            )));
        }

        let updated = self
            .cards
            .update_status(&request.card_id, target)
            .await
            .map_err(map_card_error)?
            .ok_or_else(|| Error::update_failed("card status was not updated"))?;

        info!(card_id = %updated.id, status = %updated.status, "card moderated");
        invalidate_views(
            &self.cache,
            &[
                ListingView::Home,
                ListingView::Explore,
                ListingView::CardDetail(updated.slug.clone()),
            ],
        )
        .await;
        Ok(updated)
    }
}

#[async_trait]
impl<U, C, L> Moderation for ModerationService<U, C, L>
where
    U: UserRepository,
    C: CardRepository,
    L: ListingCache,
{
    async fn approve(&self, request: ModerationRequest) -> Result<Card, Error> {
        self.transition(request, CardStatus::Approved).await
    }

    async fn reject(&self, request: ModerationRequest) -> Result<Card, Error> {
        self.transition(request, CardStatus::Rejected).await
    }

    async fn pending_queue(&self, subject: SubjectId) -> Result<Vec<Card>, Error> {
        self.resolve_admin(&subject).await?;
        self.cards
            .list_by_status(CardStatus::Pending)
            .await
            .map_err(map_card_error)
    }

    async fn remove_seed_data(&self, subject: SubjectId) -> Result<u64, Error> {
        self.resolve_admin(&subject).await?;
        let removed = self
            .cards
            .delete_unowned_with_status(CardStatus::Approved)
            .await
            .map_err(map_card_error)?;

        info!(removed, "seed cards removed");
        if removed > 0 {
            invalidate_views(&self.cache, &[ListingView::Home, ListingView::Explore]).await;
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "moderation_service_tests.rs"]
mod tests;
