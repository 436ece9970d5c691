//! Ownership-gated card mutations.
//!
//! Update and delete verify that the acting user owns the target card
//! before mutating. The check runs twice: once against the fetched record,
//! and again as an owner predicate on the write itself, so a race where
//! ownership observably changes between check and write can at worst make
//! the write affect zero rows.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::card::{Card, CardFields};
use crate::domain::ports::{
    CardMutation, CardPatch, CardRepository, DeleteCardRequest, ListingCache, ListingView,
    UpdateCardRequest, UserRepository,
};
use crate::domain::submission_service::{invalidate_views, map_card_error, resolve_acting_user};
use crate::domain::validation::validate_submission;
use crate::domain::{Error, User};

fn patch_from_fields(fields: &CardFields) -> CardPatch {
    CardPatch {
        name: fields.name.trim().to_owned(),
        bank: fields.bank.trim().to_owned(),
        category: fields.category.trim().to_owned(),
        eligibility: fields.eligibility.trim().to_owned(),
        benefits: fields.benefits.trim().to_owned(),
        referral_url: fields.referral_url.trim().to_owned(),
        joining_fee: CardFields::coerce_fee(fields.joining_fee),
        annual_fee: CardFields::coerce_fee(fields.annual_fee),
        description: fields
            .description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned),
    }
}

/// Mutation workflow backed by user and card repositories.
#[derive(Clone)]
pub struct CardMutationService<U, C, L> {
    users: Arc<U>,
    cards: Arc<C>,
    cache: Arc<L>,
}

impl<U, C, L> CardMutationService<U, C, L> {
    /// Create a new mutation service.
    pub fn new(users: Arc<U>, cards: Arc<C>, cache: Arc<L>) -> Self {
        Self { users, cards, cache }
    }
}

impl<U, C, L> CardMutationService<U, C, L>
where
    U: UserRepository,
    C: CardRepository,
    L: ListingCache,
{
    /// Fetch the target card and run the explicit ownership pre-check.
    /// Seed data (`submitted_by` = None) is owned by nobody, so it always
    /// fails the check.
    async fn fetch_owned_card(
        &self,
        card_id: &uuid::Uuid,
        user: &User,
        action: &str,
    ) -> Result<Card, Error> {
        let card = self
            .cards
            .find_by_id(card_id)
            .await
            .map_err(map_card_error)?
            .ok_or_else(|| Error::card_not_found(format!("card not found: {card_id}")))?;

        if !card.is_owned_by(user.id()) {
            return Err(Error::forbidden(format!(
                "you can only {action} your own cards"
            )));
        }
        Ok(card)
    }

    async fn invalidate_card_views(&self, user: &User, card: &Card) {
        invalidate_views(
            &self.cache,
            &[
                ListingView::Home,
                ListingView::Explore,
                ListingView::OwnSubmissions(user.id()),
                ListingView::CardDetail(card.slug.clone()),
            ],
        )
        .await;
    }
}

#[async_trait]
impl<U, C, L> CardMutation for CardMutationService<U, C, L>
where
    U: UserRepository,
    C: CardRepository,
    L: ListingCache,
{
    async fn update(&self, request: UpdateCardRequest) -> Result<Card, Error> {
        let field_errors = validate_submission(&request.fields);
        if !field_errors.is_empty() {
            return Err(Error::validation_failed(&field_errors));
        }

        let user = resolve_acting_user(&self.users, &request.subject).await?;
        self.fetch_owned_card(&request.card_id, &user, "edit").await?;

        let patch = patch_from_fields(&request.fields);
        // The write re-asserts ownership in its filter; None means the row
        // vanished or ownership changed under us.
        let updated = self
            .cards
            .update_owned(&request.card_id, &user.id(), &patch)
            .await
            .map_err(map_card_error)?
            .ok_or_else(|| Error::update_failed("card was not updated"))?;

        info!(card_id = %updated.id, slug = %updated.slug, "card updated");
        self.invalidate_card_views(&user, &updated).await;
        Ok(updated)
    }

    async fn delete(&self, request: DeleteCardRequest) -> Result<(), Error> {
        let user = resolve_acting_user(&self.users, &request.subject).await?;
        let card = self
            .fetch_owned_card(&request.card_id, &user, "delete")
            .await?;

        let removed = self
            .cards
            .delete_owned(&request.card_id, &user.id())
            .await
            .map_err(map_card_error)?;
        if removed == 0 {
            return Err(Error::delete_failed("card was not deleted"));
        }

        info!(card_id = %card.id, slug = %card.slug, "card deleted");
        self.invalidate_card_views(&user, &card).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "card_mutation_service_tests.rs"]
mod tests;
