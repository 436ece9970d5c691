//! Read models for card listings and detail pages.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::card::{Card, CardStatus, Slug};
use crate::domain::ports::{CardListingFilter, CardQuery, CardRepository, UserRepository};
use crate::domain::submission_service::{map_card_error, resolve_acting_user};
use crate::domain::{Error, SubjectId};

fn matches_filter(card: &Card, filter: &CardListingFilter) -> bool {
    let category_ok = filter
        .category
        .as_deref()
        .is_none_or(|category| card.category.eq_ignore_ascii_case(category));
    let bank_ok = filter
        .bank
        .as_deref()
        .is_none_or(|bank| card.bank.eq_ignore_ascii_case(bank));
    category_ok && bank_ok
}

/// Query workflow backed by user and card repositories.
#[derive(Clone)]
pub struct CardQueryService<U, C> {
    users: Arc<U>,
    cards: Arc<C>,
}

impl<U, C> CardQueryService<U, C> {
    /// Create a new query service.
    pub fn new(users: Arc<U>, cards: Arc<C>) -> Self {
        Self { users, cards }
    }
}

#[async_trait]
impl<U, C> CardQuery for CardQueryService<U, C>
where
    U: UserRepository,
    C: CardRepository,
{
    async fn approved_listing(&self, filter: CardListingFilter) -> Result<Vec<Card>, Error> {
        let cards = self
            .cards
            .list_by_status(CardStatus::Approved)
            .await
            .map_err(map_card_error)?;
        Ok(cards
            .into_iter()
            .filter(|card| matches_filter(card, &filter))
            .collect())
    }

    async fn own_submissions(&self, subject: SubjectId) -> Result<Vec<Card>, Error> {
        let user = resolve_acting_user(&self.users, &subject).await?;
        self.cards
            .list_by_owner(&user.id())
            .await
            .map_err(map_card_error)
    }

    async fn detail_by_slug(&self, slug: Slug) -> Result<Card, Error> {
        self.cards
            .find_by_slug(&slug)
            .await
            .map_err(map_card_error)?
            .ok_or_else(|| Error::card_not_found(format!("card not found: {slug}")))
    }
}

#[cfg(test)]
#[path = "card_query_service_tests.rs"]
mod tests;
