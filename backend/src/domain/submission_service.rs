//! Card submission orchestration.
//!
//! The create path: validate fields, resolve the acting user, allocate a
//! slug, persist with status `pending`, verify the write by reading the
//! record back, and invalidate affected listing views.
//!
//! Slug allocation is a best-effort pre-check; the authority of record is
//! the slug uniqueness constraint at the persistence layer. When an insert
//! loses the slug race it is retried once with a freshly allocated
//! candidate, and a second loss surfaces as `DuplicateSlug`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::card::{Card, CardFields, CardStatus, PLACEHOLDER_IMAGE, Slug};
use crate::domain::ports::{
    CardPersistenceError, CardRepository, CardSubmission, ListingCache, ListingView,
    SubmitCardRequest, UserPersistenceError, UserRepository,
};
use crate::domain::slug::{numbered_candidate, slugify};
use crate::domain::validation::validate_submission;
use crate::domain::{Error, User};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::transient(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateSubject { message } => {
            Error::internal(format!("unexpected duplicate subject: {message}"))
        }
    }
}

pub(crate) fn map_card_error(error: CardPersistenceError) -> Error {
    match error {
        CardPersistenceError::Connection { message } => {
            Error::transient(format!("card repository unavailable: {message}"))
        }
        CardPersistenceError::Query { message } => {
            Error::internal(format!("card repository error: {message}"))
        }
        CardPersistenceError::DuplicateSlug { message } => Error::duplicate_slug(message),
    }
}

/// Resolve the acting user by subject, failing with `UserNotFound` when the
/// identity bridge has never seen them.
pub(crate) async fn resolve_acting_user<U>(
    users: &Arc<U>,
    subject: &crate::domain::SubjectId,
) -> Result<User, Error>
where
    U: UserRepository,
{
    users
        .find_by_subject(subject)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::user_not_found("user not found, please sign in again"))
}

/// Invalidate a set of listing views, logging failures without failing the
/// workflow: the mutation has already committed.
pub(crate) async fn invalidate_views<L>(cache: &Arc<L>, views: &[ListingView])
where
    L: ListingCache,
{
    for view in views {
        if let Err(err) = cache.invalidate(view).await {
            warn!(view = %view.key(), error = %err, "listing invalidation failed");
        }
    }
}

/// Submission workflow backed by user and card repositories.
#[derive(Clone)]
pub struct CardSubmissionService<U, C, L> {
    users: Arc<U>,
    cards: Arc<C>,
    cache: Arc<L>,
}

impl<U, C, L> CardSubmissionService<U, C, L> {
    /// Create a new submission service.
    pub fn new(users: Arc<U>, cards: Arc<C>, cache: Arc<L>) -> Self {
        Self { users, cards, cache }
    }
}

impl<U, C, L> CardSubmissionService<U, C, L>
where
    U: UserRepository,
    C: CardRepository,
    L: ListingCache,
{
    /// Best-effort pre-check: walk `base`, `base-2`, `base-3`, ... until a
    /// candidate has no existing row. Any persistence failure aborts with
    /// `SlugValidationFailed`.
    async fn allocate_slug(&self, base: &str) -> Result<Slug, Error> {
        let mut candidate = base.to_owned();
        let mut counter = 1u32;
        loop {
            let slug = Slug::new(candidate.clone())
                .map_err(|err| Error::slug_validation_failed(err.to_string()))?;
            match self.cards.find_by_slug(&slug).await {
                Ok(None) => return Ok(slug),
                Ok(Some(_)) => {
                    counter += 1;
                    candidate = numbered_candidate(base, counter);
                }
                Err(err) => {
                    return Err(Error::slug_validation_failed(format!(
                        "slug availability check failed: {err}"
                    )));
                }
            }
        }
    }

    fn build_card(fields: &CardFields, slug: Slug, owner: Uuid) -> Card {
        Card {
            id: Uuid::new_v4(),
            name: fields.name.trim().to_owned(),
            slug,
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
            image_url: PLACEHOLDER_IMAGE.to_owned(),
            status: CardStatus::Pending,
            submitted_by: Some(owner),
            created_at: Utc::now(),
        }
    }

    /// Insert with one retry after a lost slug race. The retry re-runs the
    /// allocator so it can observe the row that beat us.
    async fn insert_with_slug_retry(&self, mut card: Card, base: &str) -> Result<Card, Error> {
        match self.cards.insert(&card).await {
            Ok(created) => Ok(created),
            Err(CardPersistenceError::DuplicateSlug { .. }) => {
                warn!(slug = %card.slug, "slug race lost, reallocating once");
                card.slug = self.allocate_slug(base).await?;
                self.cards.insert(&card).await.map_err(map_card_error)
            }
            Err(err) => Err(map_card_error(err)),
        }
    }
}

#[async_trait]
impl<U, C, L> CardSubmission for CardSubmissionService<U, C, L>
where
    U: UserRepository,
    C: CardRepository,
    L: ListingCache,
{
    async fn submit(&self, request: SubmitCardRequest) -> Result<Card, Error> {
        let field_errors = validate_submission(&request.fields);
        if !field_errors.is_empty() {
            return Err(Error::validation_failed(&field_errors));
        }

        let user = resolve_acting_user(&self.users, &request.subject).await?;

        let base = slugify(request.fields.name.trim());
        if base.is_empty() {
            return Err(Error::slug_validation_failed(
                "card name yields no usable slug",
            ));
        }
        let slug = self.allocate_slug(&base).await?;

        let card = Self::build_card(&request.fields, slug, user.id());
        let created = self.insert_with_slug_retry(card, &base).await?;

        // Post-write integrity check: the record must be re-readable.
        let verified = self
            .cards
            .find_by_id(&created.id)
            .await
            .map_err(|err| Error::verification_failed(format!("read-back failed: {err}")))?
            .ok_or_else(|| {
                Error::verification_failed("card submission verification failed")
            })?;

        info!(card_id = %verified.id, slug = %verified.slug, "card submitted");
        invalidate_views(
            &self.cache,
            &[ListingView::Home, ListingView::OwnSubmissions(user.id())],
        )
        .await;

        Ok(verified)
    }
}

#[cfg(test)]
#[path = "submission_service_tests.rs"]
mod tests;
