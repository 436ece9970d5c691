//! Card repository backed by the hosted data store's REST API.
//!
//! Ownership-gated writes express the owner predicate as a filter on the
//! write itself, so a row that changed hands between check and write simply
//! matches nothing.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::card::{Card, CardStatus, Slug};
use crate::domain::ports::{CardPatch, CardPersistenceError, CardRepository};

use super::rest_store::{RestStore, StoreError};
use super::rows::CardRow;

const TABLE: &str = "cards";

fn map_store_error(error: StoreError) -> CardPersistenceError {
    match error {
        StoreError::Unreachable(message) => CardPersistenceError::connection(message),
        StoreError::Conflict(message) => CardPersistenceError::duplicate_slug(message),
        StoreError::Status { status, body } => {
            CardPersistenceError::query(format!("{status}: {body}"))
        }
        StoreError::Decode(message) => CardPersistenceError::query(message),
    }
}

fn decode(row: CardRow) -> Result<Card, CardPersistenceError> {
    Card::try_from(row).map_err(|e| CardPersistenceError::query(e.to_string()))
}

/// Mutable columns sent by the ownership-gated update.
#[derive(Debug, Serialize)]
struct CardPatchBody<'a> {
    name: &'a str,
    bank: &'a str,
    category: &'a str,
    eligibility: &'a str,
    benefits: &'a str,
    referral_url: &'a str,
    joining_fee: i64,
    annual_fee: i64,
    description: Option<&'a str>,
}

impl<'a> From<&'a CardPatch> for CardPatchBody<'a> {
    fn from(patch: &'a CardPatch) -> Self {
        Self {
            name: &patch.name,
            bank: &patch.bank,
            category: &patch.category,
            eligibility: &patch.eligibility,
            benefits: &patch.benefits,
            referral_url: &patch.referral_url,
            joining_fee: patch.joining_fee,
            annual_fee: patch.annual_fee,
            description: patch.description.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

/// REST-backed [`CardRepository`].
#[derive(Debug, Clone)]
pub struct RestCardRepository {
    store: RestStore,
}

impl RestCardRepository {
    pub fn new(store: RestStore) -> Self {
        Self { store }
    }

    async fn find_one(
        &self,
        query: &[(&str, String)],
    ) -> Result<Option<Card>, CardPersistenceError> {
        let mut rows: Vec<CardRow> = self
            .store
            .select(TABLE, query)
            .await
            .map_err(map_store_error)?;
        rows.pop().map(decode).transpose()
    }

    async fn list(&self, query: &[(&str, String)]) -> Result<Vec<Card>, CardPersistenceError> {
        let rows: Vec<CardRow> = self
            .store
            .select(TABLE, query)
            .await
            .map_err(map_store_error)?;
        rows.into_iter().map(decode).collect()
    }
}

#[async_trait]
impl CardRepository for RestCardRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Card>, CardPersistenceError> {
        self.find_one(&[("id", format!("eq.{id}")), ("limit", "1".to_owned())])
            .await
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Card>, CardPersistenceError> {
        self.find_one(&[("slug", format!("eq.{slug}")), ("limit", "1".to_owned())])
            .await
    }

    async fn insert(&self, card: &Card) -> Result<Card, CardPersistenceError> {
        let row: CardRow = self
            .store
            .insert(TABLE, &CardRow::from(card))
            .await
            .map_err(map_store_error)?;
        decode(row)
    }

    async fn update_owned(
        &self,
        id: &Uuid,
        owner: &Uuid,
        patch: &CardPatch,
    ) -> Result<Option<Card>, CardPersistenceError> {
        let mut rows: Vec<CardRow> = self
            .store
            .update(
                TABLE,
                &[
                    ("id", format!("eq.{id}")),
                    ("submitted_by", format!("eq.{owner}")),
                ],
                &CardPatchBody::from(patch),
            )
            .await
            .map_err(map_store_error)?;
        rows.pop().map(decode).transpose()
    }

    async fn delete_owned(&self, id: &Uuid, owner: &Uuid) -> Result<u64, CardPersistenceError> {
        self.store
            .delete(
                TABLE,
                &[
                    ("id", format!("eq.{id}")),
                    ("submitted_by", format!("eq.{owner}")),
                ],
            )
            .await
            .map_err(map_store_error)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: CardStatus,
    ) -> Result<Option<Card>, CardPersistenceError> {
        let mut rows: Vec<CardRow> = self
            .store
            .update(
                TABLE,
                &[("id", format!("eq.{id}"))],
                &StatusBody {
                    status: status.as_str(),
                },
            )
            .await
            .map_err(map_store_error)?;
        rows.pop().map(decode).transpose()
    }

    async fn list_by_status(
        &self,
        status: CardStatus,
    ) -> Result<Vec<Card>, CardPersistenceError> {
        self.list(&[
            ("status", format!("eq.{status}")),
            ("order", "created_at.desc".to_owned()),
        ])
        .await
    }

    async fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<Card>, CardPersistenceError> {
        self.list(&[
            ("submitted_by", format!("eq.{owner}")),
            ("order", "created_at.desc".to_owned()),
        ])
        .await
    }

    async fn delete_unowned_with_status(
        &self,
        status: CardStatus,
    ) -> Result<u64, CardPersistenceError> {
        self.store
            .delete(
                TABLE,
                &[
                    ("status", format!("eq.{status}")),
                    ("submitted_by", "is.null".to_owned()),
                ],
            )
            .await
            .map_err(map_store_error)
    }
}
