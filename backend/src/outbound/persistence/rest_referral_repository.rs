//! Referral and click repository backed by the hosted data store's REST
//! API. Click counts are derived with an embedded `clicks(count)`
//! aggregate, never stored denormalised.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{ReferralPersistenceError, ReferralRepository};
use crate::domain::{Click, Referral, ReferralWithClicks};

use super::rest_store::{RestStore, StoreError};
use super::rows::{ClickRow, ReferralRow, ReferralWithClicksRow};

const TABLE: &str = "referrals";
const CLICKS_TABLE: &str = "clicks";

fn map_store_error(error: StoreError) -> ReferralPersistenceError {
    match error {
        StoreError::Unreachable(message) => ReferralPersistenceError::connection(message),
        StoreError::Conflict(message) | StoreError::Decode(message) => {
            ReferralPersistenceError::query(message)
        }
        StoreError::Status { status, body } => {
            ReferralPersistenceError::query(format!("{status}: {body}"))
        }
    }
}

/// REST-backed [`ReferralRepository`].
#[derive(Debug, Clone)]
pub struct RestReferralRepository {
    store: RestStore,
}

impl RestReferralRepository {
    pub fn new(store: RestStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReferralRepository for RestReferralRepository {
    async fn insert(&self, referral: &Referral) -> Result<Referral, ReferralPersistenceError> {
        let row: ReferralRow = self
            .store
            .insert(TABLE, &ReferralRow::from(referral))
            .await
            .map_err(map_store_error)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Referral>, ReferralPersistenceError> {
        let mut rows: Vec<ReferralRow> = self
            .store
            .select(
                TABLE,
                &[("id", format!("eq.{id}")), ("limit", "1".to_owned())],
            )
            .await
            .map_err(map_store_error)?;
        Ok(rows.pop().map(Into::into))
    }

    async fn list_for_card(
        &self,
        card_id: &Uuid,
    ) -> Result<Vec<ReferralWithClicks>, ReferralPersistenceError> {
        let rows: Vec<ReferralWithClicksRow> = self
            .store
            .select(
                TABLE,
                &[
                    ("card_id", format!("eq.{card_id}")),
                    ("select", "*,clicks(count)".to_owned()),
                    ("order", "created_at.desc".to_owned()),
                ],
            )
            .await
            .map_err(map_store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_owned(
        &self,
        id: &Uuid,
        owner: &Uuid,
    ) -> Result<u64, ReferralPersistenceError> {
        self.store
            .delete(
                TABLE,
                &[
                    ("id", format!("eq.{id}")),
                    ("user_id", format!("eq.{owner}")),
                ],
            )
            .await
            .map_err(map_store_error)
    }

    async fn record_click(&self, click: &Click) -> Result<(), ReferralPersistenceError> {
        let _stored: ClickRow = self
            .store
            .insert(CLICKS_TABLE, &ClickRow::from(click))
            .await
            .map_err(map_store_error)?;
        Ok(())
    }
}
