//! User repository backed by the hosted data store's REST API.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{SubjectId, User};

use super::rest_store::{RestStore, StoreError};
use super::rows::UserRow;

const TABLE: &str = "users";

fn map_store_error(error: StoreError) -> UserPersistenceError {
    match error {
        StoreError::Unreachable(message) => UserPersistenceError::connection(message),
        StoreError::Conflict(message) => UserPersistenceError::duplicate_subject(message),
        StoreError::Status { status, body } => {
            UserPersistenceError::query(format!("{status}: {body}"))
        }
        StoreError::Decode(message) => UserPersistenceError::query(message),
    }
}

fn decode(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(|e| UserPersistenceError::query(e.to_string()))
}

/// REST-backed [`UserRepository`].
#[derive(Debug, Clone)]
pub struct RestUserRepository {
    store: RestStore,
}

impl RestUserRepository {
    pub fn new(store: RestStore) -> Self {
        Self { store }
    }

    async fn find_one(
        &self,
        query: &[(&str, String)],
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut rows: Vec<UserRow> = self
            .store
            .select(TABLE, query)
            .await
            .map_err(map_store_error)?;
        rows.pop().map(decode).transpose()
    }
}

#[async_trait]
impl UserRepository for RestUserRepository {
    async fn find_by_subject(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(&[
            ("subject_id", format!("eq.{subject}")),
            ("limit", "1".to_owned()),
        ])
        .await
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(&[("id", format!("eq.{id}")), ("limit", "1".to_owned())])
            .await
    }

    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError> {
        let row: UserRow = self
            .store
            .insert(TABLE, &UserRow::from(user))
            .await
            .map_err(map_store_error)?;
        decode(row)
    }
}
