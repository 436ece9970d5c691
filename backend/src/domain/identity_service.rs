//! Identity bridge implementation.
//!
//! Maps an external identity-provider subject to a local user, creating the
//! record on first sight. First-time resolution has a check-then-act shape,
//! so a lost insert race against the subject uniqueness constraint is
//! resolved by re-fetching the row the winner created.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{IdentityBridge, IdentityClaims, UserPersistenceError, UserRepository};
use crate::domain::{Error, SubjectId, User};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::transient(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateSubject { message } => {
            // Callers handle the duplicate path before mapping; reaching this
            // arm means the race resolution itself failed.
            Error::internal(format!("unexpected duplicate subject: {message}"))
        }
    }
}

/// Identity bridge backed by a user repository.
#[derive(Clone)]
pub struct IdentityBridgeService<R> {
    users: Arc<R>,
}

impl<R> IdentityBridgeService<R> {
    /// Create a new bridge over the user repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

impl<R> IdentityBridgeService<R>
where
    R: UserRepository,
{
    async fn handle_duplicate_subject(&self, subject: &SubjectId) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_subject(subject)
            .await
            .map_err(map_repository_error)?;

        existing.ok_or_else(|| {
            Error::internal("user record disappeared during race resolution")
        })
    }
}

#[async_trait]
impl<R> IdentityBridge for IdentityBridgeService<R>
where
    R: UserRepository,
{
    async fn resolve(&self, claims: IdentityClaims) -> Result<User, Error> {
        let subject = SubjectId::new(claims.subject)
            .map_err(|err| Error::authentication_required(err.to_string()))?;
        if claims.email.trim().is_empty() {
            return Err(Error::authentication_required("email must not be empty"));
        }

        if let Some(existing) = self
            .users
            .find_by_subject(&subject)
            .await
            .map_err(map_repository_error)?
        {
            // Idempotent: repeat resolutions never update name or email.
            return Ok(existing);
        }

        let user = User::register(subject.clone(), claims.name, claims.email)
            .map_err(|err| Error::authentication_required(err.to_string()))?;

        match self.users.insert(&user).await {
            Ok(created) => {
                info!(user_id = %created.id(), "registered first-time user");
                Ok(created)
            }
            Err(UserPersistenceError::DuplicateSubject { .. }) => {
                self.handle_duplicate_subject(&subject).await
            }
            Err(err) => Err(map_repository_error(err)),
        }
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
