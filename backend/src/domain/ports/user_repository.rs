//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{SubjectId, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user repository query failed: {message}",
        /// Insert violated the subject-id uniqueness constraint; another
        /// request created the user first. Resolve by re-fetching.
        DuplicateSubject => "user subject already registered: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by external subject id.
    async fn find_by_subject(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by local id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user record, returning the persisted row.
    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError>;
}
