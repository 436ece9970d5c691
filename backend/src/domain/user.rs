//! User data model.
//!
//! Users are created by the identity bridge on first sight of an external
//! subject and are never deleted by the application. The administrator flag
//! is set out-of-band and is forced to `false` on registration.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`User::register`] and the id newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptySubject,
    PaddedSubject,
    EmptyEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySubject => write!(f, "identity subject must not be empty"),
            Self::PaddedSubject => {
                write!(f, "identity subject must not contain surrounding whitespace")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque identifier issued by the external identity provider.
///
/// Subjects are trimmed, non-empty strings; the application attaches no
/// further structure to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Validate and construct a [`SubjectId`].
    pub fn new(subject: impl Into<String>) -> Result<Self, UserValidationError> {
        let subject = subject.into();
        if subject.is_empty() {
            return Err(UserValidationError::EmptySubject);
        }
        if subject.trim() != subject {
            return Err(UserValidationError::PaddedSubject);
        }
        Ok(Self(subject))
    }

    /// Borrow the underlying subject string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name used when the identity provider supplies none.
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Application user.
///
/// ## Invariants
/// - `subject_id` is trimmed and non-empty, and is unique across users at
///   the persistence layer.
/// - `email` is non-empty.
/// - `is_admin` is `false` for every user created through the identity
///   bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct User {
    id: Uuid,
    subject_id: SubjectId,
    name: String,
    email: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build the user record created on first identity-bridge resolution.
    ///
    /// A missing or blank display name falls back to
    /// [`DEFAULT_DISPLAY_NAME`]; the administrator flag is always `false`.
    pub fn register(
        subject_id: SubjectId,
        name: Option<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let name = name
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_owned());

        Ok(Self {
            id: Uuid::new_v4(),
            subject_id,
            name,
            email,
            is_admin: false,
            created_at: Utc::now(),
        })
    }

    /// Rehydrate a user from persisted parts without re-validation side
    /// effects such as id generation.
    pub fn from_parts(
        id: Uuid,
        subject_id: SubjectId,
        name: String,
        email: String,
        is_admin: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject_id,
            name,
            email,
            is_admin,
            created_at,
        }
    }

    /// Stable local identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// External identity-provider subject.
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    /// Display name shown to other users.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact email supplied by the identity provider.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Whether this user may run moderation operations.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Grant moderation rights. Only adapters that mirror the out-of-band
    /// administrator flag may call this.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for subject validation and registration defaults.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    fn subject_rejects_empty(#[case] value: &str) {
        let err = SubjectId::new(value).expect_err("empty subject rejected");
        assert_eq!(err, UserValidationError::EmptySubject);
    }

    #[rstest]
    #[case(" uid-1")]
    #[case("uid-1 ")]
    fn subject_rejects_padding(#[case] value: &str) {
        let err = SubjectId::new(value).expect_err("padded subject rejected");
        assert_eq!(err, UserValidationError::PaddedSubject);
    }

    #[test]
    fn register_defaults_blank_name_to_anonymous() {
        let subject = SubjectId::new("uid-1").expect("valid subject");
        let user = User::register(subject, Some("   ".to_owned()), "a@b.example")
            .expect("valid registration");
        assert_eq!(user.name(), DEFAULT_DISPLAY_NAME);
        assert!(!user.is_admin());
    }

    #[test]
    fn register_rejects_blank_email() {
        let subject = SubjectId::new("uid-1").expect("valid subject");
        let err = User::register(subject, None, "  ").expect_err("blank email rejected");
        assert_eq!(err, UserValidationError::EmptyEmail);
    }

    #[test]
    fn register_keeps_supplied_name() {
        let subject = SubjectId::new("uid-2").expect("valid subject");
        let user =
            User::register(subject, Some("Ada".to_owned()), "ada@b.example").expect("valid");
        assert_eq!(user.name(), "Ada");
    }
}
