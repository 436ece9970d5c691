//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::validation::FieldErrors;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// One or more submission fields failed validation; `details` carries
    /// the field-to-message map.
    ValidationFailed,
    /// The caller supplied no usable identity claims.
    AuthenticationRequired,
    /// No local user exists for the presented subject.
    UserNotFound,
    /// The target card does not exist.
    CardNotFound,
    /// The target referral does not exist.
    ReferralNotFound,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The persistence layer rejected an insert because the slug is taken.
    DuplicateSlug,
    /// Slug allocation aborted on a persistence failure.
    SlugValidationFailed,
    /// A just-persisted record could not be read back.
    VerificationFailed,
    /// An update affected no rows or failed outright.
    UpdateFailed,
    /// A delete affected no rows or failed outright.
    DeleteFailed,
    /// A network or timeout failure; the caller may retry once.
    TransientError,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::card_not_found("no card with id 7");
/// assert_eq!(err.code(), ErrorCode::CardNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    #[schema(example = "validation_failed")]
    code: ErrorCode,
    #[schema(example = "Something went wrong")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Build a [`ErrorCode::ValidationFailed`] error carrying per-field
    /// messages in `details`.
    pub fn validation_failed(field_errors: &FieldErrors) -> Self {
        let details = serde_json::to_value(field_errors).unwrap_or(Value::Null);
        Self::new(ErrorCode::ValidationFailed, "submission failed validation")
            .with_details(details)
    }

    /// Convenience constructor for [`ErrorCode::AuthenticationRequired`].
    pub fn authentication_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthenticationRequired, message)
    }

    /// Convenience constructor for [`ErrorCode::UserNotFound`].
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::CardNotFound`].
    pub fn card_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CardNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ReferralNotFound`].
    pub fn referral_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReferralNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateSlug`].
    pub fn duplicate_slug(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateSlug, message)
    }

    /// Convenience constructor for [`ErrorCode::SlugValidationFailed`].
    pub fn slug_validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SlugValidationFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::VerificationFailed`].
    pub fn verification_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::VerificationFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::UpdateFailed`].
    pub fn update_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpdateFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::DeleteFailed`].
    pub fn delete_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeleteFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::TransientError`].
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransientError, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}
