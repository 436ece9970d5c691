//! Card data model.
//!
//! A card is a community-submitted credit card with a referral link. Cards
//! carry a URL-safe slug derived from their name and a moderation status;
//! both are controlled by the workflows, never by callers directly.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image reference applied when a submission carries none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300";

/// Validation errors returned by [`Slug::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    /// Slug is empty after trimming.
    #[error("slug must not be empty")]
    Empty,
    /// Slug contains characters outside lowercase letters, digits, hyphens.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacters,
    /// Slug starts or ends with a hyphen.
    #[error("slug must not start or end with a hyphen")]
    EdgeHyphen,
}

/// URL-safe unique identifier derived from the card name.
///
/// ## Invariants
/// - Non-empty, lowercase ASCII letters, digits, and interior hyphens only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a [`Slug`].
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SlugValidationError::Empty);
        }
        if !value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
        {
            return Err(SlugValidationError::InvalidCharacters);
        }
        if value.starts_with('-') || value.ends_with('-') {
            return Err(SlugValidationError::EdgeHyphen);
        }
        Ok(Self(value))
    }

    /// Borrow the slug as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Moderation lifecycle status.
///
/// New submissions start [`CardStatus::Pending`]; administrators move them
/// to [`CardStatus::Approved`] or [`CardStatus::Rejected`]. Neither terminal
/// state transitions to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Pending,
    Approved,
    Rejected,
}

impl CardStatus {
    /// Stable string form used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown card status: {0}")]
pub struct ParseCardStatusError(pub String);

impl FromStr for CardStatus {
    type Err = ParseCardStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseCardStatusError(other.to_owned())),
        }
    }
}

/// Raw submission fields as collected from the caller.
///
/// Nothing here is trusted: the validation engine checks every field and
/// the submission workflow trims and coerces values before persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardFields {
    pub name: String,
    pub bank: String,
    pub category: String,
    pub eligibility: String,
    pub benefits: String,
    pub referral_url: String,
    pub joining_fee: Option<f64>,
    pub annual_fee: Option<f64>,
    pub description: Option<String>,
}

impl CardFields {
    /// Coerce a fee value the way the workflows persist it: absent or
    /// unusable values become zero, negatives are clamped to zero.
    pub fn coerce_fee(fee: Option<f64>) -> i64 {
        match fee {
            Some(value) if value.is_finite() && value > 0.0 => value.round() as i64,
            _ => 0,
        }
    }
}

/// Persisted card record.
///
/// ## Invariants
/// - `slug` is unique across all cards (persistence-enforced) and is never
///   regenerated after creation, including on rename.
/// - `submitted_by` is immutable once set; `None` marks seed data owned by
///   nobody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub name: String,
    pub slug: Slug,
    pub bank: String,
    pub category: String,
    pub eligibility: String,
    pub benefits: String,
    pub referral_url: String,
    pub joining_fee: i64,
    pub annual_fee: i64,
    pub description: Option<String>,
    pub image_url: String,
    pub status: CardStatus,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Whether `user_id` owns this card. Seed data (`submitted_by` = None)
    /// is owned by nobody, so this is always `false` for it.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.submitted_by == Some(user_id)
    }
}
