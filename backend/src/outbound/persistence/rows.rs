//! Wire rows exchanged with the hosted data store's REST API.
//!
//! Rows use the store's snake_case column names and loose string types;
//! conversion into domain types revalidates every invariant so a corrupted
//! row surfaces as a decode error instead of a bad domain value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::card::{Card, CardStatus, Slug};
use crate::domain::{Click, Referral, ReferralWithClicks, SubjectId, User};

/// Error raised when a stored row violates a domain invariant.
#[derive(Debug, Clone, thiserror::Error)]
#[error("stored row failed validation: {0}")]
pub struct RowDecodeError(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub subject_id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            subject_id: user.subject_id().as_str().to_owned(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            is_admin: user.is_admin(),
            created_at: user.created_at(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RowDecodeError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let subject = SubjectId::new(row.subject_id).map_err(|e| RowDecodeError(e.to_string()))?;
        Ok(User::from_parts(
            row.id,
            subject,
            row.name,
            row.email,
            row.is_admin,
            row.created_at,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub bank: String,
    pub category: String,
    pub eligibility: String,
    pub benefits: String,
    pub referral_url: String,
    pub joining_fee: i64,
    pub annual_fee: i64,
    pub description: Option<String>,
    pub image_url: String,
    pub status: String,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&Card> for CardRow {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            name: card.name.clone(),
            slug: card.slug.as_str().to_owned(),
            bank: card.bank.clone(),
            category: card.category.clone(),
            eligibility: card.eligibility.clone(),
            benefits: card.benefits.clone(),
            referral_url: card.referral_url.clone(),
            joining_fee: card.joining_fee,
            annual_fee: card.annual_fee,
            description: card.description.clone(),
            image_url: card.image_url.clone(),
            status: card.status.as_str().to_owned(),
            submitted_by: card.submitted_by,
            created_at: card.created_at,
        }
    }
}

impl TryFrom<CardRow> for Card {
    type Error = RowDecodeError;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let slug = Slug::new(row.slug).map_err(|e| RowDecodeError(e.to_string()))?;
        let status = row
            .status
            .parse::<CardStatus>()
            .map_err(|e| RowDecodeError(e.to_string()))?;
        Ok(Card {
            id: row.id,
            name: row.name,
            slug,
            bank: row.bank,
            category: row.category,
            eligibility: row.eligibility,
            benefits: row.benefits,
            referral_url: row.referral_url,
            joining_fee: row.joining_fee,
            annual_fee: row.annual_fee,
            description: row.description,
            image_url: row.image_url,
            status,
            submitted_by: row.submitted_by,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub referral_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Referral> for ReferralRow {
    fn from(referral: &Referral) -> Self {
        Self {
            id: referral.id,
            user_id: referral.user_id,
            card_id: referral.card_id,
            referral_url: referral.referral_url.clone(),
            description: referral.description.clone(),
            created_at: referral.created_at,
        }
    }
}

impl From<ReferralRow> for Referral {
    fn from(row: ReferralRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            card_id: row.card_id,
            referral_url: row.referral_url,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickRow {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Click> for ClickRow {
    fn from(click: &Click) -> Self {
        Self {
            id: click.id,
            referral_id: click.referral_id,
            user_agent: click.user_agent.clone(),
            ip_address: click.ip_address.clone(),
            created_at: click.created_at,
        }
    }
}

/// Aggregate count embedded by the store's `clicks(count)` selection.
#[derive(Debug, Clone, Deserialize)]
pub struct ClickCountRow {
    pub count: u64,
}

/// Referral row with its embedded click count aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferralWithClicksRow {
    #[serde(flatten)]
    pub referral: ReferralRow,
    #[serde(default)]
    pub clicks: Vec<ClickCountRow>,
}

impl From<ReferralWithClicksRow> for ReferralWithClicks {
    fn from(row: ReferralWithClicksRow) -> Self {
        let click_count = row.clicks.first().map_or(0, |c| c.count);
        Self {
            referral: row.referral.into(),
            click_count,
        }
    }
}
