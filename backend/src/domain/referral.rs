//! Referral and click data models.
//!
//! A card may carry any number of referrals from any number of users; no
//! uniqueness is imposed per (user, card) pair. Clicks are an append-only
//! event log and a referral's click count is always derived by counting,
//! never stored denormalised.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's referral link attached to a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub referral_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only click event against a referral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read model pairing a referral with its derived click count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralWithClicks {
    #[serde(flatten)]
    pub referral: Referral,
    pub click_count: u64,
}
