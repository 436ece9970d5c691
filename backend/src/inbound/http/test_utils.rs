//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::card::{Card, CardStatus, PLACEHOLDER_IMAGE, Slug};
use crate::domain::ports::{
    MockCardMutation, MockCardQuery, MockCardSubmission, MockIdentityBridge, MockModeration,
    MockReferralCommand,
};
use crate::domain::validation::BENEFITS_MIN;
use crate::inbound::http::state::HttpState;

/// A state bundle whose ports panic on any unexpected call.
pub fn mock_state() -> HttpState {
    HttpState {
        identity: Arc::new(MockIdentityBridge::new()),
        submissions: Arc::new(MockCardSubmission::new()),
        mutations: Arc::new(MockCardMutation::new()),
        moderation: Arc::new(MockModeration::new()),
        referrals: Arc::new(MockReferralCommand::new()),
        queries: Arc::new(MockCardQuery::new()),
    }
}

/// A fully-populated card for response fixtures.
pub fn sample_card(status: CardStatus) -> Card {
    Card {
        id: Uuid::new_v4(),
        name: "Chase Sapphire Preferred".to_owned(),
        slug: Slug::new("chase-sapphire-preferred").expect("valid slug"),
        bank: "Chase".to_owned(),
        category: "travel".to_owned(),
        eligibility: "salaried".to_owned(),
        benefits: "b".repeat(BENEFITS_MIN),
        referral_url: "https://referral.example/chase".to_owned(),
        joining_fee: 95,
        annual_fee: 0,
        description: None,
        image_url: PLACEHOLDER_IMAGE.to_owned(),
        status,
        submitted_by: Some(Uuid::new_v4()),
        created_at: Utc::now(),
    }
}
