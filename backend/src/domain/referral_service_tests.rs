//! Tests for the referral workflow.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::card::{Card, CardStatus, PLACEHOLDER_IMAGE, Slug};
use crate::domain::ports::{MockCardRepository, MockReferralRepository, MockUserRepository};
use crate::domain::validation::BENEFITS_MIN;
use crate::domain::User;

fn acting_user() -> User {
    let subject = SubjectId::new("uid-1").expect("valid subject");
    User::register(subject, Some("Ada".to_owned()), "ada@b.example").expect("valid user")
}

fn approved_card() -> Card {
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
        status: CardStatus::Approved,
        submitted_by: None,
        created_at: Utc::now(),
    }
}

fn referral_owned_by(user_id: Uuid) -> Referral {
    Referral {
        id: Uuid::new_v4(),
        user_id,
        card_id: Uuid::new_v4(),
        referral_url: "https://referral.example/mine".to_owned(),
        description: None,
        created_at: Utc::now(),
    }
}

fn users_resolving(user: User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_subject()
        .returning(move |_| Ok(Some(user.clone())));
    users
}

fn add_request(card_id: Uuid, url: &str) -> AddReferralRequest {
    AddReferralRequest {
        subject: SubjectId::new("uid-1").expect("valid subject"),
        card_id,
        referral_url: url.to_owned(),
        description: Some("  use my link  ".to_owned()),
    }
}

#[tokio::test]
async fn add_attaches_referral_to_existing_card() {
    let user = acting_user();
    let user_id = user.id();
    let card = approved_card();
    let card_id = card.id;

    let users = users_resolving(user);
    let mut cards = MockCardRepository::new();
    cards
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(card)));
    let mut referrals = MockReferralRepository::new();
    referrals
        .expect_insert()
        .times(1)
        .returning(|referral| Ok(referral.clone()));

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let created = service
        .add(add_request(card_id, " https://referral.example/mine "))
        .await
        .expect("add succeeds");

    assert_eq!(created.user_id, user_id);
    assert_eq!(created.card_id, card_id);
    assert_eq!(created.referral_url, "https://referral.example/mine");
    assert_eq!(created.description.as_deref(), Some("use my link"));
}

#[rstest]
#[case("ftp://referral.example/mine")]
#[case("not a url")]
#[case("")]
#[tokio::test]
async fn add_rejects_invalid_urls(#[case] url: &str) {
    let users = MockUserRepository::new();
    let cards = MockCardRepository::new();
    let referrals = MockReferralRepository::new();

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let err = service
        .add(add_request(Uuid::new_v4(), url))
        .await
        .expect_err("invalid url rejected");

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn add_reports_missing_card() {
    let users = users_resolving(acting_user());
    let mut cards = MockCardRepository::new();
    cards.expect_find_by_id().times(1).returning(|_| Ok(None));
    let mut referrals = MockReferralRepository::new();
    referrals.expect_insert().times(0);

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let err = service
        .add(add_request(Uuid::new_v4(), "https://referral.example/mine"))
        .await
        .expect_err("missing card");

    assert_eq!(err.code(), ErrorCode::CardNotFound);
}

#[tokio::test]
async fn delete_removes_owned_referral() {
    let user = acting_user();
    let referral = referral_owned_by(user.id());
    let referral_id = referral.id;

    let users = users_resolving(user);
    let cards = MockCardRepository::new();
    let mut referrals = MockReferralRepository::new();
    referrals
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(referral)));
    referrals
        .expect_delete_owned()
        .times(1)
        .returning(|_, _| Ok(1));

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    service
        .delete(referral_id, SubjectId::new("uid-1").expect("valid subject"))
        .await
        .expect("delete succeeds");
}

#[tokio::test]
async fn delete_rejects_foreign_referrals() {
    let foreign = referral_owned_by(Uuid::new_v4());
    let referral_id = foreign.id;

    let users = users_resolving(acting_user());
    let cards = MockCardRepository::new();
    let mut referrals = MockReferralRepository::new();
    referrals
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(foreign)));
    referrals.expect_delete_owned().times(0);

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let err = service
        .delete(referral_id, SubjectId::new("uid-1").expect("valid subject"))
        .await
        .expect_err("foreign referral rejected");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn delete_reports_missing_referral() {
    let users = users_resolving(acting_user());
    let cards = MockCardRepository::new();
    let mut referrals = MockReferralRepository::new();
    referrals.expect_find_by_id().times(1).returning(|_| Ok(None));

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let err = service
        .delete(
            Uuid::new_v4(),
            SubjectId::new("uid-1").expect("valid subject"),
        )
        .await
        .expect_err("missing referral");

    assert_eq!(err.code(), ErrorCode::ReferralNotFound);
}

#[tokio::test]
async fn delete_maps_zero_affected_rows_to_delete_failed() {
    let user = acting_user();
    let referral = referral_owned_by(user.id());
    let referral_id = referral.id;

    let users = users_resolving(user);
    let cards = MockCardRepository::new();
    let mut referrals = MockReferralRepository::new();
    referrals
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(referral)));
    referrals
        .expect_delete_owned()
        .times(1)
        .returning(|_, _| Ok(0));

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let err = service
        .delete(referral_id, SubjectId::new("uid-1").expect("valid subject"))
        .await
        .expect_err("lost delete surfaces");

    assert_eq!(err.code(), ErrorCode::DeleteFailed);
}

#[tokio::test]
async fn record_click_appends_event() {
    let users = MockUserRepository::new();
    let cards = MockCardRepository::new();
    let referral_id = Uuid::new_v4();
    let mut referrals = MockReferralRepository::new();
    referrals
        .expect_record_click()
        .times(1)
        .returning(move |click| {
            assert_eq!(click.referral_id, referral_id);
            assert_eq!(click.user_agent.as_deref(), Some("test-agent"));
            Ok(())
        });

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    service
        .record_click(RecordClickRequest {
            referral_id,
            user_agent: Some("test-agent".to_owned()),
            ip_address: None,
        })
        .await
        .expect("click recorded");
}

#[tokio::test]
async fn list_for_card_returns_derived_counts() {
    let users = MockUserRepository::new();
    let cards = MockCardRepository::new();
    let mut referrals = MockReferralRepository::new();
    referrals.expect_list_for_card().times(1).returning(|_| {
        Ok(vec![ReferralWithClicks {
            referral: referral_owned_by(Uuid::new_v4()),
            click_count: 7,
        }])
    });

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let listed = service
        .list_for_card(Uuid::new_v4())
        .await
        .expect("list succeeds");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].click_count, 7);
}

#[tokio::test]
async fn connection_failures_surface_as_transient() {
    let users = MockUserRepository::new();
    let cards = MockCardRepository::new();
    let mut referrals = MockReferralRepository::new();
    referrals
        .expect_list_for_card()
        .times(1)
        .returning(|_| Err(ReferralPersistenceError::connection("timed out")));

    let service = ReferralService::new(Arc::new(users), Arc::new(cards), Arc::new(referrals));
    let err = service
        .list_for_card(Uuid::new_v4())
        .await
        .expect_err("connection failure surfaces");

    assert_eq!(err.code(), ErrorCode::TransientError);
}
