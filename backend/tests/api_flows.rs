//! End-to-end API flows over the in-memory store.
//!
//! These tests wire the real services and the real HTTP adapter, swapping
//! only the persistence backend, so they cover the full
//! submit/moderate/refer lifecycle the way a deployment runs it.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::json;
use std::sync::Arc;

use backend::domain::{SubjectId, User};
use backend::outbound::persistence::InMemoryStore;
use backend::server::{configure_api, memory_state};

const SUBJECT_HEADER: &str = "X-Auth-Subject";
const NAME_HEADER: &str = "X-Auth-Name";
const EMAIL_HEADER: &str = "X-Auth-Email";

async fn spawn_app() -> (
    impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    Arc<InMemoryStore>,
) {
    let (state, store) = memory_state();
    let app = test::init_service(
        App::new().configure(|cfg| configure_api(cfg, state.clone())),
    )
    .await;
    (app, store)
}

fn identified(request: test::TestRequest, subject: &str) -> test::TestRequest {
    request
        .insert_header((SUBJECT_HEADER, subject.to_owned()))
        .insert_header((NAME_HEADER, "Ada"))
        .insert_header((EMAIL_HEADER, format!("{subject}@b.example")))
}

fn card_payload(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "bank": "Chase",
        "category": "travel",
        "eligibility": "salaried",
        "benefits": "b".repeat(60),
        "referralUrl": "https://referral.example/chase",
        "joiningFee": 95.0,
        "annualFee": 0.0,
        "description": "  solid travel card  ",
    })
}

async fn sign_in<S>(app: &S, subject: &str)
where
    S: Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let request = identified(test::TestRequest::post().uri("/api/v1/session"), subject);
    let response = test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn submit_card<S>(app: &S, subject: &str, name: &str) -> serde_json::Value
where
    S: Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let request = identified(test::TestRequest::post().uri("/api/v1/cards"), subject)
        .set_json(card_payload(name));
    let response = test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    test::read_body_json(response).await
}

fn seed_admin(store: &InMemoryStore, subject: &str) {
    let subject = SubjectId::new(subject).expect("valid subject");
    let admin = User::register(subject, Some("Root".to_owned()), "root@b.example")
        .expect("valid user")
        .with_admin(true);
    store.seed_user(admin);
}

#[actix_web::test]
async fn submission_lands_in_the_moderation_queue() {
    let (app, _store) = spawn_app().await;
    sign_in(&app, "uid-1").await;

    let card = submit_card(&app, "uid-1", "Chase Sapphire Preferred").await;
    assert_eq!(
        card.get("slug").and_then(|v| v.as_str()),
        Some("chase-sapphire-preferred"),
    );
    assert_eq!(card.get("status").and_then(|v| v.as_str()), Some("pending"));
    assert_eq!(
        card.get("description").and_then(|v| v.as_str()),
        Some("solid travel card"),
    );

    // Pending cards are invisible in the public listing.
    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/cards").to_request(),
    )
    .await;
    let listing: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(listing.as_array().map(Vec::len), Some(0));

    // But visible to the submitter.
    let request = identified(test::TestRequest::get().uri("/api/v1/me/cards"), "uid-1");
    let response = test::call_service(&app, request.to_request()).await;
    let own: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(own.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn name_collisions_get_numbered_slugs() {
    let (app, _store) = spawn_app().await;
    sign_in(&app, "uid-1").await;
    sign_in(&app, "uid-2").await;

    let first = submit_card(&app, "uid-1", "Chase Sapphire Preferred").await;
    let second = submit_card(&app, "uid-2", "Chase Sapphire Preferred").await;

    assert_eq!(
        first.get("slug").and_then(|v| v.as_str()),
        Some("chase-sapphire-preferred"),
    );
    assert_eq!(
        second.get("slug").and_then(|v| v.as_str()),
        Some("chase-sapphire-preferred-2"),
    );
}

#[actix_web::test]
async fn approval_publishes_the_card() {
    let (app, store) = spawn_app().await;
    seed_admin(&store, "admin-1");
    sign_in(&app, "uid-1").await;
    let card = submit_card(&app, "uid-1", "Chase Sapphire Preferred").await;
    let card_id = card.get("id").and_then(|v| v.as_str()).expect("card id");

    let request = identified(
        test::TestRequest::get().uri("/api/v1/admin/cards/pending"),
        "admin-1",
    );
    let response = test::call_service(&app, request.to_request()).await;
    let queue: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(queue.as_array().map(Vec::len), Some(1));

    let request = identified(
        test::TestRequest::post().uri(&format!("/api/v1/admin/cards/{card_id}/approve")),
        "admin-1",
    );
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/cards").to_request(),
    )
    .await;
    let listing: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(listing.as_array().map(Vec::len), Some(1));

    // Approval is terminal: rejecting afterwards conflicts.
    let request = identified(
        test::TestRequest::post().uri(&format!("/api/v1/admin/cards/{card_id}/reject")),
        "admin-1",
    );
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn moderation_is_admin_only() {
    let (app, _store) = spawn_app().await;
    sign_in(&app, "uid-1").await;

    let request = identified(
        test::TestRequest::get().uri("/api/v1/admin/cards/pending"),
        "uid-1",
    );
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn only_the_owner_can_edit_a_card() {
    let (app, _store) = spawn_app().await;
    sign_in(&app, "uid-1").await;
    sign_in(&app, "uid-2").await;
    let card = submit_card(&app, "uid-1", "Chase Sapphire Preferred").await;
    let card_id = card.get("id").and_then(|v| v.as_str()).expect("card id");

    let request = identified(
        test::TestRequest::put().uri(&format!("/api/v1/cards/{card_id}")),
        "uid-2",
    )
    .set_json(card_payload("Stolen Card"));
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can, and the slug survives the rename.
    let request = identified(
        test::TestRequest::put().uri(&format!("/api/v1/cards/{card_id}")),
        "uid-1",
    )
    .set_json(card_payload("Chase Sapphire Reserve"));
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(
        updated.get("slug").and_then(|v| v.as_str()),
        Some("chase-sapphire-preferred"),
    );
}

#[actix_web::test]
async fn referrals_collect_clicks_and_die_with_their_card() {
    let (app, _store) = spawn_app().await;
    sign_in(&app, "uid-1").await;
    let card = submit_card(&app, "uid-1", "Chase Sapphire Preferred").await;
    let card_id = card.get("id").and_then(|v| v.as_str()).expect("card id");

    let request = identified(
        test::TestRequest::post().uri(&format!("/api/v1/cards/{card_id}/referrals")),
        "uid-1",
    )
    .set_json(json!({ "referralUrl": "https://referral.example/mine" }));
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let referral: serde_json::Value = test::read_body_json(response).await;
    let referral_id = referral.get("id").and_then(|v| v.as_str()).expect("id");

    for _ in 0..2 {
        let request =
            test::TestRequest::post().uri(&format!("/api/v1/referrals/{referral_id}/clicks"));
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/cards/{card_id}/referrals"))
            .to_request(),
    )
    .await;
    let listed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(listed.pointer("/0/clickCount").and_then(|v| v.as_u64()), Some(2));

    // Deleting the card takes the referral with it.
    let request = identified(
        test::TestRequest::delete().uri(&format!("/api/v1/cards/{card_id}")),
        "uid-1",
    );
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/cards/{card_id}/referrals"))
            .to_request(),
    )
    .await;
    let listed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn invalid_submissions_report_field_errors() {
    let (app, _store) = spawn_app().await;
    sign_in(&app, "uid-1").await;

    let mut payload = card_payload("ab");
    payload["benefits"] = json!("too short");
    payload["referralUrl"] = json!("ftp://nope");
    let request =
        identified(test::TestRequest::post().uri("/api/v1/cards"), "uid-1").set_json(payload);
    let response = test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(|v| v.as_str()),
        Some("validation_failed"),
    );
    let details = body.get("details").expect("details present");
    assert!(details.get("name").is_some());
    assert!(details.get("benefits").is_some());
    assert!(details.get("referralUrl").is_some());
}

#[actix_web::test]
async fn seed_cleanup_removes_ownerless_approved_cards() {
    let (app, store) = spawn_app().await;
    seed_admin(&store, "admin-1");
    sign_in(&app, "uid-1").await;

    // An owned approved card and an ownerless one.
    let owned = submit_card(&app, "uid-1", "Owned Card Name").await;
    let owned_id = owned.get("id").and_then(|v| v.as_str()).expect("id");
    let request = identified(
        test::TestRequest::post().uri(&format!("/api/v1/admin/cards/{owned_id}/approve")),
        "admin-1",
    );
    test::call_service(&app, request.to_request()).await;

    let mut seed = backend::domain::Card {
        id: uuid::Uuid::new_v4(),
        name: "Seed Card".to_owned(),
        slug: backend::domain::Slug::new("seed-card").expect("valid slug"),
        bank: "Seed Bank".to_owned(),
        category: "cashback".to_owned(),
        eligibility: "anyone".to_owned(),
        benefits: "b".repeat(60),
        referral_url: "https://referral.example/seed".to_owned(),
        joining_fee: 0,
        annual_fee: 0,
        description: None,
        image_url: backend::domain::PLACEHOLDER_IMAGE.to_owned(),
        status: backend::domain::CardStatus::Pending,
        submitted_by: None,
        created_at: chrono::Utc::now(),
    };
    seed.status = backend::domain::CardStatus::Approved;
    store.seed_card(seed);

    let request = identified(
        test::TestRequest::delete().uri("/api/v1/admin/seed-cards"),
        "admin-1",
    );
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(outcome.get("removed").and_then(|v| v.as_u64()), Some(1));

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/cards").to_request(),
    )
    .await;
    let listing: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(listing.as_array().map(Vec::len), Some(1));
}
