//! Tests for the identity bridge.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUserRepository;

fn claims(subject: &str) -> IdentityClaims {
    IdentityClaims {
        subject: subject.to_owned(),
        name: Some("Ada".to_owned()),
        email: "ada@b.example".to_owned(),
    }
}

fn stored_user(subject: &str) -> User {
    let subject = SubjectId::new(subject).expect("valid subject");
    User::register(subject, Some("Ada".to_owned()), "ada@b.example").expect("valid user")
}

#[tokio::test]
async fn resolve_returns_existing_user_unchanged() {
    let existing = stored_user("uid-1");
    let expected_id = existing.id();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_subject()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_insert().times(0);

    let bridge = IdentityBridgeService::new(Arc::new(repo));
    let resolved = bridge
        .resolve(IdentityClaims {
            subject: "uid-1".to_owned(),
            name: Some("Different Name".to_owned()),
            email: "other@b.example".to_owned(),
        })
        .await
        .expect("resolution succeeds");

    assert_eq!(resolved.id(), expected_id);
    // Repeat resolution does not overwrite stored profile fields.
    assert_eq!(resolved.name(), "Ada");
}

#[tokio::test]
async fn resolve_creates_user_on_first_sight() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_subject().times(1).return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|user| Ok(user.clone()));

    let bridge = IdentityBridgeService::new(Arc::new(repo));
    let resolved = bridge.resolve(claims("uid-2")).await.expect("created");

    assert_eq!(resolved.subject_id().as_str(), "uid-2");
    assert!(!resolved.is_admin());
}

#[tokio::test]
async fn resolve_requires_subject_and_email() {
    let repo = MockUserRepository::new();
    let bridge = IdentityBridgeService::new(Arc::new(repo));

    let err = bridge
        .resolve(IdentityClaims {
            subject: String::new(),
            name: None,
            email: "a@b.example".to_owned(),
        })
        .await
        .expect_err("missing subject rejected");
    assert_eq!(err.code(), ErrorCode::AuthenticationRequired);

    let repo = MockUserRepository::new();
    let bridge = IdentityBridgeService::new(Arc::new(repo));
    let err = bridge
        .resolve(IdentityClaims {
            subject: "uid-3".to_owned(),
            name: None,
            email: "   ".to_owned(),
        })
        .await
        .expect_err("missing email rejected");
    assert_eq!(err.code(), ErrorCode::AuthenticationRequired);
}

#[tokio::test]
async fn resolve_recovers_from_duplicate_subject_race() {
    let winner = stored_user("uid-4");
    let winner_id = winner.id();

    let mut repo = MockUserRepository::new();
    let mut lookups = 0;
    repo.expect_find_by_subject()
        .times(2)
        .returning(move |_| {
            lookups += 1;
            if lookups == 1 {
                Ok(None)
            } else {
                Ok(Some(winner.clone()))
            }
        });
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_subject("uid-4")));

    let bridge = IdentityBridgeService::new(Arc::new(repo));
    let resolved = bridge.resolve(claims("uid-4")).await.expect("race resolved");

    assert_eq!(resolved.id(), winner_id);
}

#[tokio::test]
async fn resolve_maps_connection_error_to_transient() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_subject()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("timed out")));

    let bridge = IdentityBridgeService::new(Arc::new(repo));
    let err = bridge.resolve(claims("uid-5")).await.expect_err("transient");
    assert_eq!(err.code(), ErrorCode::TransientError);
}
