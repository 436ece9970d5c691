//! Session endpoint bridging external identities to local users.
//!
//! ```text
//! POST /api/v1/session  Resolve the caller's claims to a local profile
//! ```
//!
//! Clients call this once after sign-in; the identity bridge creates the
//! local user on first sight and returns the existing profile afterwards.

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;

/// Local user profile returned to the client.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for SessionUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            is_admin: user.is_admin(),
        }
    }
}

/// Resolve the caller's identity claims to a local user profile.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Local user profile", body = SessionUserResponse),
        (status = 401, description = "Missing or unusable claims", body = crate::domain::Error),
        (status = 503, description = "Persistence unavailable", body = crate::domain::Error)
    ),
    tags = ["session"],
    operation_id = "syncSession"
)]
#[post("/session")]
pub async fn sync_session(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let user = state.identity.resolve(auth.into_claims()).await?;
    Ok(HttpResponse::Ok().json(SessionUserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use std::sync::Arc;

    use super::*;
    use crate::domain::SubjectId;
    use crate::domain::ports::MockIdentityBridge;
    use crate::inbound::http::auth::{EMAIL_HEADER, NAME_HEADER, SUBJECT_HEADER};
    use crate::inbound::http::test_utils::mock_state;

    #[actix_web::test]
    async fn resolves_claims_to_profile() {
        let mut identity = MockIdentityBridge::new();
        identity.expect_resolve().times(1).returning(|claims| {
            let subject = SubjectId::new(claims.subject).expect("valid subject");
            Ok(User::register(subject, claims.name, claims.email).expect("valid user"))
        });
        let mut state = mock_state();
        state.identity = Arc::new(identity);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(sync_session),
        )
        .await;
        let request = test::TestRequest::post()
            .uri("/session")
            .insert_header((SUBJECT_HEADER, "uid-1"))
            .insert_header((NAME_HEADER, "Ada"))
            .insert_header((EMAIL_HEADER, "ada@b.example"))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body.get("name").and_then(|v| v.as_str()), Some("Ada"));
        assert_eq!(body.get("isAdmin").and_then(|v| v.as_bool()), Some(false));
    }

    #[actix_web::test]
    async fn rejects_missing_claims() {
        let state = mock_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(sync_session),
        )
        .await;
        let request = test::TestRequest::post().uri("/session").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
