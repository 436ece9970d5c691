//! Referral API handlers.
//!
//! ```text
//! GET    /api/v1/cards/{id}/referrals   A card's referrals with click counts
//! POST   /api/v1/cards/{id}/referrals   Attach a referral to a card
//! DELETE /api/v1/referrals/{id}         Delete an owned referral
//! POST   /api/v1/referrals/{id}/clicks  Record a click before redirecting
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{AddReferralRequest, RecordClickRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;

/// Request body for attaching a referral.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddReferralBody {
    /// Absolute HTTP/HTTPS referral link.
    pub referral_url: String,
    /// Optional free-text note.
    pub description: Option<String>,
}

/// A card's referrals with derived click counts.
#[utoipa::path(
    get,
    path = "/api/v1/cards/{id}/referrals",
    params(("id" = Uuid, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Referrals, newest first", body = [crate::domain::ReferralWithClicks]),
        (status = 503, description = "Persistence unavailable", body = crate::domain::Error)
    ),
    tags = ["referrals"],
    operation_id = "listReferrals"
)]
#[get("/cards/{id}/referrals")]
pub async fn list_referrals(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let referrals = state.referrals.list_for_card(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(referrals))
}

/// Attach a referral to a card.
#[utoipa::path(
    post,
    path = "/api/v1/cards/{id}/referrals",
    params(("id" = Uuid, Path, description = "Card identifier")),
    request_body = AddReferralBody,
    responses(
        (status = 201, description = "Referral attached", body = crate::domain::Referral),
        (status = 400, description = "URL is not absolute http/https", body = crate::domain::Error),
        (status = 401, description = "Missing claims", body = crate::domain::Error),
        (status = 404, description = "Card not found", body = crate::domain::Error)
    ),
    tags = ["referrals"],
    operation_id = "addReferral"
)]
#[post("/cards/{id}/referrals")]
pub async fn add_referral(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<AddReferralBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = AddReferralRequest {
        subject: auth.subject_id()?,
        card_id: path.into_inner(),
        referral_url: body.referral_url,
        description: body.description,
    };
    let referral = state.referrals.add(request).await?;
    Ok(HttpResponse::Created().json(referral))
}

/// Delete a referral the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/referrals/{id}",
    params(("id" = Uuid, Path, description = "Referral identifier")),
    responses(
        (status = 204, description = "Referral deleted"),
        (status = 403, description = "Referral owned by another user", body = crate::domain::Error),
        (status = 404, description = "Referral not found", body = crate::domain::Error)
    ),
    tags = ["referrals"],
    operation_id = "deleteReferral"
)]
#[delete("/referrals/{id}")]
pub async fn delete_referral(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .referrals
        .delete(path.into_inner(), auth.subject_id()?)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record a click against a referral.
///
/// Click capture must never block the caller's redirect, so a failed write
/// is logged and the response is still `204 No Content`.
#[utoipa::path(
    post,
    path = "/api/v1/referrals/{id}/clicks",
    params(("id" = Uuid, Path, description = "Referral identifier")),
    responses((status = 204, description = "Click recorded, or best-effort attempted")),
    tags = ["referrals"],
    operation_id = "recordClick"
)]
#[post("/referrals/{id}/clicks")]
pub async fn record_click(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let referral_id = path.into_inner();
    let user_agent = request
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let ip_address = request
        .connection_info()
        .realip_remote_addr()
        .map(str::to_owned);

    let click = RecordClickRequest {
        referral_id,
        user_agent,
        ip_address,
    };
    if let Err(err) = state.referrals.record_click(click).await {
        warn!(referral_id = %referral_id, error = %err, "click recording failed");
    }
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
#[path = "referrals_tests.rs"]
mod tests;
