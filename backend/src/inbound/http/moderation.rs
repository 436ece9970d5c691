//! Administrator moderation handlers.
//!
//! ```text
//! GET    /api/v1/admin/cards/pending       Pending moderation queue
//! POST   /api/v1/admin/cards/{id}/approve  Approve a pending card
//! POST   /api/v1/admin/cards/{id}/reject   Reject a pending card
//! DELETE /api/v1/admin/seed-cards          Remove ownerless seed cards
//! ```
//!
//! Every endpoint requires an administrator; the domain service enforces
//! the flag, the handlers only forward the caller's subject.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ports::ModerationRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;

/// Outcome of a seed-data cleanup run.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedCleanupResponse {
    /// Number of cards removed.
    pub removed: u64,
}

/// Cards awaiting moderation, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/cards/pending",
    responses(
        (status = 200, description = "Pending cards", body = [crate::domain::Card]),
        (status = 401, description = "Missing claims", body = crate::domain::Error),
        (status = 403, description = "Caller is not an administrator", body = crate::domain::Error)
    ),
    tags = ["moderation"],
    operation_id = "pendingCards"
)]
#[get("/admin/cards/pending")]
pub async fn pending_cards(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let cards = state.moderation.pending_queue(auth.subject_id()?).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// Approve a pending card, publishing it to the listings.
#[utoipa::path(
    post,
    path = "/api/v1/admin/cards/{id}/approve",
    params(("id" = Uuid, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Approved card", body = crate::domain::Card),
        (status = 403, description = "Caller is not an administrator", body = crate::domain::Error),
        (status = 404, description = "Card not found", body = crate::domain::Error),
        (status = 409, description = "Card is not pending", body = crate::domain::Error)
    ),
    tags = ["moderation"],
    operation_id = "approveCard"
)]
#[post("/admin/cards/{id}/approve")]
pub async fn approve_card(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let request = ModerationRequest {
        card_id: path.into_inner(),
        subject: auth.subject_id()?,
    };
    let card = state.moderation.approve(request).await?;
    Ok(HttpResponse::Ok().json(card))
}

/// Reject a pending card.
#[utoipa::path(
    post,
    path = "/api/v1/admin/cards/{id}/reject",
    params(("id" = Uuid, Path, description = "Card identifier")),
    responses(
        (status = 200, description = "Rejected card", body = crate::domain::Card),
        (status = 403, description = "Caller is not an administrator", body = crate::domain::Error),
        (status = 404, description = "Card not found", body = crate::domain::Error),
        (status = 409, description = "Card is not pending", body = crate::domain::Error)
    ),
    tags = ["moderation"],
    operation_id = "rejectCard"
)]
#[post("/admin/cards/{id}/reject")]
pub async fn reject_card(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let request = ModerationRequest {
        card_id: path.into_inner(),
        subject: auth.subject_id()?,
    };
    let card = state.moderation.reject(request).await?;
    Ok(HttpResponse::Ok().json(card))
}

/// Remove approved cards owned by nobody, left over from seeding.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/seed-cards",
    responses(
        (status = 200, description = "Cleanup outcome", body = SeedCleanupResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::domain::Error)
    ),
    tags = ["moderation"],
    operation_id = "removeSeedCards"
)]
#[delete("/admin/seed-cards")]
pub async fn remove_seed_cards(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let removed = state.moderation.remove_seed_data(auth.subject_id()?).await?;
    Ok(HttpResponse::Ok().json(SeedCleanupResponse { removed }))
}

#[cfg(test)]
#[path = "moderation_tests.rs"]
mod tests;
