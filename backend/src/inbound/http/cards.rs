//! Card API handlers.
//!
//! ```text
//! GET    /api/v1/cards             Approved listing, optionally filtered
//! GET    /api/v1/cards/{slug}      Card detail by slug
//! POST   /api/v1/cards             Submit a card for moderation
//! PUT    /api/v1/cards/{id}        Update an owned card
//! DELETE /api/v1/cards/{id}        Delete an owned card
//! GET    /api/v1/me/cards          The caller's own submissions
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::domain::card::{CardFields, Slug};
use crate::domain::ports::{
    CardListingFilter, DeleteCardRequest, SubmitCardRequest, UpdateCardRequest,
};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;

/// Optional listing filters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    /// Keep only cards in this category (case-insensitive).
    pub category: Option<String>,
    /// Keep only cards issued by this bank (case-insensitive).
    pub bank: Option<String>,
}

impl From<ListingQuery> for CardListingFilter {
    fn from(query: ListingQuery) -> Self {
        Self {
            category: query.category,
            bank: query.bank,
        }
    }
}

/// Approved cards, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/cards",
    params(ListingQuery),
    responses(
        (status = 200, description = "Approved cards", body = [crate::domain::Card]),
        (status = 503, description = "Persistence unavailable", body = crate::domain::Error)
    ),
    tags = ["cards"],
    operation_id = "listCards"
)]
#[get("/cards")]
pub async fn list_cards(
    state: web::Data<HttpState>,
    query: web::Query<ListingQuery>,
) -> ApiResult<HttpResponse> {
    let cards = state
        .queries
        .approved_listing(query.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// Single-card detail by slug.
#[utoipa::path(
    get,
    path = "/api/v1/cards/{slug}",
    params(("slug" = String, Path, description = "URL-safe card identifier")),
    responses(
        (status = 200, description = "Card detail", body = crate::domain::Card),
        (status = 404, description = "No card carries the slug", body = crate::domain::Error)
    ),
    tags = ["cards"],
    operation_id = "cardDetail"
)]
#[get("/cards/{slug}")]
pub async fn card_detail(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    // A malformed slug cannot name any card.
    let slug =
        Slug::new(raw.as_str()).map_err(|_| Error::card_not_found(format!("card not found: {raw}")))?;
    let card = state.queries.detail_by_slug(slug).await?;
    Ok(HttpResponse::Ok().json(card))
}

/// The caller's own submissions, every status.
#[utoipa::path(
    get,
    path = "/api/v1/me/cards",
    responses(
        (status = 200, description = "Own submissions", body = [crate::domain::Card]),
        (status = 401, description = "Missing claims", body = crate::domain::Error),
        (status = 404, description = "Unknown user", body = crate::domain::Error)
    ),
    tags = ["cards"],
    operation_id = "ownSubmissions"
)]
#[get("/me/cards")]
pub async fn own_submissions(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let cards = state.queries.own_submissions(auth.subject_id()?).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// Submit a card for moderation.
///
/// # Errors
///
/// - `400 Bad Request`: one or more fields failed validation; the response
///   `details` object maps field names to messages.
/// - `401 Unauthorized`: no usable identity claims.
/// - `404 Not Found`: the subject has no local user.
/// - `409 Conflict`: the generated slug collided twice in a row.
#[utoipa::path(
    post,
    path = "/api/v1/cards",
    request_body = CardFields,
    responses(
        (status = 201, description = "Card accepted for moderation", body = crate::domain::Card),
        (status = 400, description = "Validation failed", body = crate::domain::Error),
        (status = 401, description = "Missing claims", body = crate::domain::Error),
        (status = 409, description = "Slug collision persisted", body = crate::domain::Error)
    ),
    tags = ["cards"],
    operation_id = "submitCard"
)]
#[post("/cards")]
pub async fn submit_card(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<CardFields>,
) -> ApiResult<HttpResponse> {
    let request = SubmitCardRequest {
        subject: auth.subject_id()?,
        fields: payload.into_inner(),
    };
    let card = state.submissions.submit(request).await?;
    Ok(HttpResponse::Created().json(card))
}

/// Update a card the caller owns. The slug never changes, even on rename.
#[utoipa::path(
    put,
    path = "/api/v1/cards/{id}",
    params(("id" = Uuid, Path, description = "Card identifier")),
    request_body = CardFields,
    responses(
        (status = 200, description = "Updated card", body = crate::domain::Card),
        (status = 400, description = "Validation failed", body = crate::domain::Error),
        (status = 403, description = "Card owned by another user", body = crate::domain::Error),
        (status = 404, description = "Card not found", body = crate::domain::Error)
    ),
    tags = ["cards"],
    operation_id = "updateCard"
)]
#[put("/cards/{id}")]
pub async fn update_card(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<CardFields>,
) -> ApiResult<HttpResponse> {
    let request = UpdateCardRequest {
        card_id: path.into_inner(),
        subject: auth.subject_id()?,
        fields: payload.into_inner(),
    };
    let card = state.mutations.update(request).await?;
    Ok(HttpResponse::Ok().json(card))
}

/// Delete a card the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/cards/{id}",
    params(("id" = Uuid, Path, description = "Card identifier")),
    responses(
        (status = 204, description = "Card deleted"),
        (status = 403, description = "Card owned by another user", body = crate::domain::Error),
        (status = 404, description = "Card not found", body = crate::domain::Error)
    ),
    tags = ["cards"],
    operation_id = "deleteCard"
)]
#[delete("/cards/{id}")]
pub async fn delete_card(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let request = DeleteCardRequest {
        card_id: path.into_inner(),
        subject: auth.subject_id()?,
    };
    state.mutations.delete(request).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "cards_tests.rs"]
mod tests;
