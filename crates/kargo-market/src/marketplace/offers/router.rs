use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{OfferBook, OfferDraft, OfferError, OfferService};
use crate::marketplace::listings::domain::{CurrentUser, ListingId, UserId};
use crate::marketplace::listings::repository::ListingStore;

/// Router builder exposing offer placement and retrieval per listing.
pub fn offer_router<L, B>(service: Arc<OfferService<L, B>>) -> Router
where
    L: ListingStore + 'static,
    B: OfferBook + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings/:listing_id/offers",
            post(place_handler::<L, B>).get(list_handler::<L, B>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceOfferRequest {
    pub(crate) bidder_id: String,
    #[serde(default)]
    pub(crate) display_name: Option<String>,
    pub(crate) price_amount: f64,
    #[serde(default)]
    pub(crate) description: String,
}

pub(crate) async fn place_handler<L, B>(
    State(service): State<Arc<OfferService<L, B>>>,
    Path(listing_id): Path<String>,
    axum::Json(request): axum::Json<PlaceOfferRequest>,
) -> Response
where
    L: ListingStore + 'static,
    B: OfferBook + 'static,
{
    let bidder = CurrentUser {
        id: UserId(request.bidder_id),
        display_name: request.display_name,
    };
    let draft = OfferDraft {
        price_amount: request.price_amount,
        description: request.description,
        document_urls: Vec::new(),
    };

    match service.place(&bidder, &ListingId(listing_id), draft) {
        Ok(offer) => (StatusCode::CREATED, axum::Json(offer)).into_response(),
        Err(OfferError::OwnListing) => {
            let body = json!({ "error": OfferError::OwnListing.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(body)).into_response()
        }
        Err(OfferError::ListingNotFound) => {
            let body = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
        Err(OfferError::PriceOutOfRange) => {
            let body = json!({ "error": OfferError::PriceOutOfRange.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        Err(other) => {
            let body = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
        }
    }
}

pub(crate) async fn list_handler<L, B>(
    State(service): State<Arc<OfferService<L, B>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    L: ListingStore + 'static,
    B: OfferBook + 'static,
{
    match service.for_listing(&ListingId(listing_id)) {
        Ok(offers) => (StatusCode::OK, axum::Json(offers)).into_response(),
        Err(error) => {
            let body = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
        }
    }
}
