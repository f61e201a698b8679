use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CurrentUser, ListingDraft, ListingId, TransportMode, UserId};
use super::repository::{ListingStore, SearchFilter, StoreError};
use super::service::{ListingService, ListingServiceError};
use crate::marketplace::catalog;
use crate::marketplace::search::{filter_listings, ListingQuery};
use crate::marketplace::storage::FileStore;

/// Router builder exposing the listing endpoints.
pub fn listing_router<S, F>(service: Arc<ListingService<S, F>>) -> Router
where
    S: ListingStore + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings",
            post(submit_handler::<S, F>).get(search_handler::<S, F>),
        )
        .route("/api/v1/listings/:listing_id", get(fetch_handler::<S, F>))
        .route("/api/v1/catalog/:mode", get(catalog_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitListingRequest {
    pub(crate) owner_id: String,
    #[serde(default)]
    pub(crate) display_name: Option<String>,
    pub(crate) draft: ListingDraft,
}

pub(crate) async fn submit_handler<S, F>(
    State(service): State<Arc<ListingService<S, F>>>,
    axum::Json(request): axum::Json<SubmitListingRequest>,
) -> Response
where
    S: ListingStore + 'static,
    F: FileStore + 'static,
{
    let owner = CurrentUser {
        id: UserId(request.owner_id),
        display_name: request.display_name,
    };

    match service.submit(&owner, request.draft, Vec::new()) {
        Ok(outcome) => {
            let body = json!({
                "listing": outcome.listing,
                "rejected_files": outcome.rejected_files,
            });
            (StatusCode::CREATED, axum::Json(body)).into_response()
        }
        Err(ListingServiceError::Validation(rejection)) => {
            let body = json!({
                "error": rejection.to_string(),
                "issues": rejection.issues,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        Err(ListingServiceError::Store(StoreError::Unauthorized)) => {
            let body = json!({ "error": "caller is not authenticated" });
            (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
        }
        Err(ListingServiceError::Store(StoreError::Conflict)) => {
            let body = json!({ "error": "listing already exists" });
            (StatusCode::CONFLICT, axum::Json(body)).into_response()
        }
        Err(other) => {
            let body = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub(crate) q: Option<String>,
    #[serde(default)]
    pub(crate) listing_type: Option<String>,
    #[serde(default)]
    pub(crate) transport_mode: Option<String>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn search_handler<S, F>(
    State(service): State<Arc<ListingService<S, F>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: ListingStore + 'static,
    F: FileStore + 'static,
{
    let listing_type = match params.listing_type.as_deref() {
        None | Some("all") => None,
        Some(raw) => match super::domain::ListingType::parse_label(raw) {
            Some(parsed) => Some(parsed),
            None => return unknown_facet_response("listing_type", raw),
        },
    };
    let transport_mode = match params.transport_mode.as_deref() {
        None | Some("all") => None,
        Some(raw) => match TransportMode::parse_label(raw) {
            Some(parsed) => Some(parsed),
            None => return unknown_facet_response("transport_mode", raw),
        },
    };

    let filter = SearchFilter {
        listing_type,
        transport_mode,
        status: None,
        limit: params.limit,
    };

    match service.search(&filter) {
        Ok(listings) => {
            let query = ListingQuery {
                text: params.q,
                ..ListingQuery::default()
            };
            let views: Vec<_> = filter_listings(&listings, &query)
                .into_iter()
                .map(|listing| listing.summary_view())
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => {
            let body = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
        }
    }
}

fn unknown_facet_response(field: &str, value: &str) -> Response {
    let body = json!({ "error": format!("unknown {field} '{value}'") });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
}

pub(crate) async fn fetch_handler<S, F>(
    State(service): State<Arc<ListingService<S, F>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    S: ListingStore + 'static,
    F: FileStore + 'static,
{
    let id = ListingId(listing_id);
    match service.get(&id) {
        Ok(Some(listing)) => (StatusCode::OK, axum::Json(listing)).into_response(),
        // A missing or deleted listing renders a fallback instead of failing
        // the enclosing view.
        Ok(None) => {
            let body = json!({
                "listing_id": id.0,
                "status": "unavailable",
                "detail": "listing info unavailable",
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let body = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
        }
    }
}

pub(crate) async fn catalog_handler(Path(mode): Path<String>) -> Response {
    match TransportMode::parse_label(&mode) {
        Some(mode) => {
            let body = json!({
                "transport_mode": mode.label(),
                "vehicle_groups": catalog::vehicle_groups(mode),
                "required_documents": catalog::document_sections(mode),
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        None => unknown_facet_response("transport_mode", &mode),
    }
}
