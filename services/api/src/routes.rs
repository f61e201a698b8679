use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use kargo_market::marketplace::listings::{listing_router, ListingService, ListingStore};
use kargo_market::marketplace::offers::{offer_router, OfferBook, OfferService};
use kargo_market::marketplace::storage::FileStore;

pub(crate) fn with_marketplace_routes<S, F, B>(
    listings: Arc<ListingService<S, F>>,
    offers: Arc<OfferService<S, B>>,
) -> axum::Router
where
    S: ListingStore + 'static,
    F: FileStore + 'static,
    B: OfferBook + 'static,
{
    listing_router(listings)
        .merge(offer_router(offers))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
