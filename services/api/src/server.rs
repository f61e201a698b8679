use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFileStore, InMemoryListingStore, InMemoryOfferBook};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use kargo_market::config::AppConfig;
use kargo_market::error::AppError;
use kargo_market::marketplace::listings::ListingService;
use kargo_market::marketplace::offers::OfferService;
use kargo_market::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryListingStore::default());
    let files = Arc::new(InMemoryFileStore::default());
    let book = Arc::new(InMemoryOfferBook::default());
    let listing_service = Arc::new(ListingService::new(store.clone(), files));
    let offer_service = Arc::new(OfferService::new(store, book));

    let app = with_marketplace_routes(listing_service, offer_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kargo market api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
