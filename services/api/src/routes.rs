use crate::infra::AppState;
use crate::middleware::{cors, rate_limit, request_context, screen_payload};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use kundli::astro::ephemeris::Ephemeris;
use kundli::service::{astro_router, AstroService};
use serde_json::json;
use std::sync::Arc;
use tower_http::compression::predicate::SizeAbove;
use tower_http::compression::CompressionLayer;

pub(crate) const SERVICE_NAME: &str = "Kundli Astro Engine";
pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Responses smaller than this are sent uncompressed.
const MIN_GZIP_BYTES: u16 = 1000;

pub(crate) fn compression() -> CompressionLayer<SizeAbove> {
    CompressionLayer::new().compress_when(SizeAbove::new(MIN_GZIP_BYTES))
}

pub(crate) fn with_service_routes<E>(service: Arc<AstroService<E>>, state: AppState) -> Router
where
    E: Ephemeris + 'static,
{
    astro_router(service)
        .route("/", get(index))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(DefaultBodyLimit::max(state.http.max_body_bytes))
        .layer(from_fn_with_state(state.clone(), screen_payload))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(from_fn_with_state(state.clone(), cors))
        .layer(from_fn(request_context))
        .layer(compression())
        .layer(Extension(state))
}

pub(crate) async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": VERSION,
        "endpoints": {
            "health": "GET /health",
            "ready": "GET /ready",
            "metrics": "GET /metrics",
            "generate_kundli": "POST /generate-kundli",
            "calculate_compatibility": "POST /calculate-compatibility",
            "detect_manglik": "POST /detect-manglik",
            "manglik_compatibility": "POST /manglik-compatibility",
        }
    }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": VERSION,
        "timestamp": Utc::now().to_rfc3339(),
    }))
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
