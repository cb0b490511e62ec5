use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use super::AstroService;
use crate::astro::chart::{BirthInput, Chart};
use crate::astro::ephemeris::Ephemeris;
use crate::error::AppError;
use crate::manglik::{ManglikCompatibility, ManglikCompatibilityRequest, ManglikRequest, ManglikResult};
use crate::matching::{CompatibilityRequest, CompatibilityResult};

/// Router exposing the four calculation endpoints.
pub fn astro_router<E>(service: Arc<AstroService<E>>) -> Router
where
    E: Ephemeris + 'static,
{
    Router::new()
        .route("/generate-kundli", post(generate_kundli_handler::<E>))
        .route("/calculate-compatibility", post(compatibility_handler::<E>))
        .route("/detect-manglik", post(detect_manglik_handler::<E>))
        .route("/manglik-compatibility", post(manglik_compatibility_handler::<E>))
        .with_state(service)
}

fn accept<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

pub(crate) async fn generate_kundli_handler<E>(
    State(service): State<Arc<AstroService<E>>>,
    payload: Result<Json<BirthInput>, JsonRejection>,
) -> Result<Json<Chart>, AppError>
where
    E: Ephemeris + 'static,
{
    let input = accept(payload)?;
    // ephemeris work is CPU-bound; keep it off the reactor
    let chart = tokio::task::spawn_blocking(move || service.generate_kundli(&input))
        .await
        .map_err(axum::Error::new)??;
    Ok(Json(chart))
}

pub(crate) async fn compatibility_handler<E>(
    State(service): State<Arc<AstroService<E>>>,
    payload: Result<Json<CompatibilityRequest>, JsonRejection>,
) -> Result<Json<CompatibilityResult>, AppError>
where
    E: Ephemeris + 'static,
{
    let request = accept(payload)?;
    Ok(Json(service.calculate_compatibility(&request)?))
}

pub(crate) async fn detect_manglik_handler<E>(
    State(service): State<Arc<AstroService<E>>>,
    payload: Result<Json<ManglikRequest>, JsonRejection>,
) -> Result<Json<ManglikResult>, AppError>
where
    E: Ephemeris + 'static,
{
    let request = accept(payload)?;
    Ok(Json(service.detect_manglik(&request)?))
}

pub(crate) async fn manglik_compatibility_handler<E>(
    State(service): State<Arc<AstroService<E>>>,
    payload: Result<Json<ManglikCompatibilityRequest>, JsonRejection>,
) -> Result<Json<ManglikCompatibility>, AppError>
where
    E: Ephemeris + 'static,
{
    let request = accept(payload)?;
    Ok(Json(service.manglik_compatibility(&request)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::ephemeris::SwissEphemeris;
    use crate::manglik::ManglikDetector;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        astro_router(Arc::new(AstroService::new(
            Arc::new(SwissEphemeris::default()),
            ManglikDetector::default(),
        )))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn compatibility_handler_scores_profiles() {
        let (status, body) = post_json(
            "/calculate-compatibility",
            json!({
                "bride": {"moon_sign": "Aries", "nakshatra": "Ashwini"},
                "groom": {"moon_sign": "Taurus", "nakshatra": "Krittika"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_gunas"], 15);
        assert_eq!(body["verdict"], "Low");
        assert_eq!(body["breakdown"]["Nadi"], 8);
    }

    #[tokio::test]
    async fn unknown_nakshatra_is_a_bad_request() {
        let (status, body) = post_json(
            "/calculate-compatibility",
            json!({
                "bride": {"moon_sign": "Aries", "nakshatra": "Nowhere"},
                "groom": {"moon_sign": "Taurus", "nakshatra": "Krittika"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid Input");
        assert_eq!(body["message"], "Invalid Bride Nakshatra: Nowhere");
    }

    #[tokio::test]
    async fn malformed_json_is_unprocessable() {
        let (status, body) = post_json("/detect-manglik", json!({"planetary_longitudes": "mars"})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Validation Error");
    }

    #[tokio::test]
    async fn detect_manglik_honours_moon_override() {
        let longitudes = json!({"mars": 10.0, "ascendant": 10.0, "moon": 100.0});

        let (_, with_moon) =
            post_json("/detect-manglik", json!({"planetary_longitudes": longitudes})).await;
        assert_eq!(with_moon["mars_house_from_moon"], 10);
        assert_eq!(with_moon["dosha_strength"], "Fully Cancelled");

        let (status, lagna_only) = post_json(
            "/detect-manglik",
            json!({"planetary_longitudes": longitudes, "check_from_moon": false}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(lagna_only["mars_house_from_moon"], Value::Null);
        assert_eq!(lagna_only["dosha_strength"], "Weak");
    }

    #[tokio::test]
    async fn missing_mars_is_reported() {
        let (status, body) = post_json(
            "/detect-manglik",
            json!({"planetary_longitudes": {"ascendant": 49.464221}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing Field");
        assert_eq!(body["message"], "'mars' is required in planetary_longitudes");
    }

    #[tokio::test]
    async fn generate_kundli_returns_chart_shape() {
        let (status, body) = post_json(
            "/generate-kundli",
            json!({
                "date": "13-01-2007",
                "time": "06:47 PM",
                "timezone": "Asia/Kolkata",
                "latitude": 30.2110,
                "longitude": 74.9455
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ayanamsa"], "Lahiri");
        assert_eq!(body["metadata"]["timezone"], "Asia/Kolkata");
        let pada = body["nakshatra_pada"].as_u64().expect("pada is numeric");
        assert!((1..=4).contains(&pada));
        assert!(body["planetary_longitudes"]["moon"].as_f64().is_some());
    }

    #[tokio::test]
    async fn generate_kundli_rejects_unknown_timezone() {
        let (status, body) = post_json(
            "/generate-kundli",
            json!({
                "date": "13-01-2007",
                "time": "06:47 PM",
                "timezone": "Mars/Olympus",
                "latitude": 30.2,
                "longitude": 74.9
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unknown timezone: Mars/Olympus");
    }
}
