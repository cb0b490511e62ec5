use crate::astro::ephemeris::EphemerisError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Failures raised by the chart, matching and manglik engines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KundliError {
    /// Caller-correctable input, reported with the offending value.
    #[error("{0}")]
    InvalidInput(String),
    #[error("'{field}' is required in planetary_longitudes")]
    MissingField { field: &'static str },
    #[error("astronomical calculation failed: {0}")]
    Calculation(#[from] EphemerisError),
}

impl KundliError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, KundliError::Calculation(_))
    }
}

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Domain(KundliError),
    /// Request body could not be deserialized into the expected record.
    Validation(String),
    RateLimited { limit: u32, retry_after_secs: u64 },
    PayloadTooLarge { limit_bytes: usize },
    SuspiciousPayload { marker: &'static str },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Domain(err) => write!(f, "{}", err),
            AppError::Validation(message) => write!(f, "invalid request body: {}", message),
            AppError::RateLimited { limit, .. } => {
                write!(f, "rate limit exceeded: {} per 1 minute", limit)
            }
            AppError::PayloadTooLarge { limit_bytes } => {
                write!(f, "request body exceeds {} bytes", limit_bytes)
            }
            AppError::SuspiciousPayload { marker } => {
                write!(f, "request body contains disallowed pattern '{}'", marker)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Domain(err) => Some(err),
            AppError::Validation(_)
            | AppError::RateLimited { .. }
            | AppError::PayloadTooLarge { .. }
            | AppError::SuspiciousPayload { .. } => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::SuspiciousPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Domain(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AppError::Domain(KundliError::InvalidInput(_)) | AppError::SuspiciousPayload { .. } => {
                "Invalid Input"
            }
            AppError::Domain(KundliError::MissingField { .. }) => "Missing Field",
            AppError::Validation(_) => "Validation Error",
            AppError::RateLimited { .. } => "Rate Limit Exceeded",
            AppError::PayloadTooLarge { .. } => "Request too large",
            _ => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "An unexpected error occurred".to_string()
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
            match &self {
                AppError::SuspiciousPayload { .. } => {
                    "Invalid characters detected in request".to_string()
                }
                other => other.to_string(),
            }
        };

        let body = Json(json!({ "error": self.label(), "message": message }));
        let mut response = (status, body).into_response();
        if let AppError::RateLimited {
            retry_after_secs, ..
        } = self
        {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<KundliError> for AppError {
    fn from(value: KundliError) -> Self {
        Self::Domain(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn invalid_input_maps_to_bad_request_with_message() {
        let response =
            AppError::from(KundliError::invalid("Unknown timezone: Mars/Olympus")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid Input");
        assert_eq!(body["message"], "Unknown timezone: Mars/Olympus");
    }

    #[tokio::test]
    async fn calculation_failures_do_not_leak_detail() {
        let err = KundliError::Calculation(EphemerisError::NonFinite {
            quantity: "latitude",
            value: f64::NAN,
        });
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn rate_limit_sets_retry_after() {
        let response = AppError::RateLimited {
            limit: 20,
            retry_after_secs: 42,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            HeaderValue::from(42u64)
        );
    }

    #[test]
    fn missing_field_names_the_key() {
        let err = KundliError::MissingField { field: "mars" };
        assert_eq!(err.to_string(), "'mars' is required in planetary_longitudes");
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
    }
}
