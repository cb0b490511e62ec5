use crate::infra::{AppState, RateBucket};
use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kundli::config::HttpConfig;
use kundli::error::AppError;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub(crate) const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub(crate) const PROCESS_TIME: HeaderName = HeaderName::from_static("x-process-time");

const SUSPICIOUS_MARKERS: [&str; 5] = ["<script", "javascript:", "onerror=", "eval(", "exec("];
const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type, x-request-id";

const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains",
    ),
    (header::CONTENT_SECURITY_POLICY, "default-src 'self'"),
];

/// Tags every response with a request id, timing and security headers.
pub(crate) async fn request_context(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4().simple().to_string()[..16].to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let elapsed = started.elapsed();

    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{:.4}", elapsed.as_secs_f64())) {
        headers.insert(PROCESS_TIME, value);
    }

    info!(
        %request_id,
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "request completed"
    );

    response
}

fn allowed_origin(http: &HttpConfig, headers: &HeaderMap) -> Option<HeaderValue> {
    if http.allows_any_origin() {
        return Some(HeaderValue::from_static("*"));
    }
    let origin = headers.get(header::ORIGIN)?;
    let raw = origin.to_str().ok()?;
    http.cors_origins
        .iter()
        .any(|allowed| allowed == raw)
        .then(|| origin.clone())
}

/// Answers preflight requests and stamps allowed origins on responses.
pub(crate) async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = allowed_origin(&state.http, request.headers());

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    if let Some(origin) = origin {
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(header::VARY, HeaderValue::from_static("origin"));
    }

    response
}

/// Peer address of the connection. The first `X-Forwarded-For` hop is only
/// honoured when the service is configured to sit behind a trusted proxy.
fn client_key(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(client) = forwarded {
            return client.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.http.rate_limit_enabled {
        if let Some(bucket) = RateBucket::for_path(request.uri().path()) {
            let client = client_key(&request, state.http.trust_proxy);
            state.limiter.check(&client, bucket, Instant::now())?;
        }
    }
    Ok(next.run(request).await)
}

/// Rejects oversized bodies and bodies carrying script-injection markers.
pub(crate) async fn screen_payload(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limit = state.http.max_body_bytes;

    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared.is_some_and(|length| length > limit) {
        return Err(AppError::PayloadTooLarge { limit_bytes: limit });
    }

    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, limit)
        .await
        .map_err(|_| AppError::PayloadTooLarge { limit_bytes: limit })?;

    let lowered = String::from_utf8_lossy(&bytes).to_lowercase();
    if let Some(marker) = SUSPICIOUS_MARKERS
        .into_iter()
        .find(|marker| lowered.contains(marker))
    {
        return Err(AppError::SuspiciousPayload { marker });
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
