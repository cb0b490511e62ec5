use crate::cli::ServeArgs;
use crate::infra::{AppState, RateLimiter};
use crate::routes::with_service_routes;
use axum_prometheus::PrometheusMetricLayer;
use kundli::astro::ephemeris::SwissEphemeris;
use kundli::config::AppConfig;
use kundli::error::{AppError, KundliError};
use kundli::manglik::ManglikDetector;
use kundli::service::AstroService;
use kundli::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        http: Arc::new(config.http.clone()),
        limiter: Arc::new(RateLimiter::default()),
    };

    let mode = config.ephemeris.sidereal_mode;
    let ephemeris = match config.ephemeris.data_path.as_deref() {
        Some(path) => SwissEphemeris::with_data_path(mode, path).map_err(KundliError::from)?,
        None => SwissEphemeris::builtin(mode),
    };
    let ephemeris = Arc::new(ephemeris);
    let service = Arc::new(AstroService::new(ephemeris.clone(), ManglikDetector::default()));

    let app = with_service_routes(service, app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        ayanamsa = %mode,
        ephemeris_files = ?ephemeris.data_path(),
        rate_limit = config.http.rate_limit_enabled,
        trust_proxy = config.http.trust_proxy,
        "kundli astro engine ready"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
