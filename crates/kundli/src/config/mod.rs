use crate::astro::ephemeris::SiderealMode;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ephemeris: EphemerisConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let raw_ayanamsa = env::var("APP_AYANAMSA").unwrap_or_else(|_| "lahiri".to_string());
        let sidereal_mode = raw_ayanamsa
            .parse::<SiderealMode>()
            .map_err(|_| ConfigError::InvalidAyanamsa { value: raw_ayanamsa })?;

        let cors_origins = parse_origins(
            &env::var("APP_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );
        if environment == AppEnvironment::Production && cors_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::WildcardCorsInProduction);
        }

        let data_path = env::var("APP_EPHE_PATH")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let rate_limit_enabled = env_flag("APP_RATE_LIMIT_ENABLED", true);
        let trust_proxy = env_flag("APP_TRUST_PROXY", false);

        let max_body_bytes = match env::var("APP_MAX_BODY_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or(ConfigError::InvalidBodyLimit { value: raw })?,
            Err(_) => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ephemeris: EphemerisConfig {
                sidereal_mode,
                data_path,
            },
            http: HttpConfig {
                cors_origins,
                rate_limit_enabled,
                trust_proxy,
                max_body_bytes,
            },
        })
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "false" | "0" | "no" | "off" => false,
            "true" | "1" | "yes" | "on" => true,
            _ => default,
        },
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Conventions fixed on the ephemeris at startup.
#[derive(Debug, Clone)]
pub struct EphemerisConfig {
    pub sidereal_mode: SiderealMode,
    /// Directory of Swiss Ephemeris data files; the built-in theory is used when unset.
    pub data_path: Option<PathBuf>,
}

/// Transport guards applied in front of the calculation routes.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub cors_origins: Vec<String>,
    pub rate_limit_enabled: bool,
    /// Key clients on the first `X-Forwarded-For` hop instead of the peer address.
    pub trust_proxy: bool,
    pub max_body_bytes: usize,
}

impl HttpConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec!["*".to_string()],
            rate_limit_enabled: true,
            trust_proxy: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAyanamsa { value: String },
    InvalidBodyLimit { value: String },
    WildcardCorsInProduction,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAyanamsa { value } => write!(
                f,
                "APP_AYANAMSA '{}' is not one of lahiri, krishnamurti, raman, fagan_bradley",
                value
            ),
            ConfigError::InvalidBodyLimit { value } => {
                write!(f, "APP_MAX_BODY_BYTES '{}' must be a positive integer", value)
            }
            ConfigError::WildcardCorsInProduction => write!(
                f,
                "APP_CORS_ORIGINS must list explicit origins when APP_ENV=production"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidAyanamsa { .. }
            | ConfigError::InvalidBodyLimit { .. }
            | ConfigError::WildcardCorsInProduction => None,
        }
    }
}
