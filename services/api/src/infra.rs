use kundli::config::HttpConfig;
use kundli::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

const RATE_WINDOW: Duration = Duration::from_secs(60);
const MAX_TRACKED_WINDOWS: usize = 10_000;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) http: Arc<HttpConfig>,
    pub(crate) limiter: Arc<RateLimiter>,
}

/// Endpoint groups sharing one per-client request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RateBucket {
    Kundli,
    Compatibility,
    Manglik,
    ManglikCompatibility,
    Health,
}

impl RateBucket {
    pub(crate) fn for_path(path: &str) -> Option<Self> {
        match path {
            "/generate-kundli" => Some(Self::Kundli),
            "/calculate-compatibility" => Some(Self::Compatibility),
            "/detect-manglik" => Some(Self::Manglik),
            "/manglik-compatibility" => Some(Self::ManglikCompatibility),
            "/health" => Some(Self::Health),
            _ => None,
        }
    }

    /// Requests per minute.
    pub(crate) const fn limit(self) -> u32 {
        match self {
            Self::Kundli | Self::Manglik => 30,
            Self::Compatibility | Self::ManglikCompatibility => 20,
            Self::Health => 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed one-minute windows keyed by client and bucket.
///
/// At most `capacity` windows are tracked. When full, expired windows are
/// dropped first and then the oldest live one.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    windows: Mutex<HashMap<(String, RateBucket), Window>>,
    capacity: usize,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_capacity(MAX_TRACKED_WINDOWS)
    }
}

impl RateLimiter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn check(&self, client: &str, bucket: RateBucket, now: Instant) -> Result<(), AppError> {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (client.to_string(), bucket);

        if !windows.contains_key(&key) && windows.len() >= self.capacity {
            windows.retain(|_, window| now.duration_since(window.started) < RATE_WINDOW);
            if windows.len() >= self.capacity {
                let oldest = windows
                    .iter()
                    .min_by_key(|(_, window)| window.started)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    windows.remove(&oldest);
                }
            }
        }

        let window = windows.entry(key).or_insert(Window { started: now, count: 0 });

        let elapsed = now.duration_since(window.started);
        if elapsed >= RATE_WINDOW {
            *window = Window { started: now, count: 0 };
        }

        let limit = bucket.limit();
        if window.count >= limit {
            let remaining = RATE_WINDOW.saturating_sub(now.duration_since(window.started));
            return Err(AppError::RateLimited {
                limit,
                retry_after_secs: remaining.as_secs().max(1),
            });
        }

        window.count += 1;
        Ok(())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_endpoint_limits() {
        assert_eq!(RateBucket::for_path("/generate-kundli").map(RateBucket::limit), Some(30));
        assert_eq!(RateBucket::for_path("/calculate-compatibility").map(RateBucket::limit), Some(20));
        assert_eq!(RateBucket::for_path("/health").map(RateBucket::limit), Some(100));
        assert_eq!(RateBucket::for_path("/metrics"), None);
    }

    #[test]
    fn limiter_blocks_after_budget_and_resets_next_window() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..20 {
            limiter
                .check("10.0.0.1", RateBucket::Compatibility, start)
                .expect("within budget");
        }
        let err = limiter
            .check("10.0.0.1", RateBucket::Compatibility, start + Duration::from_secs(15))
            .expect_err("budget exhausted");
        assert!(matches!(
            err,
            AppError::RateLimited { limit: 20, retry_after_secs: 45 }
        ));

        // other clients and buckets are unaffected
        assert!(limiter.check("10.0.0.2", RateBucket::Compatibility, start).is_ok());
        assert!(limiter.check("10.0.0.1", RateBucket::Kundli, start).is_ok());

        assert!(limiter
            .check("10.0.0.1", RateBucket::Compatibility, start + RATE_WINDOW)
            .is_ok());
    }

    #[test]
    fn tracked_windows_never_exceed_capacity() {
        let limiter = RateLimiter::with_capacity(3);
        let start = Instant::now();

        for (offset, client) in ["10.0.0.1", "10.0.0.2", "10.0.0.3"].into_iter().enumerate() {
            limiter
                .check(client, RateBucket::Manglik, start + Duration::from_secs(offset as u64))
                .expect("within budget");
        }
        for octet in 4..200 {
            let client = format!("10.0.0.{octet}");
            limiter
                .check(&client, RateBucket::Manglik, start + Duration::from_secs(5))
                .expect("new clients are admitted");
            assert!(limiter.tracked() <= 3);
        }
        assert_eq!(limiter.tracked(), 3);
    }

    #[test]
    fn expired_windows_are_dropped_before_live_ones() {
        let limiter = RateLimiter::with_capacity(2);
        let start = Instant::now();

        limiter.check("stale", RateBucket::Health, start).expect("within budget");
        for _ in 0..20 {
            limiter
                .check("busy", RateBucket::Compatibility, start + Duration::from_secs(50))
                .expect("within budget");
        }
        limiter
            .check("fresh", RateBucket::Health, start + Duration::from_secs(70))
            .expect("within budget");

        // the busy window survived and is still exhausted
        assert!(limiter
            .check("busy", RateBucket::Compatibility, start + Duration::from_secs(71))
            .is_err());
    }
}
