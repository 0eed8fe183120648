use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::state::AppState;

/// Counters for more addresses than this trigger a sweep of expired windows,
/// keeping the map bounded under address churn.
const MAX_TRACKED_IPS: usize = 4096;

/// Fixed-window request counter keyed by client IP. Approximate by design:
/// counters live in process memory and reset on restart, which is acceptable
/// for coarse abuse prevention only.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    counters: DashMap<IpAddr, (u32, Instant)>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            counters: DashMap::new(),
        }
    }

    /// Records one request from `ip` and reports whether it is allowed.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        if self.counters.len() >= MAX_TRACKED_IPS {
            self.counters
                .retain(|_, (_, start)| now.duration_since(*start) <= self.window);
        }
        let mut entry = self.counters.entry(ip).or_insert((0, now));
        let (count, window_start) = *entry;
        if now.duration_since(window_start) > self.window {
            *entry = (1, now);
            return true;
        }
        *entry = (count + 1, window_start);
        count + 1 <= self.max_requests
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    if !state.rate_limiter.check(addr.ip()) {
        tracing::warn!(ip = %addr.ip(), "rate limit exceeded");
        return (StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_threshold() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let now = Instant::now();
        assert!(limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(1), now));
        assert!(!limiter.check_at(ip(1), now));
    }

    #[test]
    fn counters_are_per_ip() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();
        assert!(limiter.check_at(ip(1), now));
        assert!(!limiter.check_at(ip(1), now));
        assert!(limiter.check_at(ip(2), now));
    }

    #[test]
    fn expired_entries_are_swept_when_the_map_fills_up() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 100);
        let start = Instant::now();
        for n in 0..MAX_TRACKED_IPS as u32 {
            limiter.check_at(IpAddr::from(u32::to_be_bytes(n)), start);
        }
        assert_eq!(limiter.counters.len(), MAX_TRACKED_IPS);

        // All tracked windows are expired by now, so the next request sweeps
        // them instead of growing the map further.
        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at(ip(1), later));
        assert_eq!(limiter.counters.len(), 1);
    }

    #[test]
    fn live_entries_survive_the_sweep() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 100);
        let start = Instant::now();
        for n in 0..MAX_TRACKED_IPS as u32 {
            limiter.check_at(IpAddr::from(u32::to_be_bytes(n)), start);
        }
        let mid = start + Duration::from_secs(30);
        assert!(limiter.check_at(ip(1), mid));
        assert_eq!(limiter.counters.len(), MAX_TRACKED_IPS + 1);
    }

    #[test]
    fn window_expiry_resets_count() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        assert!(limiter.check_at(ip(1), start));
        assert!(!limiter.check_at(ip(1), start));
        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at(ip(1), later));
    }
}
