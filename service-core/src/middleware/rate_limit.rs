use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};
use tokio::task::JoinHandle;

/// Rate limiter keyed by client IP address
pub type IpRateLimiter = Arc<RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>>;

/// Allow `attempts` requests per `window_seconds` per IP, with the whole
/// allowance available as a burst.
pub fn create_ip_rate_limiter(attempts: u32, window_seconds: u64) -> IpRateLimiter {
    let attempts = attempts.max(1);
    let period = Duration::from_millis(((window_seconds.max(1) * 1000) / attempts as u64).max(1));
    let burst = NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst);

    Arc::new(RateLimiter::dashmap(quota))
}

/// Middleware state: the limiter plus the number of reverse proxies in front
/// of the service that append to `x-forwarded-for`.
#[derive(Clone)]
pub struct IpRateLimit {
    pub limiter: IpRateLimiter,
    /// 0 means the header is ignored and the peer address is used.
    pub trusted_proxy_hops: usize,
}

impl IpRateLimit {
    pub fn new(limiter: IpRateLimiter, trusted_proxy_hops: usize) -> Self {
        Self {
            limiter,
            trusted_proxy_hops,
        }
    }
}

/// Client IP as seen by the outermost trusted proxy, else the peer address.
///
/// Each trusted proxy appends one entry to `x-forwarded-for`, so only the last
/// `trusted_proxy_hops` entries are reliable; anything left of them was sent
/// by the client.
pub fn client_ip(request: &Request, trusted_proxy_hops: usize) -> Option<IpAddr> {
    let forwarded = (trusted_proxy_hops > 0)
        .then(|| {
            let hops: Vec<&str> = request
                .headers()
                .get_all("x-forwarded-for")
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|s| s.split(','))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();

            hops.len()
                .checked_sub(trusted_proxy_hops)
                .and_then(|i| hops.get(i))
                .and_then(|s| s.parse::<IpAddr>().ok())
        })
        .flatten();

    forwarded.or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

/// Periodically drop limiter keys whose state is back to fresh, so addresses
/// seen once do not stay in memory forever.
pub fn spawn_rate_limiter_cleanup(limiter: IpRateLimiter, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
            tracing::debug!(keys = limiter.len(), "Rate limiter state pruned");
        }
    })
}

/// Middleware for IP-based rate limiting
pub async fn ip_rate_limit_middleware(
    State(limit): State<IpRateLimit>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(ip) = client_ip(&request, limit.trusted_proxy_hops) else {
        tracing::warn!("Could not determine IP for rate limiting");
        return Ok(next.run(request).await);
    };

    match limit.limiter.check_key(&ip) {
        Ok(_) => Ok(next.run(request).await),
        Err(negative) => {
            let wait_time = negative.wait_time_from(DefaultClock::default().now());
            tracing::warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");
            Err(AppError::TooManyRequests(
                "Too many requests from this IP. Please try again later.".to_string(),
                Some(wait_time.as_secs().max(1)),
            ))
        }
    }
}
