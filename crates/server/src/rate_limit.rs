//! Per-client request throttling.

use crate::error::RateLimited;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{clock::DefaultClock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

/// Token-bucket limiter keyed by client IP.
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl ClientRateLimiter {
    /// `None` when `per_minute` is zero.
    pub fn per_minute(per_minute: u32) -> Option<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute)?);
        Some(Self {
            limiter: RateLimiter::keyed(quota),
        })
    }

    /// Take one token for `ip`, or report how long until one frees up.
    pub fn check(&self, ip: IpAddr) -> Result<(), RateLimited> {
        self.limiter.check_key(&ip).map_err(|not_until| {
            let retry_after = not_until
                .wait_time_from(governor::clock::Clock::now(&DefaultClock::default()))
                .as_secs()
                .max(1);
            RateLimited { retry_after }
        })
    }

    /// Forget clients whose buckets have refilled.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Client address: the socket peer, or the proxy-reported client when
/// `trust_proxy_headers` is set.
fn client_ip(request: &Request, trust_proxy_headers: bool) -> IpAddr {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(request) {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| addr.ip())
}

fn forwarded_ip(request: &Request) -> Option<IpAddr> {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    // X-Forwarded-For may hold a chain; the first hop is the client.
    header("x-forwarded-for")
        .and_then(|chain| chain.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or_else(|| header("x-real-ip").and_then(|ip| ip.trim().parse().ok()))
}

pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimited> {
    if let Some(limiter) = &state.limiter {
        let ip = client_ip(&request, state.trust_proxy_headers);
        if let Err(limited) = limiter.check(ip) {
            tracing::info!(client = %ip, retry_after = limited.retry_after, "rate limited");
            return Err(limited);
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_zero_disables() {
        assert!(ClientRateLimiter::per_minute(0).is_none());
    }

    #[test]
    fn test_limit_is_per_client() {
        let limiter = ClientRateLimiter::per_minute(2).unwrap();
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(a).is_ok());
        assert!(limiter.check(a).is_ok());
        let limited = limiter.check(a).unwrap_err();
        assert!(limited.retry_after >= 1);

        assert!(limiter.check(b).is_ok());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    fn with_peer(mut request: Request, peer: [u8; 4]) -> Request {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 5000))));
        request
    }

    #[test]
    fn test_client_ip_uses_peer_by_default() {
        let request = with_peer(
            request_with(&[
                ("x-forwarded-for", "203.0.113.7"),
                ("x-real-ip", "198.51.100.1"),
            ]),
            [192, 0, 2, 4],
        );
        assert_eq!(client_ip(&request, false), "192.0.2.4".parse::<IpAddr>().unwrap());

        assert_eq!(
            client_ip(&request_with(&[]), false),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }

    #[test]
    fn test_client_ip_from_trusted_proxy_headers() {
        let forwarded = request_with(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "198.51.100.1"),
        ]);
        assert_eq!(client_ip(&forwarded, true), "203.0.113.7".parse::<IpAddr>().unwrap());

        let real = request_with(&[("x-real-ip", "198.51.100.1")]);
        assert_eq!(client_ip(&real, true), "198.51.100.1".parse::<IpAddr>().unwrap());

        let garbage = with_peer(request_with(&[("x-forwarded-for", "garbage")]), [192, 0, 2, 4]);
        assert_eq!(client_ip(&garbage, true), "192.0.2.4".parse::<IpAddr>().unwrap());
    }
}
