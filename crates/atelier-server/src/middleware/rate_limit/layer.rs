//! Tower layer enforcing one tier at the transport edge.

use super::policy::RatePolicy;
use super::store::{Admission, FixedWindowTracker};
use crate::error::ApiError;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderName, HeaderValue, Request},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

/// Rate limiting layer for one policy tier.
///
/// Admission happens before the inner service runs, so an over-limit
/// client is turned away without touching authentication or handlers.
/// The response outcome is reported back to the tracker afterwards for
/// tiers that charge only one outcome class.
#[derive(Clone)]
pub struct RateLimitLayer {
    tracker: Arc<FixedWindowTracker>,
    policy: RatePolicy,
    trusted_hops: usize,
}

impl RateLimitLayer {
    /// Build the layer for a policy, trusting one forwarding hop.
    pub fn new(tracker: Arc<FixedWindowTracker>, policy: RatePolicy) -> Self {
        Self {
            tracker,
            policy,
            trusted_hops: 1,
        }
    }

    /// Number of reverse proxies whose `X-Forwarded-For` entries are
    /// trusted. Zero means the peer address is always used.
    pub fn with_trusted_hops(mut self, hops: usize) -> Self {
        self.trusted_hops = hops;
        self
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitMiddleware {
            inner,
            tracker: self.tracker.clone(),
            policy: self.policy,
            trusted_hops: self.trusted_hops,
        }
    }
}

/// The wrapped service produced by [`RateLimitLayer`].
#[derive(Clone)]
pub struct RateLimitMiddleware<S> {
    inner: S,
    tracker: Arc<FixedWindowTracker>,
    policy: RatePolicy,
    trusted_hops: usize,
}

impl<S> Service<Request<Body>> for RateLimitMiddleware<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracker = self.tracker.clone();
        let policy = self.policy;
        let key = client_key(&req, self.trusted_hops);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let admission = tracker.admit(&key, &policy);

            if !admission.allowed {
                warn!(
                    client = %key,
                    tier = policy.tier.as_str(),
                    "rate limit exceeded"
                );
                let mut response = ApiError::RateLimited {
                    message: policy.message.to_owned(),
                    retry_after: policy.retry_after.to_owned(),
                    reset_in_secs: admission.reset_in.as_secs().max(1),
                }
                .into_response();
                apply_rate_headers(&mut response, &admission);
                return Ok(response);
            }

            let mut response = inner.call(req).await?;
            tracker.record(&key, &policy, response.status().as_u16() < 400);
            apply_rate_headers(&mut response, &admission);
            Ok(response)
        })
    }
}

/// Standard draft `RateLimit-*` headers. The legacy `X-RateLimit-*`
/// family is deliberately not sent.
///
/// When tiers nest, the tier closest to the route stamps first on the
/// way back out and owns the headers; outer tiers leave them alone.
fn apply_rate_headers(response: &mut Response, admission: &Admission) {
    let headers = response.headers_mut();
    if headers.contains_key("ratelimit-limit") {
        return;
    }
    headers.insert(
        HeaderName::from_static("ratelimit-limit"),
        HeaderValue::from(admission.limit),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-remaining"),
        HeaderValue::from(admission.remaining),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-reset"),
        HeaderValue::from(admission.reset_in.as_secs()),
    );
}

/// Address the window is accounted under.
///
/// With `trusted_hops` proxies in front, the client is that many
/// entries from the right of `X-Forwarded-For`; anything further left
/// is client-controlled and ignored. Without the header the transport
/// peer address is used, and `"unknown"` pools whatever is left.
fn client_key(req: &Request<Body>, trusted_hops: usize) -> String {
    if trusted_hops > 0 {
        if let Some(forwarded) = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
        {
            let entries: Vec<&str> = forwarded
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .collect();
            if !entries.is_empty() {
                let index = entries.len().saturating_sub(trusted_hops);
                return entries[index].to_owned();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn request_with(xff: Option<&str>, peer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/clients");
        if let Some(xff) = xff {
            builder = builder.header("x-forwarded-for", xff);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            req.extensions_mut().insert(ConnectInfo(addr));
        }
        req
    }

    #[test]
    fn key_uses_the_sole_forwarded_entry() {
        let req = request_with(Some("203.0.113.7"), None);
        assert_eq!(client_key(&req, 1), "203.0.113.7");
    }

    #[test]
    fn key_ignores_client_controlled_forwarded_prefix() {
        let req = request_with(Some("6.6.6.6, 4.4.4.4, 203.0.113.7"), None);
        assert_eq!(client_key(&req, 1), "203.0.113.7");
    }

    #[test]
    fn key_steps_past_additional_trusted_proxies() {
        let req = request_with(Some("6.6.6.6, 203.0.113.7, 10.0.0.2"), None);
        assert_eq!(client_key(&req, 2), "203.0.113.7");
    }

    #[test]
    fn key_falls_back_to_the_peer_address() {
        let req = request_with(None, Some("192.0.2.9:55012"));
        assert_eq!(client_key(&req, 1), "192.0.2.9");
    }

    #[test]
    fn key_is_unknown_without_header_or_peer() {
        let req = request_with(None, None);
        assert_eq!(client_key(&req, 1), "unknown");
    }

    #[test]
    fn zero_trusted_hops_ignores_the_header() {
        let req = request_with(Some("6.6.6.6"), Some("192.0.2.9:55012"));
        assert_eq!(client_key(&req, 0), "192.0.2.9");
    }

    fn tiny_policy() -> RatePolicy {
        RatePolicy {
            max_count: 2,
            ..RatePolicy::general()
        }
    }

    #[tokio::test]
    async fn rejects_with_policy_body_once_the_window_fills() {
        let tracker = Arc::new(FixedWindowTracker::new());
        let service = RateLimitLayer::new(tracker, tiny_policy()).layer(tower::service_fn(
            |_req: Request<Body>| async { Ok::<_, Infallible>(StatusCode::OK.into_response()) },
        ));

        for _ in 0..2 {
            let response = service
                .clone()
                .oneshot(request_with(Some("198.51.100.1"), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = service
            .clone()
            .oneshot(request_with(Some("198.51.100.1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["ratelimit-remaining"], "0");
        assert!(response.headers().contains_key("retry-after"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "Too many requests from this IP, please try again later."
        );
        assert_eq!(json["retryAfter"], "15 minutes");
    }

    #[tokio::test]
    async fn admitted_responses_carry_standard_headers_only() {
        let tracker = Arc::new(FixedWindowTracker::new());
        let service = RateLimitLayer::new(tracker, tiny_policy()).layer(tower::service_fn(
            |_req: Request<Body>| async { Ok::<_, Infallible>(StatusCode::OK.into_response()) },
        ));

        let response = service
            .clone()
            .oneshot(request_with(Some("198.51.100.2"), None))
            .await
            .unwrap();

        assert_eq!(response.headers()["ratelimit-limit"], "2");
        assert_eq!(response.headers()["ratelimit-remaining"], "1");
        assert!(response.headers().contains_key("ratelimit-reset"));
        assert!(!response.headers().contains_key("x-ratelimit-limit"));
    }

    #[tokio::test]
    async fn failed_responses_exhaust_an_outcome_discriminating_tier() {
        let tracker = Arc::new(FixedWindowTracker::new());
        let service = RateLimitLayer::new(tracker, RatePolicy::auth()).layer(tower::service_fn(
            |_req: Request<Body>| async {
                Ok::<_, Infallible>(ApiError::InvalidCredentials.into_response())
            },
        ));

        for _ in 0..5 {
            let response = service
                .clone()
                .oneshot(request_with(Some("198.51.100.3"), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = service
            .clone()
            .oneshot(request_with(Some("198.51.100.3"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn the_innermost_tier_owns_the_headers() {
        let outer = Arc::new(FixedWindowTracker::new());
        let inner = Arc::new(FixedWindowTracker::new());
        let service = RateLimitLayer::new(outer, RatePolicy::general()).layer(
            RateLimitLayer::new(inner, tiny_policy()).layer(tower::service_fn(
                |_req: Request<Body>| async { Ok::<_, Infallible>(StatusCode::OK.into_response()) },
            )),
        );

        let response = service
            .clone()
            .oneshot(request_with(Some("198.51.100.5"), None))
            .await
            .unwrap();

        assert_eq!(response.headers()["ratelimit-limit"], "2");
        assert_eq!(response.headers()["ratelimit-remaining"], "1");
    }

    #[tokio::test]
    async fn successful_responses_never_exhaust_the_auth_tier() {
        let tracker = Arc::new(FixedWindowTracker::new());
        let service = RateLimitLayer::new(tracker, RatePolicy::auth()).layer(tower::service_fn(
            |_req: Request<Body>| async { Ok::<_, Infallible>(StatusCode::OK.into_response()) },
        ));

        for _ in 0..20 {
            let response = service
                .clone()
                .oneshot(request_with(Some("198.51.100.4"), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
