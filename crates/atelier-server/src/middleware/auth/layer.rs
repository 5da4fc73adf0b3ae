//! Access gate middleware.
//!
//! Per-request pipeline with terminal stages: extract the bearer token,
//! verify it, resolve the subject to a live user, attach the user to the
//! request, and (where layered) enforce a required role. The first failing
//! stage writes the response; no handler runs after a failure.

use super::{jwt::TokenCodec, resolver::IdentityResolver, types::CurrentUser};
use crate::error::ApiError;
use crate::models::Role;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

/// Authentication layer: verifies the bearer token and attaches the resolved
/// user to request extensions.
#[derive(Clone)]
pub struct AuthLayer {
    codec: Arc<TokenCodec>,
    resolver: IdentityResolver,
}

impl AuthLayer {
    /// Build the gate from its codec and resolver.
    pub fn new(codec: Arc<TokenCodec>, resolver: IdentityResolver) -> Self {
        Self { codec, resolver }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            codec: self.codec.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

/// Authentication middleware service.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    codec: Arc<TokenCodec>,
    resolver: IdentityResolver,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let codec = self.codec.clone();
        let resolver = self.resolver.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = match extract_bearer(&req) {
                Some(token) => token,
                None => return Ok(ApiError::NoToken.into_response()),
            };

            // Malformed, expired, and forged all collapse to the same reply.
            let subject = match codec.verify(&token) {
                Ok(subject) => subject,
                Err(_) => return Ok(ApiError::InvalidToken.into_response()),
            };

            let user = match resolver.resolve(subject).await {
                Ok(user) => user,
                Err(err) => return Ok(err.into_response()),
            };

            req.extensions_mut().insert(CurrentUser(user));
            inner.call(req).await
        })
    }
}

/// Pull the token out of `Authorization: Bearer <token>`. Anything else,
/// including a header in another scheme, counts as no credential presented.
fn extract_bearer(req: &Request<Body>) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Role enforcement layer. Must sit inside [`AuthLayer`]; it reads the user
/// the gate attached.
#[derive(Clone)]
pub struct RequireRoleLayer {
    role: Role,
}

impl RequireRoleLayer {
    /// Require the given role.
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Require the admin role.
    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }
}

impl<S> Layer<S> for RequireRoleLayer {
    type Service = RequireRoleMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireRoleMiddleware {
            inner,
            role: self.role,
        }
    }
}

/// Role enforcement middleware service.
#[derive(Clone)]
pub struct RequireRoleMiddleware<S> {
    inner: S,
    role: Role,
}

impl<S> Service<Request<Body>> for RequireRoleMiddleware<S>
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
        let role = self.role;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match req.extensions().get::<CurrentUser>() {
                None => {
                    warn!("role check reached without authentication");
                    Ok(ApiError::NoToken.into_response())
                }
                Some(current) if current.0.role == role => inner.call(req).await,
                Some(current) => {
                    warn!(
                        user_id = %current.0.id,
                        required = role.as_str(),
                        actual = current.0.role.as_str(),
                        "role check failed"
                    );
                    Ok(ApiError::Forbidden.into_response())
                }
            }
        })
    }
}
