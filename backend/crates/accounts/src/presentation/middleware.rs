//! Accounts Middleware
//!
//! Bearer-token authentication and per-route-class rate limiting.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;

use platform::client::{client_key, extract_client_ip};
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};

use crate::application::token::{TokenClaims, TokenIssuer};
use crate::domain::value_object::PublicId;
use crate::error::AccountError;

/// Authenticated subject stored in request extensions by [`require_account`]
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub public_id: PublicId,
    pub claims: TokenClaims,
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Middleware that requires a valid bearer token
///
/// On success the verified subject is stored in request extensions for
/// downstream handlers.
pub async fn require_account(
    State(tokens): State<Arc<TokenIssuer>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_bearer_token(req.headers()) {
        Some(token) => token,
        None => {
            return Err((StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")])
                .into_response());
        }
    };

    let claims = match tokens.verify(&token) {
        Ok(claims) => claims,
        Err(e) => return Err(AccountError::from(e).into_response()),
    };

    req.extensions_mut().insert(Authenticated {
        public_id: claims.subject,
        claims,
    });

    Ok(next.run(req).await)
}

// ============================================================================
// Rate limiting
// ============================================================================

/// State for one rate-limited route class
///
/// The limiter is an injected instance owned by the router, not a
/// module-level global, so tests and deployments can swap the backing
/// store freely.
pub struct RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    pub limiter: Arc<S>,
    pub config: RateLimitConfig,
}

impl<S> RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    pub fn new(limiter: Arc<S>, config: RateLimitConfig) -> Self {
        Self { limiter, config }
    }
}

impl<S> Clone for RateLimitState<S>
where
    S: RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }
    }
}

/// Middleware enforcing a fixed-window rate limit keyed by client address
///
/// Allowed requests carry quota metadata in X-RateLimit-* headers;
/// rejected requests get 429 with a Retry-After hint.
pub async fn enforce_rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: RateLimitStore + Send + Sync + 'static,
{
    let client_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let client_ip = extract_client_ip(req.headers(), client_ip);
    let key = client_key(client_ip);

    let result = match state.limiter.check_and_increment(&key, &state.config).await {
        Ok(result) => result,
        Err(e) => {
            // Fail open: a broken limiter must not take the API down
            tracing::error!(error = %e, "Rate limit store failure, allowing request");
            return next.run(req).await;
        }
    };

    if !result.allowed {
        let now_ms = Utc::now().timestamp_millis();
        let mut response = AccountError::RateLimited {
            retry_after_secs: result.retry_after_secs(now_ms),
        }
        .into_response();
        apply_rate_limit_headers(&mut response, &result);
        return response;
    }

    let mut response = next.run(req).await;
    apply_rate_limit_headers(&mut response, &result);
    response
}

fn apply_rate_limit_headers(response: &mut Response, result: &RateLimitResult) {
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&result.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&result.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", value);
    }
    // Reset time as Unix epoch seconds
    if let Ok(value) = HeaderValue::from_str(&(result.reset_at_ms / 1000).to_string()) {
        headers.insert("X-RateLimit-Reset", value);
    }
}
