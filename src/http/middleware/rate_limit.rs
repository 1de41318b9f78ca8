use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;

use crate::app::error::ServiceError;
use crate::app::rate_limiter::RateLimiter;
use crate::http::AppError;
use crate::AppState;

/// IP-based rate limiting for the credential endpoints (signup, login).
/// Requests without connection info share the "unknown" bucket.
pub async fn ip_rate_limit_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let rule = state
        .auth_limits
        .rule_for(request.uri().path(), request.method().as_str());

    let (action, limit, window) = match rule {
        Some(rule) => rule,
        None => return Ok(next.run(request).await),
    };

    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let rate_limiter = RateLimiter::new(state.cache.clone());

    let is_limited = rate_limiter
        .check_ip_rate_limit(&ip, action, limit, window)
        .await
        .map_err(|err| AppError::from_service(ServiceError::from(err), "checking rate limit"))?;

    if is_limited {
        tracing::warn!(ip = ip, action = action, "IP rate limit exceeded");
        return Err(AppError::rate_limited(
            "Too many attempts from your IP address. Please try again later.",
        ));
    }

    if let Err(err) = rate_limiter.increment_ip(&ip, action, window).await {
        tracing::warn!(error = ?err, "failed to increment IP rate limit counter");
    }

    Ok(next.run(request).await)
}
