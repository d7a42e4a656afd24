use std::sync::Arc;

use axum::{
    Router,
    response::{IntoResponse, Response},
};
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::{error::AppError, state::AppState};

/// Seconds between replenished requests on login.
const LOGIN_REPLENISH_SECS: u64 = 12;
const LOGIN_BURST: u32 = 5;

/// Seconds between replenished requests on the public forms and uploads.
const FORMS_REPLENISH_SECS: u64 = 6;
const FORMS_BURST: u32 = 10;

/// Wraps `router` in a per-IP limiter that allows `burst` requests and then
/// one more every `replenish_secs` seconds.
///
/// Requires the server to provide `ConnectInfo<SocketAddr>`.
fn per_ip(router: Router<AppState>, replenish_secs: u64, burst: u32) -> Router<AppState> {
    match GovernorConfigBuilder::default()
        .per_second(replenish_secs)
        .burst_size(burst)
        .use_headers()
        .finish()
    {
        Some(conf) => {
            router.layer(GovernorLayer::new(Arc::new(conf)).error_handler(governor_error))
        }
        None => {
            tracing::error!("❌ Invalid rate limit configuration, limiter disabled");
            router
        }
    }
}

/// Renders a limiter rejection as an `AppError` body, keeping the
/// `retry-after` and `x-ratelimit-*` headers.
fn governor_error(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = AppError::RateLimitExceeded(format!(
                "Too many requests. Try again in {} seconds.",
                wait_time
            ))
            .into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            AppError::Internal("Rate limiter could not determine the client address".to_string())
                .into_response()
        }
        GovernorError::Other { msg, .. } => {
            AppError::Internal(msg.unwrap_or_else(|| "Rate limiter failure".to_string()))
                .into_response()
        }
    }
}

pub fn limit_login(router: Router<AppState>) -> Router<AppState> {
    per_ip(router, LOGIN_REPLENISH_SECS, LOGIN_BURST)
}

pub fn limit_forms(router: Router<AppState>) -> Router<AppState> {
    per_ip(router, FORMS_REPLENISH_SECS, FORMS_BURST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, StatusCode, header};

    #[test]
    fn rejections_are_429_with_retry_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("4"));

        let response = governor_error(GovernorError::TooManyRequests {
            wait_time: 4,
            headers: Some(headers),
        });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "4");
    }

    #[test]
    fn missing_peer_address_is_a_server_error() {
        let response = governor_error(GovernorError::UnableToExtractKey);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
