use axum::{
    body::Body,
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    crypto::csrf::{CSRF_COOKIE, CSRF_HEADER, tokens_match},
    error::AppError,
};

/// A middleware that checks the double-submitted CSRF token on mutating
/// requests.
pub async fn verify_csrf(cookies: Cookies, req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::GET
        || req.method() == Method::HEAD
        || req.method() == Method::OPTIONS
    {
        return next.run(req).await;
    }

    let Some(cookie) = cookies.get(CSRF_COOKIE).map(|c| c.value().to_string()) else {
        tracing::warn!("❌ CSRF: cookie missing");
        return AppError::Forbidden("Missing CSRF token cookie".to_string()).into_response();
    };

    let Some(header) = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("❌ CSRF: header missing or malformed");
        return AppError::Forbidden("Missing CSRF token header".to_string()).into_response();
    };

    if !tokens_match(&cookie, header) {
        tracing::warn!("❌ CSRF: tokens do not match");
        return AppError::Forbidden("CSRF token mismatch".to_string()).into_response();
    }

    next.run(req).await
}
