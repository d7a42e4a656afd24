use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    crypto::session::SESSION_COOKIE,
    error::AppError,
    services::auth::authorize,
    state::AppState,
};

/// A middleware that requires a valid admin session.
///
/// On success the `AdminUser` is inserted into the request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string());

    let admin = authorize(&state.sessions, &state.db, token.as_deref()).await?;
    tracing::debug!("✅ Admin authenticated: {}", admin.id);

    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}
