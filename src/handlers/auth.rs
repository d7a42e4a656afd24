use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    config::Config,
    crypto::csrf::{CSRF_COOKIE, generate_csrf_token},
    crypto::session::SESSION_COOKIE,
    error::Result,
    handlers::response::MessageResponse,
    models::session::AdminUser,
    services::auth as auth_service,
    state::AppState,
    validation::auth::normalize_email,
};

/// The request payload for admin login.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1, max = 128))]
    pub password: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: AdminUser,
    pub csrf_token: String,
}

/// Creates a cookie scoped to the whole site. Everything but the CSRF
/// cookie is http-only.
fn create_secure_cookie(
    config: &Config,
    name: &'static str,
    value: String,
    max_age: Duration,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    if name != CSRF_COOKIE {
        cookie.set_http_only(true);
    }

    if config.environment.is_production() {
        cookie.set_secure(true);
    }

    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(max_age);
    cookie.set_path("/");

    cookie
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookie
}

/// Handles admin login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    let (user, token) =
        auth_service::login(&state.db, &state.sessions, &email, &payload.password).await?;

    let lifetime = Duration::seconds(state.sessions.max_age().as_secs() as i64);
    cookies.add(create_secure_cookie(
        &state.config,
        SESSION_COOKIE,
        token,
        lifetime,
    ));

    let csrf_token = generate_csrf_token()?;
    cookies.add(create_secure_cookie(
        &state.config,
        CSRF_COOKIE,
        csrf_token.clone(),
        lifetime,
    ));
    tracing::debug!("✅ Session and CSRF cookies set for {}", user.id);

    let response = LoginResponse {
        success: true,
        user,
        csrf_token,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles admin logout by expiring both cookies.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Result<Response> {
    cookies.remove(expired_cookie(SESSION_COOKIE));
    cookies.remove(expired_cookie(CSRF_COOKIE));
    tracing::info!("👋 Admin logged out");

    Ok((StatusCode::OK, Json(MessageResponse::ok("Logout successful"))).into_response())
}

/// Returns the admin the session belongs to.
#[axum::debug_handler]
pub async fn me(Extension(admin): Extension<AdminUser>) -> Json<AdminUser> {
    Json(admin)
}
