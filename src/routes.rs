use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use http::{HeaderName, HeaderValue, Method, header};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    crypto::csrf::CSRF_HEADER,
    handlers, middleware_layer,
    middleware_layer::rate_limit::{limit_forms, limit_login},
    services::uploads::{IMAGE, RESUME},
    state::AppState,
};

/// Headroom for multipart framing on top of the file size limits.
const MULTIPART_OVERHEAD: usize = 64 * 1024;
/// Body limit for JSON endpoints.
const JSON_BODY_LIMIT: usize = 1024 * 1024;

fn cors(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        state.config.site_url.as_str(),
        "http://localhost:3000",
        "http://127.0.0.1:3000",
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            HeaderName::from_static(CSRF_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Builds the full application router.
pub fn build(state: AppState) -> Router {
    let rate_limit = state.config.rate_limit;
    let limited = |router: Router<AppState>, f: fn(Router<AppState>) -> Router<AppState>| {
        if rate_limit { f(router) } else { router }
    };

    let public_routes: Router<AppState> = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/resources", get(handlers::public::resources))
        .route("/api/resources/{slug}", get(handlers::public::resource))
        .route("/api/careers", get(handlers::public::careers))
        .route("/api/careers/{slug}", get(handlers::public::career))
        .route("/api/admin/logout", post(handlers::auth::logout));

    let login_routes = limited(
        Router::new().route("/api/admin/login", post(handlers::auth::login)),
        limit_login,
    );

    let form_routes = limited(
        Router::new()
            .route("/api/contact", post(handlers::contact::submit))
            .route("/api/applications", post(handlers::application::submit)),
        limit_forms,
    );

    let resume_routes = limited(
        Router::new()
            .route("/api/upload/resume", post(handlers::uploads::upload_resume))
            .layer(DefaultBodyLimit::max(RESUME.max_bytes + MULTIPART_OVERHEAD)),
        limit_forms,
    );

    let admin_routes: Router<AppState> = Router::new()
        .route("/api/admin/me", get(handlers::auth::me))
        .route(
            "/api/admin/blogs",
            get(handlers::blog::list).post(handlers::blog::create),
        )
        .route(
            "/api/admin/blogs/{id}",
            get(handlers::blog::get)
                .put(handlers::blog::update)
                .delete(handlers::blog::delete),
        )
        .route(
            "/api/admin/careers",
            get(handlers::career::list).post(handlers::career::create),
        )
        .route(
            "/api/admin/careers/{id}",
            get(handlers::career::get)
                .put(handlers::career::update)
                .delete(handlers::career::delete),
        )
        .route("/api/admin/applications", get(handlers::application::list))
        .route(
            "/api/admin/applications/{id}",
            get(handlers::application::get).put(handlers::application::review),
        )
        .route(
            "/api/admin/upload",
            post(handlers::uploads::upload_image)
                .layer(DefaultBodyLimit::max(IMAGE.max_bytes + MULTIPART_OVERHEAD)),
        )
        .route_layer(from_fn(middleware_layer::csrf::verify_csrf))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_admin,
        ));

    let uploads = ServeDir::new(&state.config.upload_dir);
    let site = ServeDir::new(&state.config.public_dir);

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(form_routes)
        .merge(resume_routes)
        .merge(admin_routes)
        .nest_service("/uploads", uploads)
        .fallback_service(site)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().level(Level::INFO))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CompressionLayer::new())
        .layer(CookieManagerLayer::new())
        .layer(cors(&state))
        .with_state(state)
}
