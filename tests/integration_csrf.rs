use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn,
    routing::post,
};
use medcode_site::{
    crypto::csrf::{CSRF_COOKIE, CSRF_HEADER, generate_csrf_token},
    middleware_layer::csrf::verify_csrf,
};
use tower::ServiceExt;
use tower_cookies::CookieManagerLayer;

fn app() -> Router {
    Router::new()
        .route("/mutate", post(|| async { "done" }).get(|| async { "read" }))
        .route_layer(from_fn(verify_csrf))
        .layer(CookieManagerLayer::new())
}

fn request(method: &str, cookie: Option<&str>, header_value: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri("/mutate");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, format!("{CSRF_COOKIE}={cookie}"));
    }
    if let Some(value) = header_value {
        builder = builder.header(CSRF_HEADER, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn safe_methods_are_exempt() {
        let response = app().oneshot(request("GET", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn matching_token_passes() {
        let token = generate_csrf_token().unwrap();
        let response = app()
            .oneshot(request("POST", Some(&token), Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_or_mismatched_tokens_are_forbidden() {
        let token = generate_csrf_token().unwrap();
        let other = generate_csrf_token().unwrap();

        for req in [
            request("POST", None, Some(&token)),
            request("POST", Some(&token), None),
            request("POST", Some(&token), Some(&other)),
        ] {
            let response = app().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
