use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    error::Result,
    services::{blog as blog_service, career as career_service},
    state::AppState,
};

/// Published blog posts.
pub async fn resources(State(state): State<AppState>) -> Result<Response> {
    Ok(Json(blog_service::published(&state.db).await?).into_response())
}

/// One published blog post with rendered HTML.
pub async fn resource(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    Ok(Json(blog_service::published_by_slug(&state.db, &slug).await?).into_response())
}

/// Published career openings.
pub async fn careers(State(state): State<AppState>) -> Result<Response> {
    Ok(Json(career_service::published(&state.db).await?).into_response())
}

/// One published career opening with rendered HTML.
pub async fn career(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    Ok(Json(career_service::published_by_slug(&state.db, &slug).await?).into_response())
}
