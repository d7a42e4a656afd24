use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use garde::Validate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    content::text::non_blank,
    error::Result,
    handlers::blog::{ListQuery, deserialize_clearable},
    handlers::response::MessageResponse,
    models::career::{CareerPostChanges, NewCareerPost},
    models::session::AdminUser,
    services::career as career_service,
    state::AppState,
    validation::content::{validate_optional_slug, validate_slug},
};

const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCareerRequest {
    #[garde(custom(validate_slug), length(max = 200))]
    pub slug: String,
    #[garde(length(min = 1, max = 300))]
    pub title: String,
    #[garde(length(max = 1000))]
    pub excerpt: Option<String>,
    #[garde(length(min = 1))]
    pub content: String,
    #[garde(length(max = 200))]
    pub location: Option<String>,
    #[garde(length(max = 100))]
    pub employment_type: Option<String>,
    #[garde(length(max = 200))]
    pub department: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub published: bool,
}

/// Sending `null` or a blank string for `excerpt`, `location` or
/// `department` clears it.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCareerRequest {
    #[garde(custom(validate_optional_slug), length(max = 200))]
    pub slug: Option<String>,
    #[garde(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    #[garde(length(max = 1000))]
    pub excerpt: Option<Option<String>>,
    #[garde(length(min = 1))]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    #[garde(length(max = 200))]
    pub location: Option<Option<String>>,
    #[garde(length(max = 100))]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    #[garde(length(max = 200))]
    pub department: Option<Option<String>>,
    #[garde(skip)]
    pub published: Option<bool>,
}

impl From<CreateCareerRequest> for NewCareerPost {
    fn from(req: CreateCareerRequest) -> Self {
        Self {
            slug: req.slug,
            title: req.title.trim().to_string(),
            excerpt: non_blank(req.excerpt),
            content: req.content,
            location: non_blank(req.location),
            employment_type: non_blank(req.employment_type)
                .unwrap_or_else(|| DEFAULT_EMPLOYMENT_TYPE.to_string()),
            department: non_blank(req.department),
            published: req.published,
        }
    }
}

impl From<UpdateCareerRequest> for CareerPostChanges {
    fn from(req: UpdateCareerRequest) -> Self {
        Self {
            slug: req.slug,
            title: req.title.map(|t| t.trim().to_string()),
            excerpt: req.excerpt.map(non_blank),
            content: req.content,
            location: req.location.map(non_blank),
            employment_type: non_blank(req.employment_type),
            department: req.department.map(non_blank),
            published: req.published,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let posts = career_service::list(&state.db, query.published).await?;
    Ok(Json(posts).into_response())
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let post = career_service::get(&state.db, &id).await?;
    Ok(Json(post).into_response())
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Json(payload): Json<CreateCareerRequest>,
) -> Result<Response> {
    payload.validate()?;
    let post = career_service::create(&state.db, payload.into(), &admin).await?;
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCareerRequest>,
) -> Result<Response> {
    payload.validate()?;
    let post = career_service::update(&state.db, &id, payload.into(), &admin).await?;
    Ok(Json(post).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    career_service::delete(&state.db, &id, &admin).await?;
    Ok(Json(MessageResponse::ok("Career post deleted")).into_response())
}
