use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::{
    content::text::non_blank,
    error::Result,
    handlers::response::MessageResponse,
    models::blog::{BlogPostChanges, NewBlogPost},
    models::session::AdminUser,
    services::blog as blog_service,
    state::AppState,
    validation::content::{validate_optional_slug, validate_slug},
};

const DEFAULT_CATEGORY: &str = "Blog";
const DEFAULT_AUTHOR: &str = "Elite Surgical Coders";

#[derive(Deserialize)]
pub struct ListQuery {
    pub published: Option<bool>,
}

/// The request payload for a new post.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[garde(custom(validate_slug), length(max = 200))]
    pub slug: String,
    #[garde(length(min = 1, max = 300))]
    pub title: String,
    #[garde(length(max = 1000))]
    pub excerpt: Option<String>,
    #[garde(length(min = 1))]
    pub content: String,
    #[garde(length(max = 1000))]
    pub image: Option<String>,
    #[garde(length(max = 100))]
    pub category: Option<String>,
    #[garde(length(max = 200))]
    pub author: Option<String>,
    #[serde(default)]
    #[garde(length(max = 50))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[garde(skip)]
    pub published: bool,
    #[garde(skip)]
    pub date: Option<DateTime<Utc>>,
}

/// Keeps an explicit `null` apart from an omitted field.
///
/// Omitted is `None`, `null` is `Some(None)`. Pair with `#[serde(default)]`.
pub(crate) fn deserialize_clearable<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// The request payload for a partial update.
///
/// Sending `null` or a blank string for `excerpt` or `image` clears it.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
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
    #[garde(length(max = 1000))]
    pub image: Option<Option<String>>,
    #[garde(length(max = 100))]
    pub category: Option<String>,
    #[garde(length(max = 200))]
    pub author: Option<String>,
    #[garde(length(max = 50))]
    pub tags: Option<Vec<String>>,
    #[garde(skip)]
    pub published: Option<bool>,
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl From<CreateBlogRequest> for NewBlogPost {
    fn from(req: CreateBlogRequest) -> Self {
        Self {
            slug: req.slug,
            title: req.title.trim().to_string(),
            excerpt: non_blank(req.excerpt),
            content: req.content,
            image: non_blank(req.image),
            category: non_blank(req.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            author: non_blank(req.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            tags: clean_tags(req.tags),
            published: req.published,
            date: req.date,
        }
    }
}

impl From<UpdateBlogRequest> for BlogPostChanges {
    fn from(req: UpdateBlogRequest) -> Self {
        Self {
            slug: req.slug,
            title: req.title.map(|t| t.trim().to_string()),
            excerpt: req.excerpt.map(non_blank),
            content: req.content,
            image: req.image.map(non_blank),
            category: non_blank(req.category),
            author: non_blank(req.author),
            tags: req.tags.map(clean_tags),
            published: req.published,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let posts = blog_service::list(&state.db, query.published).await?;
    Ok(Json(posts).into_response())
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let post = blog_service::get(&state.db, &id).await?;
    Ok(Json(post).into_response())
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<Response> {
    payload.validate()?;
    let post = blog_service::create(&state.db, payload.into(), &admin).await?;
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Response> {
    payload.validate()?;
    let post = blog_service::update(&state.db, &id, payload.into(), &admin).await?;
    Ok(Json(post).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    blog_service::delete(&state.db, &id, &admin).await?;
    Ok(Json(MessageResponse::ok("Blog post deleted")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateBlogRequest {
        CreateBlogRequest {
            slug: "denial-management".to_string(),
            title: "  Denial Management  ".to_string(),
            excerpt: Some("   ".to_string()),
            content: "# Heading".to_string(),
            image: None,
            category: None,
            author: Some("".to_string()),
            tags: vec![" coding ".to_string(), "".to_string()],
            published: true,
            date: None,
        }
    }

    #[test]
    fn new_posts_get_defaults_and_trimmed_fields() {
        let post = NewBlogPost::from(request());
        assert_eq!(post.title, "Denial Management");
        assert_eq!(post.excerpt, None);
        assert_eq!(post.category, "Blog");
        assert_eq!(post.author, "Elite Surgical Coders");
        assert_eq!(post.tags, vec!["coding".to_string()]);
    }

    #[test]
    fn invalid_slugs_fail_validation() {
        let mut req = request();
        req.slug = "Denial Management".to_string();
        assert!(req.validate().is_err());
        assert!(request().validate().is_ok());
    }

    #[test]
    fn updates_keep_omitted_fields() {
        let req: UpdateBlogRequest =
            serde_json::from_str(r#"{"title":"New title","published":false}"#).unwrap();
        assert!(req.validate().is_ok());
        let changes = BlogPostChanges::from(req);
        assert_eq!(changes.title.as_deref(), Some("New title"));
        assert_eq!(changes.published, Some(false));
        assert!(changes.slug.is_none());
        assert!(changes.content.is_none());
        assert!(changes.image.is_none());
        assert!(changes.excerpt.is_none());
    }

    #[test]
    fn blank_or_null_clears_image_and_excerpt() {
        let req: UpdateBlogRequest =
            serde_json::from_str(r#"{"image":"","excerpt":null}"#).unwrap();
        assert!(req.validate().is_ok());
        let changes = BlogPostChanges::from(req);
        assert_eq!(changes.image, Some(None));
        assert_eq!(changes.excerpt, Some(None));
    }

    #[test]
    fn new_image_replaces_the_stored_one() {
        let req: UpdateBlogRequest =
            serde_json::from_str(r#"{"image":"/uploads/images/cover.png"}"#).unwrap();
        let changes = BlogPostChanges::from(req);
        assert_eq!(
            changes.image,
            Some(Some("/uploads/images/cover.png".to_string()))
        );
        assert!(changes.excerpt.is_none());
    }
}
