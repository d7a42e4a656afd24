use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    content::{markdown, text},
    db::column,
    error::{AppError, Result},
};

/// A blog ("resources") post as stored.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image: Option<String>,
    pub category: String,
    pub author: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for BlogPost {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: column(row, "id")?,
            slug: column(row, "slug")?,
            title: column(row, "title")?,
            excerpt: column(row, "excerpt")?,
            content: column(row, "content")?,
            image: column(row, "image")?,
            category: column(row, "category")?,
            author: column(row, "author")?,
            tags: column(row, "tags")?,
            published: column(row, "published")?,
            date: column(row, "date")?,
            created_by: column(row, "created_by")?,
            updated_by: column(row, "updated_by")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

/// The fields of a new post.
#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image: Option<String>,
    pub category: String,
    pub author: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub date: Option<DateTime<Utc>>,
}

/// A partial update. `None` keeps the stored value.
///
/// `excerpt` and `image` are clearable: `Some(None)` stores NULL.
#[derive(Debug, Clone, Default)]
pub struct BlogPostChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub image: Option<Option<String>>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

/// A published post as shown on the public site.
#[derive(Debug, Clone, Serialize)]
pub struct PublicBlogPost {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub read_time: String,
    pub category: String,
    pub image: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
}

impl PublicBlogPost {
    /// A listing entry, without the rendered body.
    pub fn summary(post: &BlogPost) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            date: post.date.format("%Y-%m-%d").to_string(),
            read_time: text::read_time(&post.content),
            category: post.category.clone(),
            image: post.image.clone(),
            author: post.author.clone(),
            tags: post.tags.clone(),
            content_html: None,
        }
    }

    /// A full entry with the body rendered to HTML.
    pub fn detail(post: &BlogPost) -> Self {
        Self {
            content_html: Some(markdown::render(&post.content)),
            ..Self::summary(post)
        }
    }
}
