use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    content::markdown,
    db::column,
    error::{AppError, Result},
};

/// A career posting as stored.
#[derive(Debug, Clone, Serialize)]
pub struct CareerPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub location: Option<String>,
    pub employment_type: String,
    pub department: Option<String>,
    pub published: bool,
    pub date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for CareerPost {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: column(row, "id")?,
            slug: column(row, "slug")?,
            title: column(row, "title")?,
            excerpt: column(row, "excerpt")?,
            content: column(row, "content")?,
            location: column(row, "location")?,
            employment_type: column(row, "employment_type")?,
            department: column(row, "department")?,
            published: column(row, "published")?,
            date: column(row, "date")?,
            created_by: column(row, "created_by")?,
            updated_by: column(row, "updated_by")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

/// The fields of a new posting.
#[derive(Debug, Clone)]
pub struct NewCareerPost {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub location: Option<String>,
    pub employment_type: String,
    pub department: Option<String>,
    pub published: bool,
}

/// A partial update. `None` keeps the stored value.
///
/// `excerpt`, `location` and `department` are clearable: `Some(None)` stores NULL.
#[derive(Debug, Clone, Default)]
pub struct CareerPostChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub location: Option<Option<String>>,
    pub employment_type: Option<String>,
    pub department: Option<Option<String>>,
    pub published: Option<bool>,
}

/// A published posting as shown on the public site.
#[derive(Debug, Clone, Serialize)]
pub struct PublicCareerPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub location: Option<String>,
    pub employment_type: String,
    pub department: Option<String>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
}

impl PublicCareerPost {
    pub fn summary(post: &CareerPost) -> Self {
        Self {
            id: post.id,
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            location: post.location.clone(),
            employment_type: post.employment_type.clone(),
            department: post.department.clone(),
            date: post.date.format("%Y-%m-%d").to_string(),
            content_html: None,
        }
    }

    pub fn detail(post: &CareerPost) -> Self {
        Self {
            content_html: Some(markdown::render(&post.content)),
            ..Self::summary(post)
        }
    }
}
