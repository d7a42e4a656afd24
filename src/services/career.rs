use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::career::{CareerPost, CareerPostChanges, NewCareerPost, PublicCareerPost},
    models::session::AdminUser,
    repositories::career as career_repo,
};

const DUPLICATE_SLUG: &str = "A career post with this slug already exists";

/// Published openings for the public listing, newest first.
pub async fn published(pool: &Pool) -> Result<Vec<PublicCareerPost>> {
    let posts = career_repo::list(pool, Some(true)).await?;
    Ok(posts.iter().map(PublicCareerPost::summary).collect())
}

/// A published opening with its body rendered to HTML.
pub async fn published_by_slug(pool: &Pool, slug: &str) -> Result<PublicCareerPost> {
    career_repo::find_published_by_slug(pool, slug)
        .await?
        .map(|post| PublicCareerPost::detail(&post))
        .ok_or(AppError::NotFound("Career post"))
}

pub async fn list(pool: &Pool, published: Option<bool>) -> Result<Vec<CareerPost>> {
    career_repo::list(pool, published).await
}

pub async fn get(pool: &Pool, id: &Uuid) -> Result<CareerPost> {
    career_repo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("Career post"))
}

pub async fn create(pool: &Pool, post: NewCareerPost, author: &AdminUser) -> Result<CareerPost> {
    if career_repo::slug_taken(pool, &post.slug, None).await? {
        return Err(AppError::Conflict(DUPLICATE_SLUG.to_string()));
    }

    let created = career_repo::create(pool, &post, &author.id).await?;
    tracing::info!("💼 Career post created: {} by {}", created.slug, author.email);
    Ok(created)
}

pub async fn update(
    pool: &Pool,
    id: &Uuid,
    changes: CareerPostChanges,
    editor: &AdminUser,
) -> Result<CareerPost> {
    if let Some(slug) = &changes.slug {
        if career_repo::slug_taken(pool, slug, Some(id)).await? {
            return Err(AppError::Conflict(DUPLICATE_SLUG.to_string()));
        }
    }

    let updated = career_repo::update(pool, id, &changes, &editor.id)
        .await?
        .ok_or(AppError::NotFound("Career post"))?;
    tracing::info!("✏️ Career post updated: {} by {}", updated.slug, editor.email);
    Ok(updated)
}

pub async fn delete(pool: &Pool, id: &Uuid, editor: &AdminUser) -> Result<()> {
    if !career_repo::delete(pool, id).await? {
        return Err(AppError::NotFound("Career post"));
    }
    tracing::info!("🗑️ Career post deleted: {} by {}", id, editor.email);
    Ok(())
}
