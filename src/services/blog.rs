use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::blog::{BlogPost, BlogPostChanges, NewBlogPost, PublicBlogPost},
    models::session::AdminUser,
    repositories::blog as blog_repo,
};

const DUPLICATE_SLUG: &str = "A blog post with this slug already exists";

/// Published posts for the public listing, newest first.
pub async fn published(pool: &Pool) -> Result<Vec<PublicBlogPost>> {
    let posts = blog_repo::list(pool, Some(true)).await?;
    Ok(posts.iter().map(PublicBlogPost::summary).collect())
}

/// A published post with its body rendered to HTML.
pub async fn published_by_slug(pool: &Pool, slug: &str) -> Result<PublicBlogPost> {
    blog_repo::find_published_by_slug(pool, slug)
        .await?
        .map(|post| PublicBlogPost::detail(&post))
        .ok_or(AppError::NotFound("Blog post"))
}

pub async fn list(pool: &Pool, published: Option<bool>) -> Result<Vec<BlogPost>> {
    blog_repo::list(pool, published).await
}

pub async fn get(pool: &Pool, id: &Uuid) -> Result<BlogPost> {
    blog_repo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("Blog post"))
}

pub async fn create(pool: &Pool, post: NewBlogPost, author: &AdminUser) -> Result<BlogPost> {
    if blog_repo::slug_taken(pool, &post.slug, None).await? {
        return Err(AppError::Conflict(DUPLICATE_SLUG.to_string()));
    }

    let created = blog_repo::create(pool, &post, Some(&author.id)).await?;
    tracing::info!("📝 Blog post created: {} by {}", created.slug, author.email);
    Ok(created)
}

pub async fn update(
    pool: &Pool,
    id: &Uuid,
    changes: BlogPostChanges,
    editor: &AdminUser,
) -> Result<BlogPost> {
    if let Some(slug) = &changes.slug {
        if blog_repo::slug_taken(pool, slug, Some(id)).await? {
            return Err(AppError::Conflict(DUPLICATE_SLUG.to_string()));
        }
    }

    let updated = blog_repo::update(pool, id, &changes, &editor.id)
        .await?
        .ok_or(AppError::NotFound("Blog post"))?;
    tracing::info!("✏️ Blog post updated: {} by {}", updated.slug, editor.email);
    Ok(updated)
}

pub async fn delete(pool: &Pool, id: &Uuid, editor: &AdminUser) -> Result<()> {
    if !blog_repo::delete(pool, id).await? {
        return Err(AppError::NotFound("Blog post"));
    }
    tracing::info!("🗑️ Blog post deleted: {} by {}", id, editor.email);
    Ok(())
}
