use deadpool_postgres::Pool;
use uuid::Uuid;
use crate::{
    db::{clearable, column, conflict_on_unique},
    error::Result,
    models::blog::{BlogPost, BlogPostChanges, NewBlogPost},
};

const DUPLICATE_SLUG: &str = "A blog post with this slug already exists";

/// Lists posts newest first, optionally filtered by publication state.
pub async fn list(pool: &Pool, published: Option<bool>) -> Result<Vec<BlogPost>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM blog_posts
            WHERE $1::BOOLEAN IS NULL OR published = $1
            ORDER BY date DESC
            "#,
            &[&published],
        )
        .await?;
    rows.iter().map(BlogPost::try_from).collect()
}

/// Finds a post by ID regardless of publication state.
pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<BlogPost>> {
    let client = pool.get().await?;
    let row = client
        .query_opt("SELECT * FROM blog_posts WHERE id = $1", &[id])
        .await?;
    row.as_ref().map(BlogPost::try_from).transpose()
}

/// Finds a published post by slug.
pub async fn find_published_by_slug(pool: &Pool, slug: &str) -> Result<Option<BlogPost>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            "SELECT * FROM blog_posts WHERE slug = $1 AND published = TRUE",
            &[&slug],
        )
        .await?;
    row.as_ref().map(BlogPost::try_from).transpose()
}

/// Whether `slug` is taken by any post other than `except`.
pub async fn slug_taken(pool: &Pool, slug: &str, except: Option<&Uuid>) -> Result<bool> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM blog_posts
                WHERE slug = $1 AND ($2::UUID IS NULL OR id <> $2)
            ) AS taken
            "#,
            &[&slug, &except],
        )
        .await?;
    column(&row, "taken")
}

/// Inserts a post attributed to `author_id`.
pub async fn create(pool: &Pool, post: &NewBlogPost, author_id: Option<&Uuid>) -> Result<BlogPost> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO blog_posts
                (slug, title, excerpt, content, image, category, author, tags, published,
                 date, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, NOW()), $11, $11)
            RETURNING *
            "#,
            &[
                &post.slug,
                &post.title,
                &post.excerpt,
                &post.content,
                &post.image,
                &post.category,
                &post.author,
                &post.tags,
                &post.published,
                &post.date,
                &author_id,
            ],
        )
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SLUG))?;
    BlogPost::try_from(&row)
}

/// Applies a partial update. Returns `None` when the post does not exist.
///
/// Clearable columns are only touched when their change was sent.
pub async fn update(
    pool: &Pool,
    id: &Uuid,
    changes: &BlogPostChanges,
    editor_id: &Uuid,
) -> Result<Option<BlogPost>> {
    let (set_excerpt, excerpt) = clearable(&changes.excerpt);
    let (set_image, image) = clearable(&changes.image);

    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE blog_posts SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                excerpt = CASE WHEN $4::BOOLEAN THEN $5::TEXT ELSE excerpt END,
                content = COALESCE($6, content),
                image = CASE WHEN $7::BOOLEAN THEN $8::TEXT ELSE image END,
                category = COALESCE($9, category),
                author = COALESCE($10, author),
                tags = COALESCE($11, tags),
                published = COALESCE($12, published),
                updated_by = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
            &[
                id,
                &changes.slug,
                &changes.title,
                &set_excerpt,
                &excerpt,
                &changes.content,
                &set_image,
                &image,
                &changes.category,
                &changes.author,
                &changes.tags,
                &changes.published,
                editor_id,
            ],
        )
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SLUG))?;
    row.as_ref().map(BlogPost::try_from).transpose()
}

/// Deletes a post. Returns whether a row was removed.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let affected = client
        .execute("DELETE FROM blog_posts WHERE id = $1", &[id])
        .await?;
    Ok(affected > 0)
}
