use deadpool_postgres::Pool;
use uuid::Uuid;
use crate::{
    db::{clearable, column, conflict_on_unique},
    error::Result,
    models::career::{CareerPost, CareerPostChanges, NewCareerPost},
};

const DUPLICATE_SLUG: &str = "A career post with this slug already exists";

/// Lists postings newest first, optionally filtered by publication state.
pub async fn list(pool: &Pool, published: Option<bool>) -> Result<Vec<CareerPost>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM career_posts
            WHERE $1::BOOLEAN IS NULL OR published = $1
            ORDER BY date DESC
            "#,
            &[&published],
        )
        .await?;
    rows.iter().map(CareerPost::try_from).collect()
}

pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<CareerPost>> {
    let client = pool.get().await?;
    let row = client
        .query_opt("SELECT * FROM career_posts WHERE id = $1", &[id])
        .await?;
    row.as_ref().map(CareerPost::try_from).transpose()
}

pub async fn find_published_by_slug(pool: &Pool, slug: &str) -> Result<Option<CareerPost>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            "SELECT * FROM career_posts WHERE slug = $1 AND published = TRUE",
            &[&slug],
        )
        .await?;
    row.as_ref().map(CareerPost::try_from).transpose()
}

/// Whether `slug` is taken by any posting other than `except`.
pub async fn slug_taken(pool: &Pool, slug: &str, except: Option<&Uuid>) -> Result<bool> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM career_posts
                WHERE slug = $1 AND ($2::UUID IS NULL OR id <> $2)
            ) AS taken
            "#,
            &[&slug, &except],
        )
        .await?;
    column(&row, "taken")
}

pub async fn create(pool: &Pool, post: &NewCareerPost, author_id: &Uuid) -> Result<CareerPost> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO career_posts
                (slug, title, excerpt, content, location, employment_type, department,
                 published, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
            &[
                &post.slug,
                &post.title,
                &post.excerpt,
                &post.content,
                &post.location,
                &post.employment_type,
                &post.department,
                &post.published,
                author_id,
            ],
        )
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SLUG))?;
    CareerPost::try_from(&row)
}

/// Applies a partial update. Returns `None` when the posting does not exist.
pub async fn update(
    pool: &Pool,
    id: &Uuid,
    changes: &CareerPostChanges,
    editor_id: &Uuid,
) -> Result<Option<CareerPost>> {
    let (set_excerpt, excerpt) = clearable(&changes.excerpt);
    let (set_location, location) = clearable(&changes.location);
    let (set_department, department) = clearable(&changes.department);

    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE career_posts SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                excerpt = CASE WHEN $4::BOOLEAN THEN $5::TEXT ELSE excerpt END,
                content = COALESCE($6, content),
                location = CASE WHEN $7::BOOLEAN THEN $8::TEXT ELSE location END,
                employment_type = COALESCE($9, employment_type),
                department = CASE WHEN $10::BOOLEAN THEN $11::TEXT ELSE department END,
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
                &set_location,
                &location,
                &changes.employment_type,
                &set_department,
                &department,
                &changes.published,
                editor_id,
            ],
        )
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SLUG))?;
    row.as_ref().map(CareerPost::try_from).transpose()
}

pub async fn delete(pool: &Pool, id: &Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let affected = client
        .execute("DELETE FROM career_posts WHERE id = $1", &[id])
        .await?;
    Ok(affected > 0)
}
