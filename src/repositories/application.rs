use deadpool_postgres::Pool;
use uuid::Uuid;
use crate::{
    db::column,
    error::Result,
    models::application::{ApplicationStatus, JobApplication, NewJobApplication},
};

const SELECT_WITH_CAREER: &str = r#"
    SELECT a.*, c.title AS career_title, c.slug AS career_slug
    FROM job_applications a
    LEFT JOIN career_posts c ON c.id = a.career_post_id
"#;

/// Stores a new application with status `pending`.
pub async fn create(pool: &Pool, application: &NewJobApplication) -> Result<Uuid> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO job_applications
                (career_post_id, position_title, first_name, last_name, email, phone,
                 resume, cover_letter, experience, certifications, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending')
            RETURNING id
            "#,
            &[
                &application.career_post_id,
                &application.position_title,
                &application.first_name,
                &application.last_name,
                &application.email,
                &application.phone,
                &application.resume,
                &application.cover_letter,
                &application.experience,
                &application.certifications,
            ],
        )
        .await?;
    column(&row, "id")
}

/// Lists applications newest first, optionally filtered by status.
pub async fn list(pool: &Pool, status: Option<ApplicationStatus>) -> Result<Vec<JobApplication>> {
    let client = pool.get().await?;
    let query = format!(
        "{SELECT_WITH_CAREER} WHERE $1::application_status IS NULL OR a.status = $1 ORDER BY a.created_at DESC"
    );
    let rows = client.query(query.as_str(), &[&status]).await?;
    rows.iter().map(JobApplication::try_from).collect()
}

pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<JobApplication>> {
    let client = pool.get().await?;
    let query = format!("{SELECT_WITH_CAREER} WHERE a.id = $1");
    let row = client.query_opt(query.as_str(), &[id]).await?;
    row.as_ref().map(JobApplication::try_from).transpose()
}

/// Records a review decision. Returns `false` when the application is gone.
pub async fn update_status(
    pool: &Pool,
    id: &Uuid,
    status: ApplicationStatus,
    notes: Option<&str>,
    reviewer_id: &Uuid,
) -> Result<bool> {
    let client = pool.get().await?;
    let affected = client
        .execute(
            r#"
            UPDATE job_applications
            SET status = $2, notes = $3, reviewed_by = $4, reviewed_at = NOW()
            WHERE id = $1
            "#,
            &[id, &status, &notes, reviewer_id],
        )
        .await?;
    Ok(affected > 0)
}
