use chrono::Utc;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::application::{ApplicationStatus, JobApplication, NewJobApplication},
    models::session::AdminUser,
    repositories::application as application_repo,
    services::mailer::{Mailer, send_best_effort},
    services::notifications,
};

/// Stores an application and notifies staff and the applicant.
///
/// Notification failures are logged and do not fail the submission.
pub async fn submit(
    pool: &Pool,
    mailer: &dyn Mailer,
    config: &Config,
    application: NewJobApplication,
) -> Result<Uuid> {
    let id = application_repo::create(pool, &application).await?;
    tracing::info!(
        "📨 Application {} received for {}",
        id,
        application.position_title
    );

    futures::join!(
        send_best_effort(
            mailer,
            notifications::application_internal(config, &application, Utc::now()),
        ),
        send_best_effort(
            mailer,
            notifications::application_confirmation(config, &application),
        ),
    );

    Ok(id)
}

pub async fn list(pool: &Pool, status: Option<ApplicationStatus>) -> Result<Vec<JobApplication>> {
    application_repo::list(pool, status).await
}

pub async fn get(pool: &Pool, id: &Uuid) -> Result<JobApplication> {
    application_repo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("Application"))
}

/// Records a review decision and tells the applicant.
pub async fn review(
    pool: &Pool,
    mailer: &dyn Mailer,
    config: &Config,
    id: &Uuid,
    status: ApplicationStatus,
    notes: Option<&str>,
    reviewer: &AdminUser,
) -> Result<JobApplication> {
    if !application_repo::update_status(pool, id, status, notes, &reviewer.id).await? {
        return Err(AppError::NotFound("Application"));
    }
    let application = get(pool, id).await?;
    tracing::info!(
        "✅ Application {} marked {} by {}",
        id,
        status.as_str(),
        reviewer.email
    );

    send_best_effort(
        mailer,
        notifications::application_status(config, &application, status, notes),
    )
    .await;

    Ok(application)
}
