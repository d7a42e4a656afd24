use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    content::text::non_blank,
    error::{AppError, Result},
    models::application::{ApplicationStatus, NewJobApplication},
    models::session::AdminUser,
    services::application as application_service,
    state::AppState,
    validation::content::{validate_optional_reference, validate_resume_path},
};

/// The public application form.
///
/// The site sends `careerPostId: ""` for general applications.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    #[garde(custom(validate_optional_reference))]
    pub career_post_id: Option<String>,
    #[garde(length(min = 1, max = 300))]
    pub position_title: String,
    #[garde(length(min = 1, max = 100))]
    pub first_name: String,
    #[garde(length(min = 1, max = 100))]
    pub last_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1, max = 50))]
    pub phone: String,
    #[garde(custom(validate_resume_path))]
    pub resume: String,
    #[garde(length(max = 10000))]
    pub cover_letter: Option<String>,
    #[garde(length(max = 5000))]
    pub experience: Option<String>,
    #[garde(length(max = 2000))]
    pub certifications: Option<String>,
}

impl From<ApplicationRequest> for NewJobApplication {
    fn from(req: ApplicationRequest) -> Self {
        Self {
            career_post_id: non_blank(req.career_post_id)
                .and_then(|id| Uuid::parse_str(id.trim()).ok()),
            position_title: req.position_title.trim().to_string(),
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            email: req.email.trim().to_string(),
            phone: req.phone.trim().to_string(),
            resume: req.resume,
            cover_letter: non_blank(req.cover_letter),
            experience: non_blank(req.experience),
            certifications: non_blank(req.certifications),
        }
    }
}

#[derive(Serialize)]
pub struct SubmittedResponse {
    pub message: String,
    pub application_id: Uuid,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct ReviewRequest {
    #[garde(skip)]
    pub status: ApplicationStatus,
    #[garde(length(max = 5000))]
    pub notes: Option<String>,
}

/// Accepts a job application from the public site.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ApplicationRequest>,
) -> Result<Response> {
    payload.validate()?;

    let id = application_service::submit(
        &state.db,
        state.mailer.as_ref(),
        &state.config,
        payload.into(),
    )
    .await?;

    let response = SubmittedResponse {
        message: "Application submitted successfully".to_string(),
        application_id: id,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Response> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
        Some(s) => Some(
            ApplicationStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", s)))?,
        ),
        None => None,
    };

    let applications = application_service::list(&state.db, status).await?;
    Ok(Json(applications).into_response())
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let application = application_service::get(&state.db, &id).await?;
    Ok(Json(application).into_response())
}

/// Records a review decision and emails the applicant.
#[axum::debug_handler]
pub async fn review(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Response> {
    payload.validate()?;
    let notes = non_blank(payload.notes);

    let application = application_service::review(
        &state.db,
        state.mailer.as_ref(),
        &state.config,
        &id,
        payload.status,
        notes.as_deref(),
        &admin,
    )
    .await?;

    Ok(Json(application).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_site_form_shape() {
        let req: ApplicationRequest = serde_json::from_str(
            r#"{"careerPostId":null,"positionTitle":"Surgical Coder","firstName":"Sam",
                "lastName":"Lee","email":"sam@example.test","phone":"555-0100",
                "resume":"/uploads/resumes/1-ab.pdf","coverLetter":"","experience":"5 years"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let application = NewJobApplication::from(req);
        assert_eq!(application.cover_letter, None);
        assert_eq!(application.experience.as_deref(), Some("5 years"));

        let req: ApplicationRequest = serde_json::from_str(
            r#"{"careerPostId":"","positionTitle":"General Application","firstName":"Sam",
                "lastName":"Lee","email":"sam@example.test","phone":"555-0100",
                "resume":"/uploads/resumes/1-ab.pdf"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(NewJobApplication::from(req).career_post_id, None);
    }

    #[test]
    fn career_post_id_must_be_a_uuid_when_present() {
        let form = |id: &str| {
            serde_json::from_str::<ApplicationRequest>(&format!(
                r#"{{"careerPostId":"{id}","positionTitle":"Coder","firstName":"Sam",
                    "lastName":"Lee","email":"sam@example.test","phone":"1",
                    "resume":"/uploads/resumes/1.pdf"}}"#
            ))
            .unwrap()
        };

        assert!(form("not-a-uuid").validate().is_err());

        let req = form("3f2b8c1e-9a4d-4e7f-b6a1-0c5d2e8f9a7b");
        assert!(req.validate().is_ok());
        assert_eq!(
            NewJobApplication::from(req).career_post_id,
            Some(Uuid::parse_str("3f2b8c1e-9a4d-4e7f-b6a1-0c5d2e8f9a7b").unwrap())
        );
    }

    #[test]
    fn rejects_bad_email_and_foreign_resume() {
        let req: ApplicationRequest = serde_json::from_str(
            r#"{"positionTitle":"Coder","firstName":"Sam","lastName":"Lee",
                "email":"not-an-email","phone":"1","resume":"/uploads/resumes/1.pdf"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());

        let req: ApplicationRequest = serde_json::from_str(
            r#"{"positionTitle":"Coder","firstName":"Sam","lastName":"Lee",
                "email":"sam@example.test","phone":"1","resume":"http://x.test/cv.pdf"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn review_status_must_be_known() {
        assert!(serde_json::from_str::<ReviewRequest>(r#"{"status":"accepted"}"#).is_ok());
        assert!(serde_json::from_str::<ReviewRequest>(r#"{"status":"hired"}"#).is_err());
    }
}
