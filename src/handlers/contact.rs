use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::Result,
    models::lead::NewLead,
    services::contact as contact_service,
    state::AppState,
    validation::content::{validate_acknowledged, validate_services},
};

/// The public contact form.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[garde(length(min = 1, max = 200))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1, max = 200))]
    pub organization: String,
    #[garde(length(min = 1, max = 200))]
    pub role: String,
    #[serde(default)]
    #[garde(custom(validate_services), length(max = 20))]
    pub services_needed: Vec<String>,
    #[garde(length(min = 1, max = 10000))]
    pub message: String,
    #[serde(default)]
    #[garde(custom(validate_acknowledged))]
    pub phi_acknowledgment: bool,
}

impl From<ContactRequest> for NewLead {
    fn from(req: ContactRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            organization: req.organization.trim().to_string(),
            role: req.role.trim().to_string(),
            services_needed: req
                .services_needed
                .into_iter()
                .map(|s| s.trim().to_string())
                .collect(),
            message: req.message,
        }
    }
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub id: Uuid,
}

/// Accepts a contact-form submission.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Response> {
    payload.validate()?;

    let lead = contact_service::submit(
        &state.db,
        state.mailer.as_ref(),
        &state.config,
        payload.into(),
    )
    .await?;

    let response = ContactResponse {
        message: "Thank you for contacting us. We'll be in touch within 1 business day."
            .to_string(),
        id: lead.id,
    };
    Ok(Json(response).into_response())
}
