use axum::{
    Extension, Json,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, Result},
    models::session::AdminUser,
    services::uploads::{IMAGE, RESUME, UploadPolicy},
    state::AppState,
};

/// Reads the `file` field of a multipart body.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Multipart(e.to_string()))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(AppError::Validation("No file provided".to_string()))
}

async fn store(state: &AppState, policy: &UploadPolicy, multipart: Multipart) -> Result<Response> {
    let (filename, bytes) = read_file_field(multipart).await?;
    let stored = policy
        .store(&state.config.upload_dir, &filename, &bytes)
        .await?;
    Ok(Json(stored).into_response())
}

/// Public résumé upload for the application form.
pub async fn upload_resume(State(state): State<AppState>, multipart: Multipart) -> Result<Response> {
    store(&state, &RESUME, multipart).await
}

/// Admin image upload for posts.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    multipart: Multipart,
) -> Result<Response> {
    tracing::debug!("🖼️ Image upload by {}", admin.email);
    store(&state, &IMAGE, multipart).await
}
