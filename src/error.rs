use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The request carries no valid admin session.
    #[error("Unauthorized")]
    Unauthorized,

    /// The request failed a CSRF check.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Credentials presented at login were rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A resource not found error.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness conflict, such as a duplicate slug.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The server is missing required configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Outbound mail could not be handed to the transport.
    #[error("Mail error: {0}")]
    Mail(String),

    /// A multipart error.
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// A column was missing or had an unexpected type.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// A rate limit exceeded error.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        let message = report
            .iter()
            .next()
            .map(|(path, error)| format!("{}: {}", path, error.message()))
            .unwrap_or_else(|| report.to_string());
        AppError::Validation(message)
    }
}

impl From<crate::crypto::session::SessionError> for AppError {
    fn from(err: crate::crypto::session::SessionError) -> Self {
        use crate::crypto::session::SessionError;
        match err {
            SessionError::Configuration => {
                AppError::Configuration("SESSION_SECRET is not set".to_string())
            }
            SessionError::Rng(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Io(_)
            | AppError::Configuration(_)
            | AppError::Mail(_)
            | AppError::MissingData(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                "Database unavailable".to_string()
            }

            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                "File system error".to_string()
            }

            AppError::Unauthorized => {
                tracing::warn!("Unauthorized request");
                "Unauthorized".to_string()
            }

            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                msg.clone()
            }

            AppError::Forbidden(ref msg) => {
                tracing::warn!("Forbidden: {}", msg);
                msg.clone()
            }

            AppError::NotFound(what) => {
                tracing::debug!("{} not found", what);
                format!("{} not found", what)
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }

            AppError::Conflict(ref msg) => {
                tracing::debug!("Conflict: {}", msg);
                msg.clone()
            }

            AppError::Configuration(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                "Server is not configured".to_string()
            }

            AppError::Mail(ref msg) => {
                tracing::error!("Mail error: {}", msg);
                "Failed to send email".to_string()
            }

            AppError::Multipart(ref msg) => {
                tracing::debug!("Multipart error: {}", msg);
                msg.clone()
            }

            AppError::MissingData(ref msg) => {
                tracing::error!("Missing data: {}", msg);
                "Internal server error".to_string()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }

            AppError::RateLimitExceeded(ref msg) => {
                tracing::warn!("Rate limit exceeded: {}", msg);
                msg.clone()
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            self.status(),
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status_codes() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("Blog post").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("slug".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Configuration("SESSION_SECRET".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_echoed() {
        let response = AppError::Internal("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
