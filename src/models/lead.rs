use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::db::column;
use crate::error::{AppError, Result};

/// A contact-form submission.
#[derive(Debug, Clone, Serialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub role: String,
    pub services_needed: Vec<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Lead {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: column(row, "id")?,
            name: column(row, "name")?,
            email: column(row, "email")?,
            organization: column(row, "organization")?,
            role: column(row, "role")?,
            services_needed: column(row, "services_needed")?,
            message: column(row, "message")?,
            created_at: column(row, "created_at")?,
        })
    }
}

/// The fields of a new lead.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub role: String,
    pub services_needed: Vec<String>,
    pub message: String,
}
