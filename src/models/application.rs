use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    db::column,
    error::{AppError, Result},
};

/// Review state of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "lowercase")]
#[postgres(name = "application_status")]
pub enum ApplicationStatus {
    #[postgres(name = "pending")]
    Pending,
    #[postgres(name = "accepted")]
    Accepted,
    #[postgres(name = "rejected")]
    Rejected,
}

impl ApplicationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// The posting an application was made against.
#[derive(Debug, Clone, Serialize)]
pub struct CareerPostRef {
    pub title: String,
    pub slug: String,
}

/// A submitted job application.
#[derive(Debug, Clone, Serialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub career_post_id: Option<Uuid>,
    pub position_title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub resume: String,
    pub cover_letter: Option<String>,
    pub experience: Option<String>,
    pub certifications: Option<String>,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub career_post: Option<CareerPostRef>,
}

impl TryFrom<&Row> for JobApplication {
    type Error = AppError;

    /// Expects the `career_title`/`career_slug` columns of a left join.
    fn try_from(row: &Row) -> Result<Self> {
        let career_title: Option<String> = column(row, "career_title")?;
        let career_slug: Option<String> = column(row, "career_slug")?;

        Ok(Self {
            id: column(row, "id")?,
            career_post_id: column(row, "career_post_id")?,
            position_title: column(row, "position_title")?,
            first_name: column(row, "first_name")?,
            last_name: column(row, "last_name")?,
            email: column(row, "email")?,
            phone: column(row, "phone")?,
            resume: column(row, "resume")?,
            cover_letter: column(row, "cover_letter")?,
            experience: column(row, "experience")?,
            certifications: column(row, "certifications")?,
            status: column(row, "status")?,
            notes: column(row, "notes")?,
            reviewed_by: column(row, "reviewed_by")?,
            reviewed_at: column(row, "reviewed_at")?,
            created_at: column(row, "created_at")?,
            career_post: career_title
                .zip(career_slug)
                .map(|(title, slug)| CareerPostRef { title, slug }),
        })
    }
}

/// The fields of a new application.
#[derive(Debug, Clone)]
pub struct NewJobApplication {
    pub career_post_id: Option<Uuid>,
    pub position_title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub resume: String,
    pub cover_letter: Option<String>,
    pub experience: Option<String>,
    pub certifications: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_round_trip() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("hired"), None);
    }
}
