use deadpool_postgres::Pool;
use crate::{
    error::Result,
    models::lead::{Lead, NewLead},
};

/// Stores a contact-form submission.
pub async fn create(pool: &Pool, lead: &NewLead) -> Result<Lead> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO leads (name, email, organization, role, services_needed, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
            &[
                &lead.name,
                &lead.email,
                &lead.organization,
                &lead.role,
                &lead.services_needed,
                &lead.message,
            ],
        )
        .await?;
    Lead::try_from(&row)
}
