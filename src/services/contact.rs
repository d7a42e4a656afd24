use chrono::Utc;
use deadpool_postgres::Pool;

use crate::{
    config::Config,
    error::Result,
    models::lead::{Lead, NewLead},
    repositories::lead as lead_repo,
    services::mailer::{Mailer, send_best_effort},
    services::notifications,
};

/// Stores a contact-form lead, then sends the staff notification and the
/// auto-reply concurrently.
pub async fn submit(pool: &Pool, mailer: &dyn Mailer, config: &Config, lead: NewLead) -> Result<Lead> {
    let stored = lead_repo::create(pool, &lead).await?;
    tracing::info!("📬 Lead {} stored from {}", stored.id, lead.organization);

    notify(mailer, config, &lead).await;
    Ok(stored)
}

async fn notify(mailer: &dyn Mailer, config: &Config, lead: &NewLead) {
    futures::join!(
        send_best_effort(mailer, notifications::lead_internal(config, lead, Utc::now())),
        send_best_effort(mailer, notifications::lead_auto_reply(config, lead)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::RecordingMailer;

    fn lead() -> NewLead {
        NewLead {
            name: "Dana".to_string(),
            email: "dana@clinic.test".to_string(),
            organization: "Valley Ortho".to_string(),
            role: "Practice Manager".to_string(),
            services_needed: vec!["Coding".to_string()],
            message: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn notifies_staff_and_the_lead() {
        let mailer = RecordingMailer::default();
        let config = Config::for_tests();
        notify(&mailer, &config, &lead()).await;

        let recipients: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(recipients.len(), 2);
        assert!(recipients.contains(&config.internal_notification_email));
        assert!(recipients.contains(&"dana@clinic.test".to_string()));
    }

    #[tokio::test]
    async fn mail_failures_are_swallowed() {
        let mailer = RecordingMailer::failing();
        notify(&mailer, &Config::for_tests(), &lead()).await;
        assert!(mailer.sent().is_empty());
    }
}
