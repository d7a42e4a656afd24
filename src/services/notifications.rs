//! Transactional email templates. Every user-supplied value is escaped.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::content::text::{escape_html, escape_html_with_breaks};
use crate::models::application::{ApplicationStatus, JobApplication, NewJobApplication};
use crate::models::lead::NewLead;
use crate::services::mailer::EmailMessage;

const SIGNATURE: &str = "<p>Best regards,<br>Elite Surgical Coders Team</p>";

fn message(config: &Config, to: &str, subject: String, html: String) -> EmailMessage {
    EmailMessage {
        from: config.mail_from.clone(),
        to: to.to_string(),
        subject,
        html,
    }
}

fn submitted(at: DateTime<Utc>) -> String {
    format!(
        "<p><strong>Submitted:</strong> {}</p>",
        at.format("%Y-%m-%d %H:%M UTC")
    )
}

/// Staff notification for a contact-form lead.
pub fn lead_internal(config: &Config, lead: &NewLead, at: DateTime<Utc>) -> EmailMessage {
    let services: String = lead
        .services_needed
        .iter()
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();

    let html = format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Organization:</strong> {}</p>\
         <p><strong>Role:</strong> {}</p>\
         <p><strong>Services Needed:</strong></p><ul>{}</ul>\
         <p><strong>Message:</strong></p><p>{}</p>{}",
        escape_html(&lead.name),
        escape_html(&lead.email),
        escape_html(&lead.organization),
        escape_html(&lead.role),
        services,
        escape_html_with_breaks(&lead.message),
        submitted(at),
    );

    message(
        config,
        &config.internal_notification_email,
        format!("New Contact Form: {} from {}", lead.name, lead.organization),
        html,
    )
}

/// Auto-reply to the person who filled in the contact form.
pub fn lead_auto_reply(config: &Config, lead: &NewLead) -> EmailMessage {
    let html = format!(
        "<p>Dear {},</p>\
         <p>Thank you for reaching out to Elite Surgical Coders and Medical Billing LLC. \
         We've received your message and will get back to you within 1 business day.</p>\
         <p><strong>Important:</strong> Please do not share patient-identifying information (PHI) \
         by email. Once we connect, we'll provide secure methods for exchanging PHI as needed.</p>{}",
        escape_html(&lead.name),
        SIGNATURE,
    );

    message(
        config,
        &lead.email,
        "We've received your message – Elite Surgical Coders".to_string(),
        html,
    )
}

/// Staff notification for a new job application.
pub fn application_internal(
    config: &Config,
    application: &NewJobApplication,
    at: DateTime<Utc>,
) -> EmailMessage {
    let optional = |label: &str, value: &Option<String>| {
        value
            .as_ref()
            .map(|v| format!("<p><strong>{}:</strong> {}</p>", label, escape_html(v)))
            .unwrap_or_default()
    };
    let cover_letter = application
        .cover_letter
        .as_ref()
        .map(|c| {
            format!(
                "<p><strong>Cover Letter:</strong><br>{}</p>",
                escape_html_with_breaks(c)
            )
        })
        .unwrap_or_default();

    let html = format!(
        "<h2>New Job Application Received</h2>\
         <p><strong>Position:</strong> {}</p>\
         <p><strong>Applicant:</strong> {} {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Phone:</strong> {}</p>{}{}{}\
         <p><strong>Resume:</strong> <a href=\"{}\">View Resume</a></p>{}<hr>\
         <p><a href=\"{}\">Review Application in Admin Portal</a></p>",
        escape_html(&application.position_title),
        escape_html(&application.first_name),
        escape_html(&application.last_name),
        escape_html(&application.email),
        escape_html(&application.phone),
        optional("Experience", &application.experience),
        optional("Certifications", &application.certifications),
        cover_letter,
        escape_html(&format!("{}{}", config.site_url, application.resume)),
        submitted(at),
        escape_html(&format!("{}/admin?tab=applications", config.site_url)),
    );

    message(
        config,
        &config.internal_notification_email,
        format!(
            "New Job Application: {} - {} {}",
            application.position_title, application.first_name, application.last_name
        ),
        html,
    )
}

/// Confirmation to the applicant.
pub fn application_confirmation(config: &Config, application: &NewJobApplication) -> EmailMessage {
    let html = format!(
        "<p>Dear {} {},</p>\
         <p>Thank you for your interest in the <strong>{}</strong> position at Elite Surgical Coders.</p>\
         <p>We have successfully received your application and resume. Our team will review your \
         application and get back to you soon.</p>\
         <p>If you have any questions, please don't hesitate to contact us.</p>{}",
        escape_html(&application.first_name),
        escape_html(&application.last_name),
        escape_html(&application.position_title),
        SIGNATURE,
    );

    message(
        config,
        &application.email,
        format!("Application Received: {}", application.position_title),
        html,
    )
}

/// Status update to the applicant after review.
pub fn application_status(
    config: &Config,
    application: &JobApplication,
    status: ApplicationStatus,
    notes: Option<&str>,
) -> EmailMessage {
    let position = escape_html(&application.position_title);
    let body = match status {
        ApplicationStatus::Accepted => format!(
            "Congratulations! We are pleased to inform you that your application for the {} \
             position has been accepted. Our team will contact you shortly to discuss next steps.",
            position
        ),
        ApplicationStatus::Rejected => format!(
            "Thank you for your interest in the {} position at Elite Surgical Coders. After careful \
             consideration, we have decided to move forward with other candidates at this time. \
             We appreciate your time and interest in our organization.",
            position
        ),
        ApplicationStatus::Pending => format!(
            "Your application for the {} position is currently under review. We will update you \
             as soon as we have more information.",
            position
        ),
    };
    let notes = notes
        .map(|n| {
            format!(
                "<p><strong>Additional Notes:</strong><br>{}</p>",
                escape_html_with_breaks(n)
            )
        })
        .unwrap_or_default();

    let html = format!(
        "<p>Dear {} {},</p><p>{}</p>{}{}",
        escape_html(&application.first_name),
        escape_html(&application.last_name),
        body,
        notes,
        SIGNATURE,
    );

    message(
        config,
        &application.email,
        format!("Application Update: {}", application.position_title),
        html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> NewLead {
        NewLead {
            name: "Dana <script>".to_string(),
            email: "dana@clinic.test".to_string(),
            organization: "Valley Ortho".to_string(),
            role: "Practice Manager".to_string(),
            services_needed: vec!["Coding".to_string(), "A/R & Denials".to_string()],
            message: "Line one\nLine two".to_string(),
        }
    }

    fn application() -> NewJobApplication {
        NewJobApplication {
            career_post_id: None,
            position_title: "Surgical Coder".to_string(),
            first_name: "Sam".to_string(),
            last_name: "O'Neil".to_string(),
            email: "sam@example.test".to_string(),
            phone: "555-0100".to_string(),
            resume: "/uploads/resumes/1-abc.pdf".to_string(),
            cover_letter: Some("Hi\nthere".to_string()),
            experience: None,
            certifications: Some("CPC".to_string()),
        }
    }

    #[test]
    fn lead_notification_escapes_and_lists_services() {
        let config = Config::for_tests();
        let email = lead_internal(&config, &lead(), Utc::now());
        assert_eq!(email.to, config.internal_notification_email);
        assert_eq!(email.from, config.mail_from);
        assert!(email.html.contains("Dana &lt;script&gt;"));
        assert!(email.html.contains("<li>A/R &amp; Denials</li>"));
        assert!(email.html.contains("Line one<br>Line two"));
    }

    #[test]
    fn auto_reply_goes_to_the_lead() {
        let email = lead_auto_reply(&Config::for_tests(), &lead());
        assert_eq!(email.to, "dana@clinic.test");
        assert!(email.html.contains("PHI"));
    }

    #[test]
    fn application_notification_links_resume_and_skips_missing_fields() {
        let config = Config::for_tests();
        let email = application_internal(&config, &application(), Utc::now());
        assert!(email.html.contains("http://localhost:3000/uploads/resumes/1-abc.pdf"));
        assert!(email.html.contains("O&#039;Neil"));
        assert!(email.html.contains("<strong>Certifications:</strong> CPC"));
        assert!(!email.html.contains("Experience"));
        assert!(email.html.contains("Hi<br>there"));
        assert_eq!(email.subject, "New Job Application: Surgical Coder - Sam O'Neil");
    }

    #[test]
    fn confirmation_goes_to_the_applicant() {
        let email = application_confirmation(&Config::for_tests(), &application());
        assert_eq!(email.to, "sam@example.test");
        assert_eq!(email.subject, "Application Received: Surgical Coder");
    }
}
