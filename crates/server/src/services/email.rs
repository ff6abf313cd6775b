//! Email service for visit reminders and the daily digest.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Customer
//! reminders are bilingual: one message carrying a Spanish section and an
//! English section, since the customer base uses both.

use askama::Template;
use chrono::NaiveDate;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use brisa_core::Customer;

use crate::config::EmailConfig;

/// Date format used in email bodies.
const EMAIL_DATE_FORMAT: &str = "%Y-%m-%d";

/// HTML template for the visit reminder email.
#[derive(Template)]
#[template(path = "email/reminder.html")]
struct ReminderEmailHtml<'a> {
    name: &'a str,
    date: &'a str,
    time: &'a str,
    address: &'a str,
}

/// Plain text template for the visit reminder email.
#[derive(Template)]
#[template(path = "email/reminder.txt")]
struct ReminderEmailText<'a> {
    name: &'a str,
    date: &'a str,
    time: &'a str,
    address: &'a str,
}

/// One row of the daily digest.
struct DigestVisit {
    name: String,
    date: String,
    time: String,
    address: String,
}

/// HTML template for the admin digest email.
#[derive(Template)]
#[template(path = "email/digest.html")]
struct DigestEmailHtml<'a> {
    date: &'a str,
    visits: &'a [DigestVisit],
}

/// Plain text template for the admin digest email.
#[derive(Template)]
#[template(path = "email/digest.txt")]
struct DigestEmailText<'a> {
    date: &'a str,
    visits: &'a [DigestVisit],
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// The customer has no email address on file.
    #[error("customer has no email address")]
    NoRecipient,

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a bilingual visit reminder to a customer.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::NoRecipient` when the customer record has no
    /// email address, or a transport/template error if sending fails.
    pub async fn send_reminder(&self, customer: &Customer) -> Result<(), EmailError> {
        let to = customer.email.as_deref().ok_or(EmailError::NoRecipient)?;

        let date = customer.next_visit.format(EMAIL_DATE_FORMAT).to_string();
        let time = customer.visit_time.as_deref().unwrap_or("");
        let address = customer.address.as_deref().unwrap_or("");

        let html = ReminderEmailHtml {
            name: &customer.name,
            date: &date,
            time,
            address,
        }
        .render()?;
        let text = ReminderEmailText {
            name: &customer.name,
            date: &date,
            time,
            address,
        }
        .render()?;

        self.send_multipart_email(
            to,
            "Recordatorio de limpieza / Cleaning reminder",
            &text,
            &html,
        )
        .await
    }

    /// Send the daily digest of upcoming visits to the operator.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_digest(
        &self,
        to: &str,
        today: NaiveDate,
        customers: &[Customer],
    ) -> Result<(), EmailError> {
        let date = today.format(EMAIL_DATE_FORMAT).to_string();
        let visits: Vec<DigestVisit> = customers
            .iter()
            .map(|c| DigestVisit {
                name: c.name.clone(),
                date: c.next_visit.format(EMAIL_DATE_FORMAT).to_string(),
                time: c.visit_time.clone().unwrap_or_default(),
                address: c.address.clone().unwrap_or_default(),
            })
            .collect();

        let html = DigestEmailHtml {
            date: &date,
            visits: &visits,
        }
        .render()?;
        let text = DigestEmailText {
            date: &date,
            visits: &visits,
        }
        .render()?;

        self.send_multipart_email(to, "Upcoming visits - next two days", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_templates_carry_both_languages() {
        let html = ReminderEmailHtml {
            name: "Maria",
            date: "2025-06-01",
            time: "9:00",
            address: "12 Oak St",
        }
        .render()
        .expect("render html");
        assert!(html.contains("Maria"));
        assert!(html.contains("2025-06-01"));
        // Spanish and English sections both present
        assert!(html.contains("Recordatorio"));
        assert!(html.contains("Reminder"));

        let text = ReminderEmailText {
            name: "Maria",
            date: "2025-06-01",
            time: "9:00",
            address: "12 Oak St",
        }
        .render()
        .expect("render text");
        assert!(text.contains("Recordatorio"));
        assert!(text.contains("Reminder"));
    }

    #[test]
    fn test_digest_template_lists_every_visit() {
        let visits = vec![
            DigestVisit {
                name: "Ana".to_string(),
                date: "2025-06-01".to_string(),
                time: "9:00".to_string(),
                address: "12 Oak St".to_string(),
            },
            DigestVisit {
                name: "Ben".to_string(),
                date: "2025-06-02".to_string(),
                time: String::new(),
                address: String::new(),
            },
        ];
        let html = DigestEmailHtml {
            date: "2025-06-01",
            visits: &visits,
        }
        .render()
        .expect("render html");
        assert!(html.contains("Ana"));
        assert!(html.contains("Ben"));

        let text = DigestEmailText {
            date: "2025-06-01",
            visits: &visits,
        }
        .render()
        .expect("render text");
        assert!(text.contains("Ana"));
        assert!(text.contains("2025-06-02"));
    }
}
