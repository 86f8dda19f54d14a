//! Email delivery of the rendered report over Gmail SMTP

use chrono::NaiveDate;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::types::{MovieHeatError, Result};

const SMTP_RELAY: &str = "smtp.gmail.com";
const SMTP_PORT: u16 = 587;

/// Sender account and recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub user: String,
    pub app_password: String,
    pub recipient: String,
}

/// `Movie Ratings - March 04, 2024`
pub fn subject(date: NaiveDate) -> String {
    format!("Movie Ratings - {}", date.format("%B %d, %Y"))
}

/// Build a multipart/alternative message carrying both report versions
pub fn build_message(
    settings: &EmailSettings,
    text: String,
    html: String,
    date: NaiveDate,
) -> Result<Message> {
    let from: Mailbox = settings
        .user
        .parse()
        .map_err(|e| MovieHeatError::Email(format!("sender {}: {}", settings.user, e)))?;
    let to: Mailbox = settings
        .recipient
        .parse()
        .map_err(|e| MovieHeatError::Email(format!("recipient {}: {}", settings.recipient, e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject(date))
        .multipart(MultiPart::alternative_plain_html(text, html))
        .map_err(|e| MovieHeatError::Email(e.to_string()))
}

/// Send the report; STARTTLS on the submission port
pub fn send_report(
    settings: &EmailSettings,
    text: String,
    html: String,
    date: NaiveDate,
) -> Result<()> {
    let message = build_message(settings, text, html, date)?;
    let mailer = SmtpTransport::starttls_relay(SMTP_RELAY)
        .map_err(|e| MovieHeatError::Email(e.to_string()))?
        .port(SMTP_PORT)
        .credentials(Credentials::new(
            settings.user.clone(),
            settings.app_password.clone(),
        ))
        .build();

    mailer
        .send(&message)
        .map_err(|e| MovieHeatError::Email(e.to_string()))?;
    tracing::info!("email sent to {}", settings.recipient);
    Ok(())
}
