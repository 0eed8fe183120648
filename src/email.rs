use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::SmtpConfig;

#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<()>;
}

/// Delivers over SMTP with STARTTLS and a fixed 10s timeout.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(email.to.parse()?)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html),
                    ),
            )?;
        self.transport.send(message).await?;
        info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

/// Used when SMTP is not configured: logs the message so codes can be copied
/// from the server output during development.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        info!(to = %email.to, subject = %email.subject, body = %email.text, "smtp not configured, logging email");
        Ok(())
    }
}

/// Fire-and-forget dispatch: delivery failures are logged and dropped, never
/// surfaced to the request that triggered them.
pub fn send_in_background(mailer: Arc<dyn Mailer>, email: Email) {
    tokio::spawn(async move {
        let to = email.to.clone();
        if let Err(e) = mailer.send(email).await {
            error!(error = %e, to = %to, "failed to send email");
        }
    });
}

pub fn verification_email(to: &str, code: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Verify your NepSafe email".into(),
        text: format!(
            "Your NepSafe verification code is: {code}\n\n\
             If you didn't create this account, please ignore this email."
        ),
        html: format!(
            "<p>Thank you for signing up with NepSafe. Enter this code to verify your email:</p>\
             <p style=\"font-size:32px;font-weight:bold;letter-spacing:4px\">{code}</p>\
             <p>If you didn't create this account, ignore this email.</p>"
        ),
    }
}

pub fn password_reset_email(to: &str, code: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Reset your NepSafe password".into(),
        text: format!(
            "Your NepSafe password reset code is: {code}\n\n\
             This code expires in 24 hours.\n\n\
             If you did not request this, secure your account immediately."
        ),
        html: format!(
            "<p>We received a request to reset your NepSafe password. Use this code:</p>\
             <p style=\"font-size:32px;font-weight:bold;letter-spacing:4px\">{code}</p>\
             <p>This code expires in 24 hours. If you did not request this, secure your account immediately.</p>"
        ),
    }
}

pub fn sos_alert_email(
    to: &str,
    emergency_type: &str,
    user_name: &str,
    maps_link: &str,
    message: Option<&str>,
) -> Email {
    let message = message.unwrap_or("No message");
    Email {
        to: to.to_string(),
        subject: format!("EMERGENCY SOS ALERT - {}", emergency_type.to_uppercase()),
        text: format!("SOS alert from {user_name}: {message}\nLocation: {maps_link}"),
        html: format!(
            "<h1>Emergency SOS Alert</h1>\
             <p><strong>Type:</strong> {emergency_type}</p>\
             <p><strong>Name:</strong> {user_name}</p>\
             <p><strong>Message:</strong> {message}</p>\
             <p><a href=\"{maps_link}\">View location on Google Maps</a></p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_contains_code() {
        let email = verification_email("tourist@example.com", "123456");
        assert_eq!(email.to, "tourist@example.com");
        assert!(email.text.contains("123456"));
        assert!(email.html.contains("123456"));
    }

    #[test]
    fn reset_email_contains_code_and_expiry_notice() {
        let email = password_reset_email("tourist@example.com", "654321");
        assert!(email.text.contains("654321"));
        assert!(email.text.contains("24 hours"));
    }

    #[test]
    fn sos_email_carries_location_link() {
        let email = sos_alert_email(
            "rescue@example.com",
            "medical",
            "John Doe",
            "https://www.google.com/maps?q=27.7,85.3",
            Some("injured near base camp"),
        );
        assert!(email.subject.contains("MEDICAL"));
        assert!(email.html.contains("https://www.google.com/maps?q=27.7,85.3"));
        assert!(email.text.contains("injured near base camp"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = LogMailer;
        let result = mailer.send(verification_email("a@b.com", "111111")).await;
        assert!(result.is_ok());
    }
}
