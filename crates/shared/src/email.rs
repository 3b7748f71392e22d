//! Email service for sending receipts.
//!
//! Uses `lettre` for SMTP transport.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    /// Outbound email is switched off in configuration.
    #[error("Email delivery is disabled")]
    Disabled,
}

/// A file attached to an outgoing message.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    /// File name shown to the recipient.
    pub filename: String,
    /// MIME type, e.g. `application/json`.
    pub content_type: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl EmailAttachment {
    /// Creates an attachment.
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("smtp_host", &self.config.smtp_host)
            .field("smtp_port", &self.config.smtp_port)
            .field("enabled", &self.config.enabled)
            .finish_non_exhaustive()
    }
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Returns whether delivery is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = if self.config.smtp_username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
                .credentials(Credentials::new(
                    self.config.smtp_username.clone(),
                    self.config.smtp_password.clone(),
                ))
        };

        Ok(builder.port(self.config.smtp_port).build())
    }

    /// Builds a message with a plain-text body and the given attachments.
    ///
    /// # Errors
    ///
    /// Returns an error if an address or content type cannot be parsed.
    pub fn build_message(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
        attachments: &[EmailAttachment],
    ) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let builder = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject);

        if attachments.is_empty() {
            return builder
                .header(ContentType::TEXT_PLAIN)
                .body(body.to_string())
                .map_err(|e| EmailError::BuildError(e.to_string()));
        }

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
        for attachment in attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| EmailError::BuildError(e.to_string()))?;
            parts = parts.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type),
            );
        }

        builder
            .multipart(parts)
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends a message with attachments.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery is disabled or the email cannot be sent.
    pub async fn send_with_attachments(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
        attachments: &[EmailAttachment],
    ) -> Result<(), EmailError> {
        if !self.config.enabled {
            return Err(EmailError::Disabled);
        }

        let email = self.build_message(to_email, subject, body, attachments)?;
        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }

    /// Sends a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        self.send_with_attachments(to_email, subject, body, &[]).await
    }
}
