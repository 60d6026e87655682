use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::MailConfig;
use crate::domain::verification::errors::NotificationError;
use crate::domain::verification::ports::Mail;
use crate::domain::verification::ports::NotificationGateway;

/// SMTP-backed mail delivery.
pub struct SmtpNotificationGateway {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationGateway {
    /// Build the transport from configuration.
    ///
    /// # Errors
    /// * `InvalidMessage` - From address or relay host is malformed
    pub fn new(config: &MailConfig) -> Result<Self, NotificationError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidMessage(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl NotificationGateway for SmtpNotificationGateway {
    async fn send(&self, mail: Mail) -> Result<(), NotificationError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&mail.subject);

        for recipient in &mail.recipients {
            let mailbox = recipient
                .parse::<Mailbox>()
                .map_err(|e| NotificationError::InvalidMessage(e.to_string()))?;
            builder = builder.to(mailbox);
        }

        let message = builder
            .body(mail.body)
            .map_err(|e| NotificationError::InvalidMessage(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        tracing::debug!(subject = %mail.subject, "Mail delivered");

        Ok(())
    }
}
