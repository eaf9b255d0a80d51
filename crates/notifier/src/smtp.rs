use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use mailer_common::types::RenderedNotification;

use crate::{Notifier, NotifierError, ensure_recipients};

/// Sends plain-text email through an SMTP relay.
///
/// The transport connects without TLS, which suits a local relay or a
/// sidecar MTA.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    pub fn new(host: &str, port: u16, from_address: String) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }

    fn build_message(&self, notification: &RenderedNotification) -> Result<Message, NotifierError> {
        let from: Mailbox = self.from_address.parse().map_err(|e| {
            NotifierError::InvalidAddress(format!("sender {}: {}", self.from_address, e))
        })?;

        let mut builder = Message::builder()
            .from(from)
            .subject(&notification.subject)
            .header(ContentType::TEXT_PLAIN);

        for recipient in notification.recipients.iter().filter(|r| !r.trim().is_empty()) {
            let mailbox: Mailbox = recipient.parse().map_err(|e| {
                NotifierError::InvalidAddress(format!("recipient {}: {}", recipient, e))
            })?;
            builder = builder.to(mailbox);
        }

        builder
            .body(notification.rendered.clone())
            .map_err(|e| NotifierError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_rendered_notification(
        &self,
        notification: &RenderedNotification,
    ) -> Result<(), NotifierError> {
        ensure_recipients(notification)?;
        let message = self.build_message(notification)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifierError::Delivery(format!("SMTP send failed: {}", e)))?;

        tracing::info!(
            recipients = ?notification.recipients,
            subject = %notification.subject,
            "Notification sent via SMTP"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(recipients: Vec<&str>) -> RenderedNotification {
        RenderedNotification {
            status: true,
            recipients: recipients.into_iter().map(String::from).collect(),
            rendered: "someone annotated your page".to_string(),
            subject: "New annotation in your page: Post (http://example.com/post)".to_string(),
        }
    }

    #[test]
    fn test_notifier_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotifier>();
    }

    #[tokio::test]
    async fn test_build_message_sets_headers() {
        let notifier = SmtpNotifier::new("localhost", 1025, "notify@example.org".to_string());
        let message = notifier
            .build_message(&notification(vec!["owner@example.com"]))
            .unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("To: owner@example.com"));
        assert!(formatted.contains("From: notify@example.org"));
        assert!(formatted.contains("someone annotated your page"));
    }

    #[tokio::test]
    async fn test_build_message_rejects_bad_recipient() {
        let notifier = SmtpNotifier::new("localhost", 1025, "notify@example.org".to_string());
        let result = notifier.build_message(&notification(vec!["not an address"]));
        assert!(matches!(result, Err(NotifierError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_build_message_rejects_bad_sender() {
        let notifier = SmtpNotifier::new("localhost", 1025, "nobody".to_string());
        let result = notifier.build_message(&notification(vec!["owner@example.com"]));
        assert!(matches!(result, Err(NotifierError::InvalidAddress(_))));
    }
}
