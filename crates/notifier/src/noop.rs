use async_trait::async_trait;

use mailer_common::types::RenderedNotification;

use crate::{Notifier, NotifierError, ensure_recipients};

/// Logs notifications instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_rendered_notification(
        &self,
        notification: &RenderedNotification,
    ) -> Result<(), NotifierError> {
        ensure_recipients(notification)?;
        tracing::info!(
            recipients = ?notification.recipients,
            subject = %notification.subject,
            "Noop notifier — delivery skipped"
        );
        Ok(())
    }
}
