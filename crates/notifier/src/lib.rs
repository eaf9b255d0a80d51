//! Notification delivery.
//!
//! Workers hand a `RenderedNotification` to a [`Notifier`], which owns the
//! actual transport:
//! - Resend HTTP API (`ResendNotifier`)
//! - SMTP relay via lettre (`SmtpNotifier`)
//! - Log-only (`NoopNotifier`)
//!
//! The backend is picked at startup from `NOTIFIER_BACKEND`.

mod noop;
mod resend;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use mailer_common::config::{AppConfig, NotifierBackend};
use mailer_common::error::AppError;
use mailer_common::types::RenderedNotification;

pub use noop::NoopNotifier;
pub use resend::ResendNotifier;
pub use smtp::SmtpNotifier;

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Message build failed: {0}")]
    Build(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Notifier configuration error: {0}")]
    Config(String),
}

impl From<NotifierError> for AppError {
    fn from(err: NotifierError) -> Self {
        match err {
            NotifierError::Config(msg) => AppError::Config(msg),
            other => AppError::Notify(other.to_string()),
        }
    }
}

/// Delivers rendered notifications to their recipients.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `notification` to every address in `notification.recipients`.
    async fn send_rendered_notification(
        &self,
        notification: &RenderedNotification,
    ) -> Result<(), NotifierError>;
}

/// Build the notifier selected by the configuration.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Notifier>, NotifierError> {
    let notifier: Arc<dyn Notifier> = match config.notifier_backend {
        NotifierBackend::Noop => Arc::new(NoopNotifier),
        NotifierBackend::Resend => {
            let api_key = config.resend_api_key.clone().ok_or_else(|| {
                NotifierError::Config("RESEND_API_KEY is required for the resend backend".into())
            })?;
            Arc::new(ResendNotifier::new(
                config.resend_api_url.clone(),
                api_key,
                config.email_from.clone(),
            ))
        }
        NotifierBackend::Smtp => Arc::new(SmtpNotifier::new(
            &config.smtp_host,
            config.smtp_port,
            config.email_from.clone(),
        )),
    };

    tracing::info!(backend = %config.notifier_backend, "Notifier configured");
    Ok(notifier)
}

/// Reject notifications that would go nowhere.
pub(crate) fn ensure_recipients(notification: &RenderedNotification) -> Result<(), NotifierError> {
    if notification.recipients.iter().all(|r| r.trim().is_empty()) {
        return Err(NotifierError::InvalidAddress(
            "notification has no recipients".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(recipients: Vec<&str>) -> RenderedNotification {
        RenderedNotification {
            status: true,
            recipients: recipients.into_iter().map(String::from).collect(),
            rendered: "body".to_string(),
            subject: "subject".to_string(),
        }
    }

    #[test]
    fn test_resend_backend_requires_api_key() {
        let config = AppConfig {
            notifier_backend: NotifierBackend::Resend,
            resend_api_key: None,
            ..AppConfig::default()
        };
        assert!(matches!(from_config(&config), Err(NotifierError::Config(_))));
    }

    #[test]
    fn test_notifier_error_maps_to_app_error() {
        let config = NotifierError::Config("RESEND_API_KEY missing".into());
        assert!(matches!(AppError::from(config), AppError::Config(msg) if msg.contains("RESEND_API_KEY")));

        let delivery = NotifierError::Delivery("timeout".into());
        assert!(matches!(AppError::from(delivery), AppError::Notify(msg) if msg.contains("timeout")));
    }

    #[tokio::test]
    async fn test_noop_backend_from_default_config() {
        let notifier = from_config(&AppConfig::default()).unwrap();
        let result = notifier
            .send_rendered_notification(&notification(vec!["owner@example.com"]))
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_ensure_recipients_rejects_placeholder() {
        assert!(ensure_recipients(&notification(vec![""])).is_err());
        assert!(ensure_recipients(&notification(vec![])).is_err());
        assert!(ensure_recipients(&notification(vec!["a@b.c"])).is_ok());
    }
}
