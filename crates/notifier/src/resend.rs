use async_trait::async_trait;
use serde::Serialize;

use mailer_common::types::RenderedNotification;

use crate::{Notifier, NotifierError, ensure_recipients};

/// Request body accepted by the Resend `POST /emails` endpoint.
#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
}

/// Sends email through the Resend HTTP API.
pub struct ResendNotifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

impl ResendNotifier {
    pub fn new(api_url: String, api_key: String, from_address: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key, from_address)
    }

    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        api_key: String,
        from_address: String,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            from_address,
        }
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send_rendered_notification(
        &self,
        notification: &RenderedNotification,
    ) -> Result<(), NotifierError> {
        ensure_recipients(notification)?;

        let body = ResendEmail {
            from: &self.from_address,
            to: notification
                .recipients
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .collect(),
            subject: &notification.subject,
            text: &notification.rendered,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifierError::Delivery(format!("Resend request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotifierError::Delivery(format!(
                "Resend returned {}: {}",
                status, detail
            )));
        }

        tracing::info!(
            recipients = ?notification.recipients,
            subject = %notification.subject,
            "Notification sent via Resend"
        );
        Ok(())
    }
}
