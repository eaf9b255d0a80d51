//! Notification worker.
//!
//! Single consumer of the notification queue. For each task:
//! 1. Fetch the annotated page
//! 2. Resolve its reply-to addresses through the `DocumentCache`
//! 3. Keep the addresses whose domain matches the page
//! 4. Deliver one copy of the pre-rendered notification per matching address
//!
//! A failing task is logged and discarded; the worker keeps running.

use std::sync::Arc;

use mailer_common::types::NotificationTask;
use mailer_notifier::Notifier;

use crate::cache::DocumentCache;
use crate::domain::matching_recipients;
use crate::fetcher::PageFetcher;
use crate::queue::NotificationReceiver;

/// What a processed task amounted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Reply-to addresses found on the page
    pub candidates: usize,
    /// Addresses whose domain matched the page
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub struct NotificationWorker {
    receiver: NotificationReceiver,
    fetcher: PageFetcher,
    notifier: Arc<dyn Notifier>,
    cache: DocumentCache,
}

impl NotificationWorker {
    pub fn new(
        receiver: NotificationReceiver,
        fetcher: PageFetcher,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            receiver,
            fetcher,
            notifier,
            cache: DocumentCache::new(),
        }
    }

    /// Consume tasks until every queue handle has been dropped.
    pub async fn run(mut self) {
        tracing::info!("Notification worker started");

        while let Some(task) = self.receiver.recv().await {
            match self.process_task(&task).await {
                Ok(outcome) => {
                    tracing::info!(
                        task_id = %task.id,
                        uri = %task.annotation.uri,
                        candidates = outcome.candidates,
                        matched = outcome.matched,
                        delivered = outcome.delivered,
                        failed = outcome.failed,
                        "Notification task processed"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        task_id = %task.id,
                        uri = %task.annotation.uri,
                        error = ?e,
                        "Notification task failed, discarding"
                    );
                }
            }
            self.receiver.task_done();
        }

        tracing::info!(
            cached_documents = self.cache.len(),
            "Notification worker stopped"
        );
    }

    /// Run one task through fetch → cache → domain match → deliver.
    pub async fn process_task(&mut self, task: &NotificationTask) -> anyhow::Result<TaskOutcome> {
        let uri = &task.annotation.uri;
        let page = self.fetcher.fetch(uri).await?;
        let emails = self.cache.resolve(uri, page.date.as_deref(), &page.body);
        let recipients = matching_recipients(uri, &emails);

        let mut outcome = TaskOutcome {
            candidates: emails.len(),
            matched: recipients.len(),
            ..TaskOutcome::default()
        };

        for email in &recipients {
            let notification = task.notification.for_recipient(email);
            match self.notifier.send_rendered_notification(&notification).await {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    outcome.failed += 1;
                    tracing::warn!(
                        task_id = %task.id,
                        recipient = %email,
                        error = %e,
                        "Failed to deliver notification"
                    );
                }
            }
        }

        Ok(outcome)
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }
}
