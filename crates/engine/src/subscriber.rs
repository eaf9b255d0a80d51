//! Annotation event hook.
//!
//! Turns "annotation created" events into queued notification tasks. The body
//! is rendered here, before the task crosses into the worker.

use std::sync::Arc;

use mailer_common::error::AppError;
use mailer_common::types::{AnnotationEvent, EventAction};

use crate::queue::NotificationQueue;
use crate::template::DocumentOwnerTemplate;

#[derive(Clone)]
pub struct DomainNotificationSubscriber {
    template: Arc<DocumentOwnerTemplate>,
    queue: NotificationQueue,
}

impl DomainNotificationSubscriber {
    pub fn new(template: Arc<DocumentOwnerTemplate>, queue: NotificationQueue) -> Self {
        Self { template, queue }
    }

    /// Handle an annotation event. Returns `true` when a task was queued.
    pub fn handle(&self, event: &AnnotationEvent) -> Result<bool, AppError> {
        if event.action != EventAction::Create {
            tracing::debug!(
                action = %event.action,
                annotation_id = %event.annotation.id,
                "Ignoring annotation event"
            );
            return Ok(false);
        }

        // Recipients are filled in per matching owner by the worker
        let notification = self.template.generate_notification(&event.annotation, "")?;
        let task_id = self.queue.enqueue(event.annotation.clone(), notification)?;

        tracing::info!(
            task_id = %task_id,
            annotation_id = %event.annotation.id,
            uri = %event.annotation.uri,
            "Queued document owner notification"
        );
        Ok(true)
    }

    pub fn queue(&self) -> &NotificationQueue {
        &self.queue
    }
}
