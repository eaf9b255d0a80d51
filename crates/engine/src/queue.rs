//! In-memory notification queue.
//!
//! Unbounded single-consumer channel between the event hook and the worker.
//! A shared counter tracks tasks that were enqueued but not yet finished.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use uuid::Uuid;

use mailer_common::error::AppError;
use mailer_common::types::{Annotation, NotificationTask, RenderedNotification};

/// Create a connected queue/receiver pair.
pub fn notification_queue() -> (NotificationQueue, NotificationReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let pending = Arc::new(AtomicUsize::new(0));
    (
        NotificationQueue {
            sender,
            pending: Arc::clone(&pending),
        },
        NotificationReceiver { receiver, pending },
    )
}

/// Producer side, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<NotificationTask>,
    pending: Arc<AtomicUsize>,
}

impl NotificationQueue {
    /// Wrap the pair in a task and hand it to the worker.
    pub fn enqueue(
        &self,
        annotation: Annotation,
        notification: RenderedNotification,
    ) -> Result<Uuid, AppError> {
        let task = NotificationTask::new(annotation, notification);
        let task_id = task.id;

        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(task).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(AppError::Queue(
                "notification worker is not running".to_string(),
            ));
        }

        tracing::debug!(task_id = %task_id, "Notification task enqueued");
        Ok(task_id)
    }

    /// Tasks enqueued but not yet marked done.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer side, owned by the worker.
#[derive(Debug)]
pub struct NotificationReceiver {
    receiver: mpsc::UnboundedReceiver<NotificationTask>,
    pending: Arc<AtomicUsize>,
}

impl NotificationReceiver {
    /// Wait for the next task. `None` once every producer is dropped and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<NotificationTask> {
        self.receiver.recv().await
    }

    /// Mark one received task as finished.
    pub fn task_done(&self) {
        // Saturate rather than wrap if called more often than tasks arrived
        let _ = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}
