use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Create => write!(f, "create"),
            EventAction::Update => write!(f, "update"),
            EventAction::Delete => write!(f, "delete"),
        }
    }
}

/// A user-submitted annotation tied to a page URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    /// URL of the annotated page
    pub uri: String,
    /// Title of the annotated document
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Account URI, e.g. `acct:alice@example.org`
    pub user: String,
    pub created: DateTime<Utc>,
}

/// An annotation lifecycle event emitted by the annotation application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationEvent {
    pub action: EventAction,
    pub annotation: Annotation,
}

/// A notification rendered ahead of delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedNotification {
    pub status: bool,
    pub recipients: Vec<String>,
    /// Plain-text body
    pub rendered: String,
    pub subject: String,
}

impl RenderedNotification {
    /// Copy of this notification addressed to a single recipient.
    pub fn for_recipient(&self, email: &str) -> Self {
        Self {
            recipients: vec![email.to_string()],
            ..self.clone()
        }
    }
}

/// One unit of work for the notification worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTask {
    pub id: Uuid,
    pub annotation: Annotation,
    pub notification: RenderedNotification,
    pub enqueued_at: DateTime<Utc>,
}

impl NotificationTask {
    pub fn new(annotation: Annotation, notification: RenderedNotification) -> Self {
        Self {
            id: Uuid::new_v4(),
            annotation,
            notification,
            enqueued_at: Utc::now(),
        }
    }
}
