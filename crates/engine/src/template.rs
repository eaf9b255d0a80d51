//! Document owner notification template.
//!
//! Renders the email a page owner receives when someone annotates their page.
//! The template is embedded at compile time and rendered with tera; rendering
//! happens on the event side so the worker only has to re-address the result.

use tera::{Context, Tera};

use mailer_common::error::AppError;
use mailer_common::types::{Annotation, RenderedNotification};

const TEMPLATE_NAME: &str = "document_owner_notification.txt";

/// Renders `RenderedNotification`s for page owners.
pub struct DocumentOwnerTemplate {
    engine: Tera,
    base_url: String,
}

impl DocumentOwnerTemplate {
    /// `base_url` is the annotation application's public URL, used to build
    /// profile and standalone annotation links.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let mut engine = Tera::default();
        engine
            .add_raw_template(
                TEMPLATE_NAME,
                include_str!("../templates/document_owner_notification.txt"),
            )
            .map_err(|e| AppError::Template(e.to_string()))?;

        Ok(Self {
            engine,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the template variables for an annotation.
    pub fn template_map(&self, annotation: &Annotation) -> Result<Context, AppError> {
        let user = username(&annotation.user).ok_or_else(|| {
            AppError::Validation(format!(
                "annotation {} has a malformed user: {}",
                annotation.id, annotation.user
            ))
        })?;

        let tags = match annotation.tags.as_deref() {
            Some(tags) if !tags.is_empty() => format!("\ntags: {}", tags.join(", ")),
            _ => String::new(),
        };

        let mut context = Context::new();
        context.insert("document_title", &annotation.title);
        context.insert("document_path", &annotation.uri);
        context.insert("text", &annotation.text);
        context.insert("tags", &tags);
        context.insert("user_profile", &self.user_profile_url(user));
        context.insert("user", user);
        context.insert("path", &self.standalone_url(&annotation.id));
        context.insert("timestamp", &annotation.created.to_rfc3339());
        Ok(context)
    }

    /// Render the plain-text body.
    pub fn render(&self, annotation: &Annotation) -> Result<String, AppError> {
        let context = self.template_map(annotation)?;
        self.engine
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| AppError::Template(e.to_string()))
    }

    /// Render a notification addressed to `email`.
    pub fn generate_notification(
        &self,
        annotation: &Annotation,
        email: &str,
    ) -> Result<RenderedNotification, AppError> {
        Ok(RenderedNotification {
            status: true,
            recipients: vec![email.to_string()],
            rendered: self.render(annotation)?,
            subject: subject(annotation),
        })
    }

    fn user_profile_url(&self, username: &str) -> String {
        format!("{}/u/{}", self.base_url, username)
    }

    fn standalone_url(&self, annotation_id: &str) -> String {
        format!("{}/a/{}", self.base_url, annotation_id)
    }
}

/// Email subject for a document owner notification.
pub fn subject(annotation: &Annotation) -> String {
    format!(
        "New annotation in your page: {} ({})",
        annotation.title, annotation.uri
    )
}

/// Extract the username from an `acct:<username>@<authority>` account URI.
pub fn username(user: &str) -> Option<&str> {
    let rest = user.strip_prefix("acct:")?;
    let name = rest.split('@').next()?;
    if name.is_empty() { None } else { Some(name) }
}
