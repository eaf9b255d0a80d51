//! Shared application state for the Axum API server.

use mailer_common::config::AppConfig;
use mailer_engine::subscriber::DomainNotificationSubscriber;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub subscriber: DomainNotificationSubscriber,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(subscriber: DomainNotificationSubscriber, config: AppConfig) -> Self {
        Self { subscriber, config }
    }
}
