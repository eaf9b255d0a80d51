//! Domain mailer binary entrypoint.
//!
//! Serves the annotation event endpoint and runs the notification worker in
//! the same process.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mailer_common::config::AppConfig;
use mailer_common::error::AppError;
use mailer_engine::fetcher::PageFetcher;
use mailer_engine::queue::notification_queue;
use mailer_engine::subscriber::DomainNotificationSubscriber;
use mailer_engine::template::DocumentOwnerTemplate;
use mailer_engine::worker::NotificationWorker;

use mailer_api::routes::create_router;
use mailer_api::state::AppState;

/// Annotation events are small JSON documents.
const MAX_EVENT_BODY_BYTES: usize = 256 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "mailer_api=info,mailer_engine=info,mailer_notifier=info,tower_http=info",
            )
        }))
        .json()
        .init();

    tracing::info!("Domain mailer starting...");

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| AppError::Config(format!("{:#}", e)))?;

    // Delivery backend + page fetcher
    let notifier = mailer_notifier::from_config(&config).map_err(AppError::from)?;
    let fetcher = PageFetcher::new(config.fetch_timeout())?;

    // Queue and worker
    let (queue, receiver) = notification_queue();
    let worker = NotificationWorker::new(receiver, fetcher, notifier);
    let worker_handle = tokio::spawn(worker.run());

    // Event hook
    let template = Arc::new(DocumentOwnerTemplate::new(config.app_base_url.clone())?);
    let subscriber = DomainNotificationSubscriber::new(template, queue);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|_| anyhow::anyhow!("LISTEN_ADDR must be a socket address"))?;

    // Build router
    let state = AppState::new(subscriber, config);
    let app = create_router(state)
        .layer(RequestBodyLimitLayer::new(MAX_EVENT_BODY_BYTES))
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    // The router (and with it the last queue handle) is gone; let the worker
    // drain what is already queued.
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "Notification worker panicked");
    }

    tracing::info!("Domain mailer stopped.");
    Ok(())
}
