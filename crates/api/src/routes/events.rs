//! Annotation event intake.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use mailer_common::error::AppError;
use mailer_common::types::AnnotationEvent;

use crate::middleware::auth::EventSource;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/events/annotations", post(receive_annotation_event))
}

/// Response for an accepted event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub queued: bool,
}

/// POST /api/events/annotations — Queue a document owner notification for
/// newly created annotations; other actions are acknowledged and ignored.
async fn receive_annotation_event(
    State(state): State<AppState>,
    _source: EventSource,
    Json(event): Json<AnnotationEvent>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    if event.annotation.uri.trim().is_empty() {
        return Err(AppError::Validation(
            "annotation uri must not be empty".to_string(),
        ));
    }

    let queued = state.subscriber.handle(&event)?;
    let status = if queued {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(EventResponse { queued })))
}
