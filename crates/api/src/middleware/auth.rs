//! Shared-secret authentication for incoming annotation events.
//!
//! When `EVENT_WEBHOOK_SECRET` is configured, the annotation application must
//! send it as `Authorization: Bearer <secret>` or `X-Webhook-Secret: <secret>`.
//! Without a configured secret every caller is accepted.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use mailer_common::error::AppError;

use crate::state::AppState;

/// Marker extractor for requests that passed the event secret check.
#[derive(Debug, Clone, Copy)]
pub struct EventSource {
    /// Whether a secret was actually checked
    pub authenticated: bool,
}

/// Compare a presented secret against the expected one without
/// short-circuiting on the first differing byte.
pub fn verify_secret(expected: &str, presented: Option<&str>) -> bool {
    match presented {
        Some(presented) => {
            let a = expected.as_bytes();
            let b = presented.as_bytes();
            a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
        }
        None => false,
    }
}

fn presented_secret(parts: &Parts) -> Option<String> {
    if let Some(auth) = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        && let Some(token) = auth.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    parts
        .headers
        .get("x-webhook-secret")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
}

impl FromRequestParts<AppState> for EventSource {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let expected = state.config.event_webhook_secret.clone();
        let presented = presented_secret(parts);

        async move {
            let Some(expected) = expected else {
                return Ok(EventSource {
                    authenticated: false,
                });
            };

            if verify_secret(&expected, presented.as_deref()) {
                Ok(EventSource {
                    authenticated: true,
                })
            } else {
                tracing::warn!("Rejected annotation event with missing or wrong secret");
                Err(AppError::Auth(
                    "Missing or invalid event secret. Use 'Bearer <secret>' or 'X-Webhook-Secret: <secret>'"
                        .to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_secret_matches() {
        assert!(verify_secret("s3cret", Some("s3cret")));
    }

    #[test]
    fn test_verify_secret_rejects_wrong_or_missing() {
        assert!(!verify_secret("s3cret", Some("s3cre")));
        assert!(!verify_secret("s3cret", Some("s3cres")));
        assert!(!verify_secret("s3cret", Some("")));
        assert!(!verify_secret("s3cret", None));
    }

    #[test]
    fn test_presented_secret_sources() {
        let (mut parts, _) = axum::http::Request::builder()
            .header("authorization", "Bearer abc")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(presented_secret(&parts).as_deref(), Some("abc"));

        parts.headers.remove("authorization");
        parts
            .headers
            .insert("x-webhook-secret", "xyz".parse().unwrap());
        assert_eq!(presented_secret(&parts).as_deref(), Some("xyz"));

        parts.headers.clear();
        assert_eq!(presented_secret(&parts), None);
    }
}
