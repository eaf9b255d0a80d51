//! Domain mailer HTTP surface.
//!
//! Endpoints:
//! - POST /api/events/annotations — receive annotation lifecycle events
//! - GET  /health — liveness plus queue depth

pub mod middleware;
pub mod routes;
pub mod state;
