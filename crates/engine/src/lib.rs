//! Domain notification engine: renders owner notifications, queues them and
//! delivers them from a single background worker.

pub mod cache;
pub mod domain;
pub mod fetcher;
pub mod queue;
pub mod reply_to;
pub mod subscriber;
pub mod template;
pub mod worker;
