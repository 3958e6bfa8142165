//! Observability subsystem
//!
//! Structured logging through `tracing`. Request spans come from
//! `tower_http::trace::TraceLayer` in the HTTP server.

mod logging;

pub use logging::{build_filter, default_filter, init_logging};
