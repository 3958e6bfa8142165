//! # HTTP Server Module
//!
//! Axum routing layer in front of the telemetry store and live feed.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `POST /data` - Ingest a reading (requires `x-api-key`)
//! - `/data/latest`, `/data/history` - Queries
//! - `/stream` - Live feed (Server-Sent Events)
//! - `/__debug` - Static file layout and feed stats
//! - everything else - static files from the public directory

pub mod auth;
pub mod config;
pub mod data_routes;
pub mod errors;
pub mod observability_routes;
pub mod server;
pub mod stream_routes;

pub use auth::{ApiKeyAuth, API_KEY_HEADER};
pub use config::{ConfigError, ServerConfig};
pub use errors::ApiError;
pub use server::HttpServer;
