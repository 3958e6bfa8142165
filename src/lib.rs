//! sensorfeed - A minimal telemetry ingestion endpoint
//!
//! Devices push scalar readings over HTTP; clients read the latest reading,
//! the bounded history, or follow a live Server-Sent Events feed.

pub mod cli;
pub mod feed;
pub mod http_server;
pub mod observability;
pub mod telemetry;
