//! # Telemetry Module
//!
//! In-memory state for ingested sensor readings.
//!
//! - **Reading**: one immutable sample (sensor, value, ts)
//! - **StateStore**: the `latest` slot plus a bounded FIFO history
//! - **Validation**: turns a raw JSON payload into an ingestion request

pub mod errors;
pub mod reading;
pub mod store;

pub use errors::{TelemetryError, TelemetryResult};
pub use reading::{IngestRequest, Reading};
pub use store::{HistorySnapshot, StateStore, DEFAULT_HISTORY_CAPACITY};
