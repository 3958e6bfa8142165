//! # State Store
//!
//! Holds the most recent reading and a bounded history of past readings.
//!
//! Ingestion takes the write lock for the whole set-append-evict step, so
//! readers never observe `latest` and `history` out of step with each other.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::Utc;
use serde::Serialize;

use super::errors::{TelemetryError, TelemetryResult};
use super::reading::{IngestRequest, Reading};

/// Default history bound
pub const DEFAULT_HISTORY_CAPACITY: usize = 5000;

/// Snapshot of the history buffer, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct HistorySnapshot {
    pub count: usize,
    pub history: Vec<Reading>,
}

#[derive(Debug, Default)]
struct Inner {
    latest: Option<Reading>,
    history: VecDeque<Reading>,
}

/// Shared telemetry state.
#[derive(Debug)]
pub struct StateStore {
    capacity: usize,
    inner: RwLock<Inner>,
}

impl StateStore {
    /// Create an empty store bounded to `capacity` readings.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: RwLock::new(Inner {
                latest: None,
                history: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            }),
        }
    }

    /// Maximum number of readings kept in history
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a reading stamped with the current wall-clock time.
    ///
    /// The clock is read while the write lock is held, so history stays
    /// ordered by `ts` under concurrent writers.
    pub fn ingest(&self, request: IngestRequest) -> TelemetryResult<Reading> {
        self.insert_with(request, || Utc::now().timestamp_millis())
    }

    /// Store a reading with an explicit timestamp (ms since epoch).
    pub fn ingest_at(&self, request: IngestRequest, ts: i64) -> TelemetryResult<Reading> {
        self.insert_with(request, || ts)
    }

    fn insert_with<F>(&self, request: IngestRequest, clock: F) -> TelemetryResult<Reading>
    where
        F: FnOnce() -> i64,
    {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| TelemetryError::lock_poisoned())?;

        let reading = Reading {
            sensor: request.sensor,
            value: request.value,
            ts: clock(),
        };

        if inner.history.len() >= self.capacity {
            inner.history.pop_front();
        }
        inner.history.push_back(reading.clone());
        inner.latest = Some(reading.clone());

        Ok(reading)
    }

    /// The most recently ingested reading, if any
    pub fn latest(&self) -> TelemetryResult<Option<Reading>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| TelemetryError::lock_poisoned())?;
        Ok(inner.latest.clone())
    }

    /// Full copy of the history buffer and its length
    pub fn history(&self) -> TelemetryResult<HistorySnapshot> {
        let inner = self
            .inner
            .read()
            .map_err(|_| TelemetryError::lock_poisoned())?;
        let history: Vec<Reading> = inner.history.iter().cloned().collect();
        Ok(HistorySnapshot {
            count: history.len(),
            history,
        })
    }

    /// Number of readings currently held
    pub fn len(&self) -> TelemetryResult<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| TelemetryError::lock_poisoned())?;
        Ok(inner.history.len())
    }

    /// True before the first ingestion
    pub fn is_empty(&self) -> TelemetryResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(sensor: &str, value: f64) -> IngestRequest {
        IngestRequest::new(sensor, value).unwrap()
    }

    #[test]
    fn test_empty_store() {
        let store = StateStore::default();
        assert!(store.latest().unwrap().is_none());
        let snapshot = store.history().unwrap();
        assert_eq!(snapshot.count, 0);
        assert!(snapshot.history.is_empty());
        assert!(store.is_empty().unwrap());
        assert_eq!(store.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_ingest_sets_latest_with_wall_clock_ts() {
        let store = StateStore::default();
        let before = Utc::now().timestamp_millis();
        let stored = store.ingest(req("temp1", 23.5)).unwrap();
        let after = Utc::now().timestamp_millis();

        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest, stored);
        assert_eq!(latest.sensor, "temp1");
        assert_eq!(latest.value, 23.5);
        assert!(latest.ts >= before && latest.ts <= after);
    }

    #[test]
    fn test_history_ends_with_latest() {
        let store = StateStore::default();
        store.ingest_at(req("a", 1.0), 10).unwrap();
        store.ingest_at(req("b", 2.0), 20).unwrap();

        let snapshot = store.history().unwrap();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.history.last(), store.latest().unwrap().as_ref());
        assert_eq!(snapshot.history[0].sensor, "a");
    }

    #[test]
    fn test_fifo_eviction() {
        let store = StateStore::new(5);
        for i in 0..8 {
            store.ingest_at(req("s", i as f64), i).unwrap();
        }

        let snapshot = store.history().unwrap();
        assert_eq!(snapshot.count, 5);
        let ts: Vec<i64> = snapshot.history.iter().map(|r| r.ts).collect();
        assert_eq!(ts, vec![3, 4, 5, 6, 7]);
        assert_eq!(store.latest().unwrap().unwrap().ts, 7);
    }

    #[test]
    fn test_default_capacity_bound() {
        let store = StateStore::default();
        let extra = 3;
        for i in 0..(DEFAULT_HISTORY_CAPACITY + extra) {
            store.ingest_at(req("s", 0.0), i as i64).unwrap();
        }

        let snapshot = store.history().unwrap();
        assert_eq!(snapshot.count, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(snapshot.history[0].ts, extra as i64);
        assert!(snapshot.history.windows(2).all(|w| w[0].ts < w[1].ts));
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let store = StateStore::new(0);
        store.ingest_at(req("a", 1.0), 1).unwrap();
        store.ingest_at(req("b", 2.0), 2).unwrap();
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.history().unwrap().history[0].sensor, "b");
    }

    #[test]
    fn test_concurrent_ingest() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(StateStore::new(100));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        store.ingest_at(req("s", t as f64), t * 1000 + i).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let snapshot = store.history().unwrap();
        assert_eq!(snapshot.count, 100);
        assert_eq!(snapshot.history.last(), store.latest().unwrap().as_ref());
    }

    #[test]
    fn test_concurrent_wall_clock_ingest_keeps_ts_order() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(StateStore::new(100_000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..5_000 {
                        store.ingest(req("s", t as f64)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let snapshot = store.history().unwrap();
        assert_eq!(snapshot.count, 40_000);
        assert!(snapshot.history.windows(2).all(|w| w[0].ts <= w[1].ts));
        assert_eq!(snapshot.history.last(), store.latest().unwrap().as_ref());
    }

    #[test]
    fn test_poisoned_lock_is_internal_error() {
        use std::sync::Arc;

        let store = Arc::new(StateStore::default());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("writer died");
        })
        .join();

        assert_eq!(store.len(), Err(TelemetryError::lock_poisoned()));
        assert!(store.latest().is_err());
        assert!(store.ingest(req("s", 1.0)).is_err());
    }
}
