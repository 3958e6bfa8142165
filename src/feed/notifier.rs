//! # Live Feed Notifier
//!
//! Subscription lifecycle: `CONNECTED` (emit init if a reading exists),
//! `POLLING` (tick, compare timestamp, maybe emit), `CLOSED` (dropped).
//! Dropping a [`Subscription`] or its stream releases the timer.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::telemetry::{Reading, StateStore, TelemetryResult};

/// Default polling cadence
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(400);

/// An event delivered to a subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The latest reading at subscribe time
    Init(Reading),
    /// A reading observed on a later tick
    Update(Reading),
}

impl FeedEvent {
    /// The reading carried by this event
    pub fn reading(&self) -> &Reading {
        match self {
            FeedEvent::Init(r) | FeedEvent::Update(r) => r,
        }
    }
}

/// Factory for subscriptions over a shared store.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    store: Arc<StateStore>,
    cadence: Duration,
    active: Arc<AtomicUsize>,
    next_id: Arc<AtomicU64>,
}

impl LiveFeed {
    /// Create a feed polling `store` every `cadence`
    pub fn new(store: Arc<StateStore>, cadence: Duration) -> Self {
        Self {
            store,
            cadence,
            active: Arc::new(AtomicUsize::new(0)),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of subscriptions that have not been dropped yet
    pub fn active_subscribers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Open a subscription.
    ///
    /// Must be called from within a tokio runtime. The first tick fires one
    /// cadence after subscribing.
    pub fn subscribe(&self) -> TelemetryResult<Subscription> {
        let init = self.store.latest()?;
        let last_ts = init.as_ref().map(|r| r.ts);

        let mut interval = time::interval_at(Instant::now() + self.cadence, self.cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
        debug!(subscriber = id, has_init = init.is_some(), "live feed opened");

        Ok(Subscription {
            store: self.store.clone(),
            init,
            last_ts,
            interval,
            _guard: SubscriberGuard {
                id,
                active: self.active.clone(),
            },
        })
    }
}

/// Decrements the active count when the subscription goes away
#[derive(Debug)]
struct SubscriberGuard {
    id: u64,
    active: Arc<AtomicUsize>,
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        debug!(subscriber = self.id, "live feed closed");
    }
}

/// One subscriber's view of the feed.
#[derive(Debug)]
pub struct Subscription {
    store: Arc<StateStore>,
    init: Option<Reading>,
    last_ts: Option<i64>,
    interval: Interval,
    _guard: SubscriberGuard,
}

impl Subscription {
    /// Compare the store's latest reading with the last emitted one.
    ///
    /// Returns the reading if its timestamp differs and records it as
    /// emitted. Does not wait.
    pub fn poll_latest(&mut self) -> TelemetryResult<Option<Reading>> {
        let latest = self.store.latest()?;
        match latest {
            Some(reading) if Some(reading.ts) != self.last_ts => {
                self.last_ts = Some(reading.ts);
                Ok(Some(reading))
            }
            _ => Ok(None),
        }
    }

    /// Wait for the next event.
    ///
    /// Yields the pending init event first (if any), then waits tick by
    /// tick until the latest reading changes.
    pub async fn next_event(&mut self) -> TelemetryResult<FeedEvent> {
        if let Some(init) = self.init.take() {
            return Ok(FeedEvent::Init(init));
        }
        loop {
            self.interval.tick().await;
            if let Some(reading) = self.poll_latest()? {
                return Ok(FeedEvent::Update(reading));
            }
        }
    }

    /// Turn the subscription into a stream of events.
    ///
    /// A store error is yielded once and ends the stream.
    pub fn into_stream(self) -> impl Stream<Item = TelemetryResult<FeedEvent>> + Send {
        stream::unfold(Some(self), |state| async move {
            let mut sub = state?;
            match sub.next_event().await {
                Ok(event) => Some((Ok(event), Some(sub))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}
