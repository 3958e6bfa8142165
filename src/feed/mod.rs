//! # Live Feed Module
//!
//! Poll-based push of new readings to subscribers.
//!
//! Each subscription owns its own timer. On every tick it compares the
//! store's latest timestamp with the last one it emitted; there is no queue,
//! so readings overwritten between two ticks are never seen.

pub mod notifier;

pub use notifier::{FeedEvent, LiveFeed, Subscription, DEFAULT_CADENCE};
