//! Live Feed HTTP Route
//!
//! `GET /stream` as Server-Sent Events. The first event is named `init` and
//! carries the current latest reading; later events are unnamed.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
    routing::get,
    Router,
};
use futures_util::{future, Stream, StreamExt};
use tracing::error;

use crate::feed::{FeedEvent, LiveFeed};

use super::errors::ApiError;

/// Create the live feed route
pub fn stream_routes(feed: LiveFeed) -> Router {
    Router::new()
        .route("/stream", get(stream_handler))
        .with_state(feed)
}

async fn stream_handler(
    State(feed): State<LiveFeed>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let subscription = feed.subscribe()?;

    let events = subscription.into_stream().filter_map(|item| {
        future::ready(match item {
            Ok(event) => to_sse_event(&event).map(Ok::<Event, Infallible>),
            Err(e) => {
                error!(error = %e, "live feed stopped");
                None
            }
        })
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Encode a feed event as an SSE frame
pub fn to_sse_event(event: &FeedEvent) -> Option<Event> {
    let data = serde_json::to_string(event.reading()).ok()?;
    let sse = Event::default().data(data);
    match event {
        FeedEvent::Init(_) => Some(sse.event("init")),
        FeedEvent::Update(_) => Some(sse),
    }
}
