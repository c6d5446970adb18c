//! Server-Sent Events stream of view changes.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use modqueue::view::ViewEvent;
use tokio::sync::broadcast;
use tracing::warn;

use crate::state::AppState;

/// SSE event name for a view change.
fn event_name(event: &ViewEvent) -> &'static str {
    match event {
        ViewEvent::SliceChanged { .. } | ViewEvent::FiltersChanged { .. } => "change",
        ViewEvent::ReportResolved { .. } => "resolved",
        ViewEvent::ResolveFailed { .. } => "resolve_failed",
    }
}

fn to_sse_event(event: &ViewEvent) -> Option<Event> {
    let json = serde_json::to_string(event).ok()?;
    Some(Event::default().event(event_name(event)).data(json))
}

/// SSE endpoint handler.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.view.subscribe();

    let stream = async_stream::stream! {
        // Send initial connected event
        yield Ok(Event::default().event("connected").data("{}"));

        loop {
            match rx.recv().await {
                Ok(view_event) => {
                    if let Some(event) = to_sse_event(&view_event) {
                        yield Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
