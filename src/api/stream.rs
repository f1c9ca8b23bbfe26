use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::server::AppState;
use crate::session::{ProgressEvent, SessionRegistry};

/// Long-lived progress subscription for one session.
///
/// Registers a channel under the session id, greets the client with a
/// `connected` event, then relays workflow events until a terminal event,
/// a client disconnect, or server shutdown closes the stream.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!(session_id = %session_id, "progress stream opened");

    let stream = progress_stream(
        Arc::clone(&state.sessions),
        session_id,
        state.shutdown.clone(),
    )
    .map(|event| {
        let sse_event = Event::default().json_data(&event).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize progress event");
            Event::default().data("{}")
        });
        Ok(sse_event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn progress_stream(
    sessions: Arc<SessionRegistry>,
    session_id: String,
    shutdown: CancellationToken,
) -> impl Stream<Item = ProgressEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    // The greeting goes through the channel so it shares the channel's
    // ordering with workflow events.
    let _ = tx.send(ProgressEvent::connected(session_id.clone()));
    sessions.register(session_id.clone(), tx.clone());

    let guard = ReleaseGuard {
        sessions,
        session_id,
        channel: tx,
    };

    futures::stream::unfold(
        Subscription {
            rx,
            shutdown,
            done: false,
            _guard: guard,
        },
        |mut sub| async move {
            if sub.done {
                return None;
            }
            let event = tokio::select! {
                _ = sub.shutdown.cancelled() => return None,
                event = sub.rx.recv() => event?,
            };
            sub.done = event.is_terminal();
            Some((event, sub))
        },
    )
}

struct Subscription {
    rx: mpsc::UnboundedReceiver<ProgressEvent>,
    shutdown: CancellationToken,
    done: bool,
    _guard: ReleaseGuard,
}

/// Unregisters the session entry when the stream goes away, but only if
/// the entry still belongs to this stream's channel.
struct ReleaseGuard {
    sessions: Arc<SessionRegistry>,
    session_id: String,
    channel: mpsc::UnboundedSender<ProgressEvent>,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if self.sessions.release(&self.session_id, &self.channel) {
            tracing::info!(session_id = %self.session_id, "progress stream closed");
        }
    }
}
