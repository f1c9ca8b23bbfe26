use std::sync::Arc;

use super::events::ProgressEvent;
use super::SessionRegistry;

/// Fire-and-forget delivery of progress events to a session's stream.
///
/// Delivery is best-effort. The authoritative workflow result travels on
/// the synchronous response, so publishing never fails, blocks, or cares
/// whether anyone is listening.
pub trait Publisher: Send + Sync {
    fn publish(&self, session_id: &str, event: ProgressEvent);
}

/// Publishes through the shared [`SessionRegistry`].
#[derive(Clone)]
pub struct ChannelPublisher {
    registry: Arc<SessionRegistry>,
}

impl ChannelPublisher {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&self, session_id: &str, event: ProgressEvent) {
        let Some(channel) = self.registry.lookup(session_id) else {
            tracing::trace!(session_id = %session_id, "no channel for session, dropping event");
            return;
        };

        // The receiver may have hung up between lookup and send.
        if channel.send(event).is_err() {
            tracing::debug!(session_id = %session_id, "session channel closed, event dropped");
        }
    }
}

/// Discards every event. Lets the orchestrator run without a live stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl Publisher for NullPublisher {
    fn publish(&self, _session_id: &str, _event: ProgressEvent) {}
}
