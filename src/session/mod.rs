pub mod events;
pub mod publisher;

pub use events::{ProgressEvent, Stage};
pub use publisher::{ChannelPublisher, NullPublisher, Publisher};

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc::UnboundedSender;

type Channel = UnboundedSender<ProgressEvent>;

/// Maps session identifiers to live progress channels.
///
/// Entries appear when a streaming connection is accepted and disappear
/// when it closes. Registrations and lookups arrive from independent
/// connections, so the map sits behind a lock; the lock is never held
/// across an await point.
#[derive(Default)]
pub struct SessionRegistry {
    channels: RwLock<HashMap<String, Channel>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still holds a usable map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Channel>> {
        self.channels.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Channel>> {
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `channel` for `session_id`, replacing any prior channel.
    /// At most one channel is active per id.
    pub fn register(&self, session_id: impl Into<String>, channel: Channel) {
        let session_id = session_id.into();
        tracing::debug!(session_id = %session_id, "registering session channel");
        self.write().insert(session_id, channel);
    }

    /// Removes the entry for `session_id` regardless of which channel holds it.
    pub fn unregister(&self, session_id: &str) {
        if self.write().remove(session_id).is_some() {
            tracing::debug!(session_id = %session_id, "unregistered session channel");
        }
    }

    /// Removes the entry for `session_id` only if it still holds `channel`.
    ///
    /// A stream that was replaced by a newer connection for the same id
    /// must not tear down the replacement when it closes.
    pub fn release(&self, session_id: &str, channel: &Channel) -> bool {
        let mut channels = self.write();
        match channels.get(session_id) {
            Some(current) if current.same_channel(channel) => {
                channels.remove(session_id);
                tracing::debug!(session_id = %session_id, "released session channel");
                true
            }
            _ => false,
        }
    }

    pub fn lookup(&self, session_id: &str) -> Option<Channel> {
        self.read().get(session_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
