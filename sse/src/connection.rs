use dashmap::DashMap;
use log::*;
use std::sync::Arc;

/// Unique identifier for a stream and the connection it is served on (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection information (no redundant connection_id)
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// The name the stream greets, kept for diagnostics
    pub name: String,
}

/// Registry of every open greeting stream, keyed by connection id.
///
/// The registry never touches a stream's output. It only records which
/// streams are open; cancellation flows through each stream's own token.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, ConnectionInfo>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn register(&self, connection_id: ConnectionId, name: String) {
        self.connections.insert(connection_id, ConnectionInfo { name });
    }

    pub fn unregister(&self, connection_id: &ConnectionId) {
        if let Some((_, info)) = self.connections.remove(connection_id) {
            debug!(
                "Unregistered stream {} for name {:?}",
                connection_id.as_str(),
                info.name
            );
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes its connection from the registry when dropped.
///
/// A stream owns its guard, so the entry disappears whenever the stream does,
/// including when axum drops the response body because the client went away.
pub struct ConnectionGuard {
    connection_id: ConnectionId,
    registry: Arc<ConnectionRegistry>,
}

impl ConnectionGuard {
    pub fn new(connection_id: ConnectionId, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            connection_id,
            registry,
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.unregister(&self.connection_id);
    }
}
