use crate::config::StreamConfig;
use crate::connection::{ConnectionGuard, ConnectionRegistry};
use crate::stream::GreetingStream;
use domain::clock::Clock;
use domain::GreetingRequest;
use log::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Opens continuous greeting streams and keeps track of them until they end.
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
    shutdown: CancellationToken,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Start a continuous stream for `request` and register its connection.
    ///
    /// The connection stays registered for as long as the returned stream is
    /// alive. Streams opened after [`Manager::shutdown`] end immediately.
    pub fn open_stream(
        &self,
        clock: Arc<dyn Clock>,
        request: GreetingRequest,
        config: StreamConfig,
    ) -> GreetingStream {
        let cancel = self.shutdown.child_token();
        let name = request.name().to_string();
        let stream = GreetingStream::periodic(clock, request, config, cancel);

        let connection_id = stream.id().clone();
        self.registry.register(connection_id.clone(), name);
        info!("Registered new SSE connection {}", connection_id.as_str());

        stream.with_connection(ConnectionGuard::new(connection_id, self.registry.clone()))
    }

    /// Cancel every open stream and refuse to run new ones. Each stream's token
    /// is a child of the manager's, so one cancel reaches all of them.
    pub fn shutdown(&self) {
        info!(
            "Shutting down {} open SSE connection(s)",
            self.registry.len()
        );
        self.shutdown.cancel();
    }

    pub fn active_connections(&self) -> usize {
        self.registry.len()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
