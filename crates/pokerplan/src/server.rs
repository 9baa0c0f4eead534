//! `PokerServer` builder and server loop.
//!
//! This is the entry point for running a Pokerplan server. It ties
//! together all the layers: transport → protocol → room.

use std::sync::Arc;

use pokerplan_protocol::{Codec, JsonCodec, ServerEvent};
use pokerplan_room::{
    EvictReason, ExpiryReaper, RoomRegistry, RoomsConfig,
    SessionCoordinator,
};
use pokerplan_transport::{
    ConnectionId, Hub, Transport, WebSocketTransport,
};

use crate::ServerError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Room state
/// lives behind the coordinator's own lock; the hub has its own.
pub(crate) struct ServerState {
    pub(crate) coordinator: Arc<SessionCoordinator>,
    pub(crate) hub: Hub,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Pokerplan server.
///
/// # Example
///
/// ```rust,ignore
/// use pokerplan::PokerServer;
///
/// let server = PokerServer::builder()
///     .bind("0.0.0.0:3001")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct PokerServerBuilder {
    bind_addr: String,
    rooms_config: RoomsConfig,
}

impl PokerServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            rooms_config: RoomsConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room lifetime thresholds.
    pub fn rooms_config(mut self, config: RoomsConfig) -> Self {
        self.rooms_config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<PokerServer, ServerError> {
        let transport =
            WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            coordinator: Arc::new(SessionCoordinator::new(
                RoomRegistry::new(),
            )),
            hub: Hub::new(),
            codec: JsonCodec,
        });

        Ok(PokerServer {
            transport,
            state,
            rooms_config: self.rooms_config,
        })
    }
}

impl Default for PokerServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Pokerplan server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct PokerServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
    rooms_config: RoomsConfig,
}

impl PokerServer {
    /// Creates a new builder.
    pub fn builder() -> PokerServerBuilder {
        PokerServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server: starts the expiry reaper, then accepts incoming
    /// connections and spawns a handler task for each. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        self.spawn_reaper();
        tracing::info!("Pokerplan server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }

    /// Starts the background expiry sweep.
    ///
    /// Idle-empty evictions have nobody left to tell. Max-age evictions
    /// can still have seated players; they get an `error` frame so the
    /// client shows why the room vanished.
    fn spawn_reaper(&self) {
        let reaper = ExpiryReaper::new(
            Arc::clone(&self.state.coordinator),
            self.rooms_config.clone(),
        );
        let hub = self.state.hub.clone();
        let codec = self.state.codec;

        tokio::spawn(reaper.run(move |evicted| {
            hub.drop_topic(evicted.code.as_str());
            if evicted.reason != EvictReason::MaxAge {
                return;
            }
            let event = ServerEvent::Error {
                message: "Room expired".to_string(),
            };
            match codec.encode(&event) {
                Ok(frame) => {
                    for member in &evicted.members {
                        hub.send_to(
                            ConnectionId::new(member.0),
                            &frame,
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "failed to encode eviction notice"
                    );
                }
            }
        }));
    }
}
