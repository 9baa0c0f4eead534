//! Unified error type for the Pokerplan server.

use pokerplan_protocol::ProtocolError;
use pokerplan_room::RoomError;
use pokerplan_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (validation, not found, host checks).
    #[error(transparent)]
    Room(#[from] RoomError),
}
