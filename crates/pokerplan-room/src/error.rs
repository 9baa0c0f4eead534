//! Error types for the room layer.
//!
//! Every variant is local to the failing intent: it is reported back to
//! the caller as an `error` frame and never mutates room state. The
//! display strings are the exact messages clients show.

use pokerplan_protocol::{PlayerId, RoomCode};

/// Errors that can occur while applying a client intent.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Bad input: blank name, malformed code, or a name already in use.
    #[error("{0}")]
    Validation(String),

    /// No live room has this code.
    #[error("Room not found")]
    NotFound(RoomCode),

    /// The intent came from a connection that isn't seated anywhere.
    #[error("You are not in a room")]
    NotInRoom(PlayerId),

    /// A non-host tried a host-only operation.
    #[error("Only host can {action}")]
    NotHost {
        player: PlayerId,
        action: &'static str,
    },

    /// Reveal requested with zero votes cast.
    #[error("Nobody has voted yet")]
    NoVotes,

    /// Vote cast after the round was revealed.
    #[error("Voting is already revealed")]
    AlreadyRevealed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerplan_protocol::RoomCode;

    #[test]
    fn test_display_matches_client_messages() {
        assert_eq!(
            RoomError::NotFound(RoomCode::parse("AB12CD").unwrap())
                .to_string(),
            "Room not found"
        );
        assert_eq!(
            RoomError::NotHost {
                player: PlayerId(3),
                action: "reveal cards",
            }
            .to_string(),
            "Only host can reveal cards"
        );
        assert_eq!(
            RoomError::Validation("Player name is required".into())
                .to_string(),
            "Player name is required"
        );
    }
}
