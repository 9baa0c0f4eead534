//! Core protocol types: identities, intents, events, and snapshots.
//!
//! Tag and field names are normative. Intents and events are internally
//! tagged (`{"type": "join-room", ...}`) with kebab-case tags and
//! camelCase fields, which is exactly what the browser client emits and
//! expects.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CardValue;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identity: the ephemeral handle of their connection.
///
/// There is no account behind this — when the connection drops, the
/// identity is gone. Serializes as a plain number.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Length of a room code in characters.
pub const ROOM_CODE_LEN: usize = 6;

/// A normalized room code: exactly six ASCII alphanumerics, upper-cased.
///
/// Client input is case-insensitive; [`RoomCode::parse`] normalizes it.
/// Codes inside the server are always already normalized, so lookups
/// never need to re-case.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Normalizes and validates raw client input.
    pub fn parse(raw: &str) -> Result<Self, InvalidRoomCode> {
        let trimmed = raw.trim();
        if trimmed.len() != ROOM_CODE_LEN
            || !trimmed.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(InvalidRoomCode);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The input was not a well-formed room code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid room code")]
pub struct InvalidRoomCode;

// ---------------------------------------------------------------------------
// Inbound intents
// ---------------------------------------------------------------------------

/// What a client can ask the server to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientIntent {
    /// Open a new room with the caller as host.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        player_name: String,
        #[serde(default)]
        avatar: Option<String>,
    },

    /// Join an existing room by code.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_code: String,
        player_name: String,
        #[serde(default)]
        avatar: Option<String>,
    },

    /// Cast or change a vote. Overwrites any previous vote.
    #[serde(rename_all = "camelCase")]
    SelectCard { card_value: CardValue },

    /// Host only: expose everyone's votes.
    RevealCards,

    /// Host only: clear votes and start a new round.
    ResetVoting,
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// What the server sends back.
///
/// `room-created`, `room-joined`, and `error` go to the caller only;
/// the rest are room broadcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_code: RoomCode,
        room_info: RoomSnapshot,
        player_id: PlayerId,
    },

    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_info: RoomSnapshot,
        player_id: PlayerId,
    },

    #[serde(rename_all = "camelCase")]
    RoomUpdated { room_info: RoomSnapshot },

    #[serde(rename_all = "camelCase")]
    CardsRevealed { room_info: RoomSnapshot },

    #[serde(rename_all = "camelCase")]
    VotingReset { room_info: RoomSnapshot },

    Error { message: String },
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One player as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub is_host: bool,
}

/// The read-only projection of a room sent to clients after any change.
///
/// `cards` is `None` until the host reveals; once revealed it is a total
/// mapping over all players, with [`CardValue::Unknown`] filled in for
/// anyone who didn't vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub code: RoomCode,
    pub host_id: PlayerId,
    /// Players in join order.
    pub players: Vec<PlayerView>,
    pub total_players: usize,
    pub vote_count: usize,
    pub non_host_players_count: usize,
    pub non_host_voted_count: usize,
    pub all_non_hosts_voted: bool,
    pub can_reveal: bool,
    pub revealed: bool,
    pub cards: Option<BTreeMap<PlayerId, CardValue>>,
}

/// Answer to the read-only room-existence query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    pub exists: bool,
    pub player_count: usize,
}

// =========================================================================
// Tests
// =========================================================================
