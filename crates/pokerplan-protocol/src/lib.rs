//! Wire protocol for Pokerplan.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientIntent`], [`ServerEvent`], [`RoomSnapshot`],
//!   [`CardValue`], etc.) — the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (raw frames) and the room
//! layer (session state). It doesn't know about connections or rooms —
//! it only knows how to serialize and deserialize messages. Field names
//! and event tags are normative: they match what the browser client sends
//! (`create-room`, `playerName`, `roomInfo`, ...).

mod card;
mod codec;
mod error;
mod types;

pub use card::CardValue;
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientIntent, InvalidRoomCode, PlayerId, PlayerView, RoomCode,
    RoomSnapshot, RoomStatus, ServerEvent, ROOM_CODE_LEN,
};
