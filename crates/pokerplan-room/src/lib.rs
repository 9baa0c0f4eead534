//! Room and session management for Pokerplan.
//!
//! This is the core of the server: a registry of live rooms, the
//! coordinator that applies client intents to them, and the reaper that
//! evicts stale rooms. Everything here is I/O-free — operations mutate
//! state under a lock and hand back snapshot values; delivering those
//! snapshots is the transport adapter's job.
//!
//! # Key types
//!
//! - [`SessionCoordinator`] — applies create/join/vote/reveal/reset/leave
//! - [`RoomRegistry`] — owns the room-code → [`Room`] map
//! - [`ExpiryReaper`] — background sweep for idle and over-age rooms
//! - [`RoomsConfig`] — lifetime thresholds
//! - [`RoomError`] — everything an intent can fail with

mod config;
mod coordinator;
mod error;
mod reaper;
mod registry;
mod room;
mod snapshot;

pub use config::RoomsConfig;
pub use coordinator::{
    Created, Departure, Joined, SessionCoordinator, Updated,
};
pub use error::RoomError;
pub use reaper::{EvictReason, EvictedRoom, ExpiryReaper};
pub use registry::RoomRegistry;
pub use room::{Player, Room};
pub use snapshot::project;
