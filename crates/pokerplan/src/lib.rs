//! # Pokerplan
//!
//! Real-time planning poker server over WebSockets.
//!
//! Clients create or join six-character rooms, vote on story points,
//! and the host reveals or resets the round; every change is pushed to
//! the whole room as a fresh snapshot. Rooms live only in memory and a
//! background reaper evicts the stale ones.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pokerplan::PokerServer;
//!
//! # async fn run() -> Result<(), pokerplan::ServerError> {
//! let server = PokerServer::builder()
//!     .bind("0.0.0.0:3001")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use pokerplan_room::RoomsConfig;
pub use server::{PokerServer, PokerServerBuilder};
