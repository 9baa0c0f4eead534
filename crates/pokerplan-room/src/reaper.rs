//! Expiry reaper: the background sweep that evicts stale rooms.
//!
//! Runs on a fixed interval. The actual eviction logic lives in
//! [`SessionCoordinator::sweep_expired`] so it shares the registry lock
//! with every other operation; this task only drives the schedule and
//! hands evictions to the caller's notifier.

use std::sync::Arc;

use pokerplan_protocol::{PlayerId, RoomCode};
use tokio::time::{self, MissedTickBehavior};

use crate::{RoomsConfig, SessionCoordinator};

/// Why a room was evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictReason {
    /// Empty past the idle grace period.
    IdleEmpty,
    /// Older than the absolute lifetime cap, occupied or not.
    MaxAge,
}

/// A room the reaper removed, with whoever was still seated in it.
///
/// `members` is empty for [`EvictReason::IdleEmpty`]; for max-age
/// evictions the server notifies these players before they are dropped.
#[derive(Debug, Clone)]
pub struct EvictedRoom {
    pub code: RoomCode,
    pub members: Vec<PlayerId>,
    pub reason: EvictReason,
}

/// Periodic sweep task over the registry.
pub struct ExpiryReaper {
    coordinator: Arc<SessionCoordinator>,
    config: RoomsConfig,
}

impl ExpiryReaper {
    pub fn new(
        coordinator: Arc<SessionCoordinator>,
        config: RoomsConfig,
    ) -> Self {
        Self {
            coordinator,
            config,
        }
    }

    /// Runs forever, sweeping once per interval. Evicted rooms are
    /// passed to `on_evict` after the registry lock is released.
    pub async fn run<F>(self, mut on_evict: F)
    where
        F: FnMut(EvictedRoom) + Send,
    {
        let mut interval = time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so a fresh
        // server doesn't sweep before anything can have expired.
        interval.tick().await;

        tracing::info!(
            interval = ?self.config.sweep_interval,
            "expiry reaper running"
        );
        loop {
            interval.tick().await;
            let evicted =
                self.coordinator.sweep_expired(&self.config).await;
            for room in evicted {
                on_evict(room);
            }
        }
    }
}
