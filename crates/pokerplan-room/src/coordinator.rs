//! The session coordinator: every client intent goes through here.
//!
//! Each operation takes the registry lock, mutates exactly one room (or
//! scans, for `leave`), projects a snapshot, and releases. Nothing in
//! here performs I/O — outcome values tell the transport adapter what
//! to deliver and to whom, after the lock is gone. The reaper shares
//! the same lock, so a sweep can never race a join that is clearing a
//! room's idle timestamp.

use pokerplan_protocol::{
    CardValue, PlayerId, RoomCode, RoomSnapshot, RoomStatus,
};
use tokio::sync::Mutex;

use crate::reaper::{EvictReason, EvictedRoom};
use crate::{Room, RoomError, RoomRegistry, RoomsConfig, snapshot};

/// Avatar used when a client doesn't pick one.
const DEFAULT_AVATAR: &str = "😄";

/// Outcome of a successful `create_room`.
#[derive(Debug, Clone)]
pub struct Created {
    pub code: RoomCode,
    pub snapshot: RoomSnapshot,
}

/// Outcome of a successful `join_room`.
#[derive(Debug, Clone)]
pub struct Joined {
    pub code: RoomCode,
    pub snapshot: RoomSnapshot,
}

/// Outcome of a successful vote, reveal, or reset.
#[derive(Debug, Clone)]
pub struct Updated {
    pub code: RoomCode,
    pub snapshot: RoomSnapshot,
}

/// What happened to one room when a player left it.
#[derive(Debug, Clone)]
pub enum Departure {
    /// The room emptied out. No broadcast — nobody is left to hear it.
    Emptied { code: RoomCode },

    /// Players remain; the snapshot (with any host failover applied)
    /// should be broadcast to them.
    Updated {
        code: RoomCode,
        snapshot: RoomSnapshot,
    },
}

/// Applies client intents to rooms under a single registry lock.
///
/// One lock for the whole registry keeps the invariants trivially safe
/// and is plenty at the contention this server sees; critical sections
/// are short and never block on anything.
pub struct SessionCoordinator {
    registry: Mutex<RoomRegistry>,
}

impl SessionCoordinator {
    /// Wraps a registry. Tests hand in a fresh one to stay isolated.
    pub fn new(registry: RoomRegistry) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }

    /// Creates a room with the caller seated as host.
    pub async fn create_room(
        &self,
        player_id: PlayerId,
        name: &str,
        avatar: Option<String>,
    ) -> Result<Created, RoomError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoomError::Validation(
                "Player name is required".into(),
            ));
        }

        let mut registry = self.registry.lock().await;
        let code = registry.generate_code();
        let room = Room::new(
            code.clone(),
            player_id,
            name.to_owned(),
            normalize_avatar(avatar),
        );
        let snapshot = snapshot::project(&room);
        registry.insert(room);

        tracing::info!(%code, %player_id, "room created");
        Ok(Created { code, snapshot })
    }

    /// Seats the caller in an existing room.
    ///
    /// Joining an empty (but not yet reaped) room claims the host seat.
    /// The reveal state is left alone: a round in progress stays in
    /// progress.
    pub async fn join_room(
        &self,
        player_id: PlayerId,
        raw_code: &str,
        name: &str,
        avatar: Option<String>,
    ) -> Result<Joined, RoomError> {
        let name = name.trim();
        if raw_code.trim().is_empty() || name.is_empty() {
            return Err(RoomError::Validation(
                "Room code and player name are required".into(),
            ));
        }
        let code = RoomCode::parse(raw_code)
            .map_err(|e| RoomError::Validation(e.to_string()))?;

        let mut registry = self.registry.lock().await;
        let room = registry
            .get_mut(&code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if room.name_taken(name) {
            return Err(RoomError::Validation(
                "This name is already taken in the room".into(),
            ));
        }

        let as_host = room.seat(
            player_id,
            name.to_owned(),
            normalize_avatar(avatar),
        );
        let snapshot = snapshot::project(room);

        tracing::info!(
            %code,
            %player_id,
            as_host,
            players = snapshot.total_players,
            "player joined"
        );
        Ok(Joined { code, snapshot })
    }

    /// Casts or changes the caller's vote.
    pub async fn select_card(
        &self,
        player_id: PlayerId,
        value: CardValue,
    ) -> Result<Updated, RoomError> {
        let mut registry = self.registry.lock().await;
        let code = registry
            .find_by_member(player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;
        let room = registry
            .get_mut(&code)
            .ok_or(RoomError::NotInRoom(player_id))?;

        if room.revealed() {
            return Err(RoomError::AlreadyRevealed);
        }
        room.cast_vote(player_id, value);
        let snapshot = snapshot::project(room);

        tracing::debug!(%code, %player_id, %value, "card selected");
        Ok(Updated { code, snapshot })
    }

    /// Host only: exposes all votes.
    pub async fn reveal_cards(
        &self,
        player_id: PlayerId,
    ) -> Result<Updated, RoomError> {
        let mut registry = self.registry.lock().await;
        let code = registry
            .find_by_member(player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;
        let room = registry
            .get_mut(&code)
            .ok_or(RoomError::NotInRoom(player_id))?;

        if room.host_id() != player_id {
            return Err(RoomError::NotHost {
                player: player_id,
                action: "reveal cards",
            });
        }
        if room.vote_count() == 0 {
            return Err(RoomError::NoVotes);
        }
        room.reveal();
        let snapshot = snapshot::project(room);

        tracing::info!(
            %code,
            votes = snapshot.vote_count,
            "cards revealed"
        );
        Ok(Updated { code, snapshot })
    }

    /// Host only: clears votes and starts a fresh round.
    pub async fn reset_voting(
        &self,
        player_id: PlayerId,
    ) -> Result<Updated, RoomError> {
        let mut registry = self.registry.lock().await;
        let code = registry
            .find_by_member(player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;
        let room = registry
            .get_mut(&code)
            .ok_or(RoomError::NotInRoom(player_id))?;

        if room.host_id() != player_id {
            return Err(RoomError::NotHost {
                player: player_id,
                action: "reset voting",
            });
        }
        room.reset();
        let snapshot = snapshot::project(room);

        tracing::info!(%code, "voting reset");
        Ok(Updated { code, snapshot })
    }

    /// Removes a departing connection from every room it is seated in
    /// (at most one in practice — the sweep is defensive).
    ///
    /// Never fails: an untracked connection just yields no departures.
    pub async fn leave(&self, player_id: PlayerId) -> Vec<Departure> {
        let mut registry = self.registry.lock().await;
        let codes = registry.find_all_by_member(player_id);

        let mut departures = Vec::with_capacity(codes.len());
        for code in codes {
            let Some(room) = registry.get_mut(&code) else {
                continue;
            };
            let Some(removed) = room.remove_player(player_id) else {
                continue;
            };

            if room.is_empty() {
                tracing::info!(%code, %player_id, "room emptied");
                departures.push(Departure::Emptied { code });
                continue;
            }

            if removed.is_host {
                if let Some(new_host) = room.promote_successor() {
                    tracing::info!(
                        %code,
                        old_host = %player_id,
                        %new_host,
                        "host reassigned"
                    );
                }
            } else {
                tracing::info!(%code, %player_id, "player left");
            }
            departures.push(Departure::Updated {
                snapshot: snapshot::project(room),
                code,
            });
        }
        departures
    }

    /// Read-only existence check, outside the intent state machine.
    /// Malformed codes simply don't exist.
    pub async fn room_status(&self, raw_code: &str) -> RoomStatus {
        let Ok(code) = RoomCode::parse(raw_code) else {
            return RoomStatus {
                exists: false,
                player_count: 0,
            };
        };
        let registry = self.registry.lock().await;
        match registry.get(&code) {
            Some(room) => RoomStatus {
                exists: true,
                player_count: room.player_count(),
            },
            None => RoomStatus {
                exists: false,
                player_count: 0,
            },
        }
    }

    /// One reaper pass: removes idle-empty and over-age rooms.
    ///
    /// Runs under the registry lock so it cannot observe a half-applied
    /// join or race one that is clearing `last_empty_at`.
    pub async fn sweep_expired(
        &self,
        config: &RoomsConfig,
    ) -> Vec<EvictedRoom> {
        let now = std::time::Instant::now();
        let mut registry = self.registry.lock().await;

        let mut evicted = Vec::new();
        for code in registry.codes() {
            let Some(room) = registry.get(&code) else {
                continue;
            };

            let reason = if room.last_empty_at().is_some_and(|at| {
                now.duration_since(at) > config.idle_empty_grace
            }) {
                EvictReason::IdleEmpty
            } else if now.duration_since(room.created_at())
                > config.max_age
            {
                EvictReason::MaxAge
            } else {
                continue;
            };

            let members = room.member_ids();
            registry.remove(&code);
            tracing::info!(
                %code,
                ?reason,
                dropped_members = members.len(),
                "room evicted"
            );
            evicted.push(EvictedRoom {
                code,
                members,
                reason,
            });
        }
        evicted
    }
}

/// Trims the chosen avatar, falling back to the default when the client
/// sent none (or only whitespace).
fn normalize_avatar(avatar: Option<String>) -> String {
    match avatar {
        Some(a) if !a.trim().is_empty() => a.trim().to_owned(),
        _ => DEFAULT_AVATAR.to_owned(),
    }
}
