//! The room aggregate: players, votes, and the reveal flag.
//!
//! `Room` enforces the local invariants — exactly one host while the
//! room is occupied, votes only from seated players — and leaves the
//! cross-room rules (unique codes, membership scans) to the registry.

use std::collections::HashMap;
use std::time::Instant;

use pokerplan_protocol::{CardValue, PlayerId, RoomCode};

/// A seated player.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub is_host: bool,
    /// Monotonic per-room join sequence. Host failover promotes the
    /// remaining player with the smallest value, independent of any
    /// container iteration order.
    pub(crate) joined_seq: u64,
}

/// One voting session.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    host_id: PlayerId,
    players: Vec<Player>,
    votes: HashMap<PlayerId, CardValue>,
    revealed: bool,
    created_at: Instant,
    /// Set when the last player leaves; cleared when someone joins.
    /// The reaper evicts once this exceeds the idle-empty grace.
    last_empty_at: Option<Instant>,
    next_seq: u64,
}

impl Room {
    /// Creates a room with its host already seated.
    pub fn new(
        code: RoomCode,
        host_id: PlayerId,
        host_name: String,
        host_avatar: String,
    ) -> Self {
        Self {
            code,
            host_id,
            players: vec![Player {
                id: host_id,
                name: host_name,
                avatar: host_avatar,
                is_host: true,
                joined_seq: 0,
            }],
            votes: HashMap::new(),
            revealed: false,
            created_at: Instant::now(),
            last_empty_at: None,
            next_seq: 1,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn host_id(&self) -> PlayerId {
        self.host_id
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn votes(&self) -> &HashMap<PlayerId, CardValue> {
        &self.votes
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_empty_at(&self) -> Option<Instant> {
        self.last_empty_at
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn name_taken(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    pub fn member_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Seats a player. If the room is currently empty the joiner claims
    /// the host seat and the idle timestamp is cleared. Returns whether
    /// they came in as host.
    pub fn seat(
        &mut self,
        id: PlayerId,
        name: String,
        avatar: String,
    ) -> bool {
        let as_host = self.players.is_empty();
        self.players.push(Player {
            id,
            name,
            avatar,
            is_host: as_host,
            joined_seq: self.next_seq,
        });
        self.next_seq += 1;
        if as_host {
            self.host_id = id;
            self.last_empty_at = None;
        }
        as_host
    }

    /// Upserts a vote. Re-voting overwrites.
    pub fn cast_vote(&mut self, id: PlayerId, value: CardValue) {
        self.votes.insert(id, value);
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Clears all votes and hides cards again.
    pub fn reset(&mut self) {
        self.votes.clear();
        self.revealed = false;
    }

    /// Removes a player and their vote. Stamps the idle timestamp if
    /// the room just emptied. Returns the removed player (with their
    /// `is_host` flag as it was) so the caller can decide on failover.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let pos = self.players.iter().position(|p| p.id == id)?;
        let removed = self.players.remove(pos);
        self.votes.remove(&id);
        if self.players.is_empty() {
            self.last_empty_at = Some(Instant::now());
        }
        Some(removed)
    }

    /// Promotes the most-senior remaining player (smallest join
    /// sequence) to host. No-op on an empty room.
    pub fn promote_successor(&mut self) -> Option<PlayerId> {
        let successor = self
            .players
            .iter_mut()
            .min_by_key(|p| p.joined_seq)?;
        successor.is_host = true;
        let id = successor.id;
        self.host_id = id;
        Some(id)
    }
}
