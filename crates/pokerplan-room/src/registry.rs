//! Room registry: the process-wide map of room codes to live rooms.
//!
//! An explicit instance with a controlled lifetime — owned by the
//! coordinator, handed in at construction — so tests can run isolated
//! registries side by side.

use std::collections::HashMap;

use pokerplan_protocol::{PlayerId, ROOM_CODE_LEN, RoomCode};
use rand::Rng;

use crate::Room;

/// Characters a generated room code draws from (base36, upper-cased).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Owns creation, lookup, and removal of rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a code no live room is using. Retries on collision;
    /// with 36^6 combinations the loop terminates almost immediately at
    /// any realistic room count.
    pub fn generate_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let candidate: String = (0..ROOM_CODE_LEN)
                .map(|_| {
                    let i = rng.random_range(0..CODE_ALPHABET.len());
                    CODE_ALPHABET[i] as char
                })
                .collect();
            // The alphabet only produces valid codes.
            let Ok(code) = RoomCode::parse(&candidate) else {
                continue;
            };
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Stores a room under its code.
    pub fn insert(&mut self, room: Room) {
        self.rooms.insert(room.code().clone(), room);
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Deletes a room, freeing its code.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        self.rooms.remove(code)
    }

    /// Finds the room a player is seated in. A linear scan — fine at
    /// the room counts this server targets.
    pub fn find_by_member(&self, id: PlayerId) -> Option<RoomCode> {
        self.rooms
            .values()
            .find(|room| room.contains(id))
            .map(|room| room.code().clone())
    }

    /// Every room a player is seated in. Membership is at most one room
    /// in practice; disconnect handling sweeps all of them anyway.
    pub fn find_all_by_member(&self, id: PlayerId) -> Vec<RoomCode> {
        self.rooms
            .values()
            .filter(|room| room.contains(id))
            .map(|room| room.code().clone())
            .collect()
    }

    /// Codes of every live room.
    pub fn codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_room(code: &str, host: u64) -> Room {
        Room::new(
            RoomCode::parse(code).unwrap(),
            PlayerId(host),
            format!("player-{host}"),
            "😄".into(),
        )
    }

    #[test]
    fn test_generated_code_is_well_formed() {
        let registry = RoomRegistry::new();
        let code = registry.generate_code();
        assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
        assert!(
            code.as_str()
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_generated_codes_avoid_live_rooms() {
        let mut registry = RoomRegistry::new();
        for _ in 0..100 {
            let code = registry.generate_code();
            let room = Room::new(
                code.clone(),
                PlayerId(1),
                "Alice".into(),
                "😄".into(),
            );
            registry.insert(room);
            assert!(registry.get(&code).is_some());
        }
        assert_eq!(registry.room_count(), 100);
    }

    #[test]
    fn test_lookup_is_by_normalized_code() {
        let mut registry = RoomRegistry::new();
        registry.insert(sample_room("AB12CD", 1));

        let lower = RoomCode::parse("ab12cd").unwrap();
        assert!(registry.get(&lower).is_some());
    }

    #[test]
    fn test_remove_frees_the_code() {
        let mut registry = RoomRegistry::new();
        registry.insert(sample_room("AB12CD", 1));

        let code = RoomCode::parse("AB12CD").unwrap();
        assert!(registry.remove(&code).is_some());
        assert!(registry.get(&code).is_none());
        assert!(registry.remove(&code).is_none());
    }

    #[test]
    fn test_find_by_member() {
        let mut registry = RoomRegistry::new();
        registry.insert(sample_room("AB12CD", 1));
        registry.insert(sample_room("EF34GH", 2));

        assert_eq!(
            registry.find_by_member(PlayerId(2)),
            Some(RoomCode::parse("EF34GH").unwrap())
        );
        assert_eq!(registry.find_by_member(PlayerId(9)), None);
    }
}
