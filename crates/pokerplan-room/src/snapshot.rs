//! Snapshot projection: the pure read-only view of a room.

use std::collections::BTreeMap;

use pokerplan_protocol::{CardValue, PlayerView, RoomSnapshot};

use crate::Room;

/// Projects a room into the snapshot clients see.
///
/// Vote visibility is gated here: until the room is revealed, `cards`
/// is `None` and only the counts leak. Once revealed, the mapping is
/// total over all players, with [`CardValue::Unknown`] standing in for
/// anyone who didn't vote.
pub fn project(room: &Room) -> RoomSnapshot {
    let players: Vec<PlayerView> = room
        .players()
        .iter()
        .map(|p| PlayerView {
            id: p.id,
            name: p.name.clone(),
            avatar: p.avatar.clone(),
            is_host: p.is_host,
        })
        .collect();

    let vote_count = room.vote_count();
    let non_host_players_count =
        players.iter().filter(|p| !p.is_host).count();
    let non_host_voted_count = room
        .votes()
        .keys()
        .filter(|id| {
            players.iter().any(|p| p.id == **id && !p.is_host)
        })
        .count();
    let all_non_hosts_voted = non_host_players_count > 0
        && non_host_voted_count == non_host_players_count;

    let cards = room.revealed().then(|| {
        let mut cards: BTreeMap<_, _> = room
            .votes()
            .iter()
            .map(|(id, value)| (*id, *value))
            .collect();
        for player in &players {
            cards.entry(player.id).or_insert(CardValue::Unknown);
        }
        cards
    });

    RoomSnapshot {
        code: room.code().clone(),
        host_id: room.host_id(),
        total_players: players.len(),
        players,
        vote_count,
        non_host_players_count,
        non_host_voted_count,
        all_non_hosts_voted,
        can_reveal: vote_count > 0,
        revealed: room.revealed(),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerplan_protocol::{PlayerId, RoomCode};

    fn two_player_room() -> Room {
        let mut room = Room::new(
            RoomCode::parse("AB12CD").unwrap(),
            PlayerId(1),
            "Alice".into(),
            "😄".into(),
        );
        room.seat(PlayerId(2), "Bob".into(), "🤖".into());
        room
    }

    #[test]
    fn test_unrevealed_snapshot_hides_cards() {
        let mut room = two_player_room();
        room.cast_vote(PlayerId(2), CardValue::Five);

        let snapshot = project(&room);
        assert!(snapshot.cards.is_none());
        assert_eq!(snapshot.vote_count, 1);
        assert!(!snapshot.revealed);
    }

    #[test]
    fn test_revealed_snapshot_fills_in_unknown_for_non_voters() {
        let mut room = two_player_room();
        room.cast_vote(PlayerId(2), CardValue::Five);
        room.reveal();

        let snapshot = project(&room);
        let cards = snapshot.cards.expect("revealed");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[&PlayerId(1)], CardValue::Unknown);
        assert_eq!(cards[&PlayerId(2)], CardValue::Five);
    }

    #[test]
    fn test_can_reveal_iff_any_vote_exists() {
        let mut room = two_player_room();
        assert!(!project(&room).can_reveal);

        room.cast_vote(PlayerId(1), CardValue::One);
        assert!(project(&room).can_reveal);
    }

    #[test]
    fn test_all_non_hosts_voted_requires_every_non_host() {
        let mut room = two_player_room();
        room.seat(PlayerId(3), "Carol".into(), "🦊".into());

        room.cast_vote(PlayerId(2), CardValue::Three);
        let snapshot = project(&room);
        assert_eq!(snapshot.non_host_players_count, 2);
        assert_eq!(snapshot.non_host_voted_count, 1);
        assert!(!snapshot.all_non_hosts_voted);

        room.cast_vote(PlayerId(3), CardValue::Eight);
        assert!(project(&room).all_non_hosts_voted);
    }

    #[test]
    fn test_all_non_hosts_voted_is_false_with_no_non_hosts() {
        let mut room = Room::new(
            RoomCode::parse("AB12CD").unwrap(),
            PlayerId(1),
            "Alice".into(),
            "😄".into(),
        );
        room.cast_vote(PlayerId(1), CardValue::Five);

        let snapshot = project(&room);
        assert_eq!(snapshot.non_host_players_count, 0);
        assert!(!snapshot.all_non_hosts_voted);
    }

    #[test]
    fn test_host_votes_count_toward_vote_count_only() {
        let mut room = two_player_room();
        room.cast_vote(PlayerId(1), CardValue::Eight);

        let snapshot = project(&room);
        assert_eq!(snapshot.vote_count, 1);
        assert_eq!(snapshot.non_host_voted_count, 0);
        assert!(snapshot.can_reveal);
    }

    #[test]
    fn test_players_appear_in_join_order() {
        let mut room = two_player_room();
        room.seat(PlayerId(3), "Carol".into(), "🦊".into());

        let snapshot = project(&room);
        let ids: Vec<_> =
            snapshot.players.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
        assert_eq!(snapshot.total_players, 3);
    }
}
