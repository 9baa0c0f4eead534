//! Per-connection handler: intent routing and disconnect cleanup.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound queue with the hub and spawn a writer pump
//!   2. Loop: receive frames → decode intents → apply via the coordinator
//!   3. On disconnect: leave rooms, broadcast the fallout, unregister
//!
//! All outbound frames for a connection go through its hub queue, so a
//! direct reply and a broadcast triggered by the same intent arrive in
//! the order they were produced.

use std::sync::Arc;

use pokerplan_protocol::{
    ClientIntent, Codec, PlayerId, RoomCode, ServerEvent,
};
use pokerplan_room::Departure;
use pokerplan_transport::{
    Connection, ConnectionId, WebSocketConnection,
};
use tokio::sync::mpsc;

use crate::ServerError;
use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let conn_id = conn.id();
    // A player is their connection: same number, no handshake.
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, "handling new connection");

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    state.hub.register(conn_id, tx);

    // Writer pump: drains the hub queue onto the socket so broadcasts
    // can reach this connection while we block on recv below.
    let writer = conn.clone();
    let pump = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if writer.send(&frame).await.is_err() {
                break;
            }
        }
    });

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let intent: ClientIntent = match state.codec.decode(&data) {
            Ok(intent) => intent,
            Err(e) => {
                tracing::debug!(
                    %player_id, error = %e, "undecodable frame skipped"
                );
                continue;
            }
        };

        if let Err(e) =
            dispatch_intent(&state, conn_id, player_id, intent).await
        {
            // Intent-level failures were already reported to the client;
            // anything surfacing here is an encode bug worth logging.
            tracing::error!(%player_id, error = %e, "dispatch failed");
        }
    }

    // Disconnect cleanup: seats are released and whoever remains hears
    // about it (including any host failover).
    for departure in state.coordinator.leave(player_id).await {
        if let Departure::Updated { code, snapshot } = departure {
            let event = ServerEvent::RoomUpdated {
                room_info: snapshot,
            };
            broadcast(&state, &code, &event)?;
        }
    }
    state.hub.unregister(conn_id);
    pump.abort();

    Ok(())
}

/// Applies one intent and delivers its replies.
///
/// Room errors are turned into `error` frames for the caller; only
/// encode failures propagate.
async fn dispatch_intent(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    player_id: PlayerId,
    intent: ClientIntent,
) -> Result<(), ServerError> {
    match intent {
        ClientIntent::CreateRoom {
            player_name,
            avatar,
        } => {
            match state
                .coordinator
                .create_room(player_id, &player_name, avatar)
                .await
            {
                Ok(created) => {
                    state.hub.subscribe(created.code.as_str(), conn_id);
                    let event = ServerEvent::RoomCreated {
                        room_code: created.code,
                        room_info: created.snapshot,
                        player_id,
                    };
                    send_to_caller(state, conn_id, &event)?;
                }
                Err(e) => send_room_error(state, conn_id, &e)?,
            }
        }

        ClientIntent::JoinRoom {
            room_code,
            player_name,
            avatar,
        } => {
            match state
                .coordinator
                .join_room(player_id, &room_code, &player_name, avatar)
                .await
            {
                Ok(joined) => {
                    state.hub.subscribe(joined.code.as_str(), conn_id);
                    let reply = ServerEvent::RoomJoined {
                        room_info: joined.snapshot.clone(),
                        player_id,
                    };
                    send_to_caller(state, conn_id, &reply)?;

                    let update = ServerEvent::RoomUpdated {
                        room_info: joined.snapshot,
                    };
                    broadcast(state, &joined.code, &update)?;
                }
                Err(e) => send_room_error(state, conn_id, &e)?,
            }
        }

        ClientIntent::SelectCard { card_value } => {
            match state
                .coordinator
                .select_card(player_id, card_value)
                .await
            {
                Ok(updated) => {
                    let event = ServerEvent::RoomUpdated {
                        room_info: updated.snapshot,
                    };
                    broadcast(state, &updated.code, &event)?;
                }
                Err(e) => send_room_error(state, conn_id, &e)?,
            }
        }

        ClientIntent::RevealCards => {
            match state.coordinator.reveal_cards(player_id).await {
                Ok(updated) => {
                    let event = ServerEvent::CardsRevealed {
                        room_info: updated.snapshot,
                    };
                    broadcast(state, &updated.code, &event)?;
                }
                Err(e) => send_room_error(state, conn_id, &e)?,
            }
        }

        ClientIntent::ResetVoting => {
            match state.coordinator.reset_voting(player_id).await {
                Ok(updated) => {
                    let event = ServerEvent::VotingReset {
                        room_info: updated.snapshot,
                    };
                    broadcast(state, &updated.code, &event)?;
                }
                Err(e) => send_room_error(state, conn_id, &e)?,
            }
        }
    }

    Ok(())
}

/// Queues an event for the calling connection only.
fn send_to_caller(
    state: &ServerState,
    conn_id: ConnectionId,
    event: &ServerEvent,
) -> Result<(), ServerError> {
    let frame = state.codec.encode(event)?;
    state.hub.send_to(conn_id, &frame);
    Ok(())
}

/// Queues an event for every member of a room.
fn broadcast(
    state: &ServerState,
    code: &RoomCode,
    event: &ServerEvent,
) -> Result<(), ServerError> {
    let frame = state.codec.encode(event)?;
    state.hub.broadcast(code.as_str(), &frame);
    Ok(())
}

/// Reports an intent failure back to the caller as an `error` frame.
/// The message strings are what the client displays verbatim.
fn send_room_error(
    state: &ServerState,
    conn_id: ConnectionId,
    error: &pokerplan_room::RoomError,
) -> Result<(), ServerError> {
    tracing::debug!(%conn_id, error = %error, "intent rejected");
    send_to_caller(
        state,
        conn_id,
        &ServerEvent::Error {
            message: error.to_string(),
        },
    )
}
