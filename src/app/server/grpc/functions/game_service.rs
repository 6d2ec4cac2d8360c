use crate::app::server::{
    errors::{ApiError, ResultExtApp},
    game,
    grpc::{
        rooms::RoomCommand,
        storage::{
            interface::{room::RoomInterface, session::SessionInterface},
            models, Store,
        },
        types::{Intent, RoomEvent},
    },
};

/// Entry point of a room worker for one queued intent. Rejections and
/// failures never escape: they are turned into events for the originating
/// connection.
pub async fn handle(store: &Store, command: RoomCommand) {
    let RoomCommand { conn_id, intent } = command;

    let result = match intent {
        Intent::CreateRoom { room_id, name } => create_room(store, &conn_id, room_id, name).await,
        Intent::JoinRoom { room_id, name } => join_room(store, &conn_id, room_id, name).await,
        Intent::MakeMove {
            room_id,
            name,
            index,
        } => make_move(store, &conn_id, room_id, name, index).await,
        Intent::RequestRematch { room_id } => request_rematch(store, &conn_id, room_id).await,
        Intent::AcceptRematch { room_id, name } => {
            accept_rematch(store, &conn_id, room_id, name).await
        }
        Intent::Leave { room_id, name } => leave(store, &conn_id, room_id, name).await,
    };

    if let Err(error) = result {
        tracing::error!(?error, %conn_id);
        store.emit_to(&conn_id, RoomEvent::from(error)).await;
    }
}

async fn create_room(
    store: &Store,
    conn_id: &str,
    room_id: String,
    name: String,
) -> Result<(), ApiError> {
    if store
        .find_room(&room_id)
        .await
        .to_internal_api_error()?
        .is_some()
    {
        // The client must retry with a different room_id
        return Err(ApiError::RoomAlreadyExists { room_id });
    }

    let room = models::Room::new(room_id, name.clone());
    let room = store.insert_room(room).await.to_internal_api_error()?;

    store.set_player_name(conn_id, &name);
    store.subscribe(conn_id, &room.room_id);
    store.emit_to(conn_id, RoomEvent::RoomCreated { room }).await;
    Ok(())
}

async fn join_room(
    store: &Store,
    conn_id: &str,
    room_id: String,
    name: String,
) -> Result<(), ApiError> {
    let mut room = store
        .find_room(&room_id)
        .await
        .to_internal_api_error()?
        .ok_or(ApiError::RoomNotFound {
            room_id: room_id.clone(),
        })?;

    if room.contains_user(&name) {
        // Reconnect: no state change, re-subscribe and replay the current
        // state to the whole room
        store.set_player_name(conn_id, &name);
        store.subscribe(conn_id, &room_id);
        store
            .emit_to_room(&room_id, RoomEvent::GameStateUpdated { room })
            .await;
        return Ok(());
    }

    if room.is_full() {
        return Err(ApiError::RoomFull { room_id });
    }

    room.add_user(name.clone());
    let room = store.insert_room(room).await.to_internal_api_error()?;

    store.set_player_name(conn_id, &name);
    store.subscribe(conn_id, &room_id);
    store
        .emit_to(conn_id, RoomEvent::RoomJoined { room })
        .await;
    store
        .emit_to_room_except(&room_id, conn_id, RoomEvent::UserJoined { name })
        .await;
    Ok(())
}

async fn make_move(
    store: &Store,
    conn_id: &str,
    room_id: String,
    name: String,
    index: usize,
) -> Result<(), ApiError> {
    let mut room = store
        .find_room(&room_id)
        .await
        .to_internal_api_error()?
        .ok_or(ApiError::RoomNotFound {
            room_id: room_id.clone(),
        })?;

    // Moves after the game ended are silently ignored
    if room.game_over {
        return Ok(());
    }

    // The mover must be a member, it must be their turn, and the game
    // needs both players before anyone moves
    if !room.is_full() || room.current_player != name {
        return Err(ApiError::InvalidMove);
    }
    let mark = room.mark_of(&name).ok_or(ApiError::InvalidMove)?;

    if !game::is_valid_move(index, &room.board) {
        return Err(ApiError::InvalidMove);
    }

    room.record_move(mark, index);
    let mut room = store.insert_room(room).await.to_internal_api_error()?;
    store
        .emit_to_room(
            &room_id,
            RoomEvent::GameStateUpdated { room: room.clone() },
        )
        .await;

    if let Some(winning_mark) = game::check_win(&room.board) {
        room.record_win(winning_mark);
        let room = store.insert_room(room).await.to_internal_api_error()?;
        store
            .emit_to_room(&room_id, RoomEvent::GameWon { room })
            .await;
    } else if game::check_draw(&room.board) {
        room.record_draw();
        store.insert_room(room).await.to_internal_api_error()?;
        store.emit_to_room(&room_id, RoomEvent::GameDraw).await;
    }

    Ok(())
}

/// Stateless relay: asks the other party whether they want another game
async fn request_rematch(store: &Store, conn_id: &str, room_id: String) -> Result<(), ApiError> {
    store
        .emit_to_room_except(&room_id, conn_id, RoomEvent::RematchRequested)
        .await;
    Ok(())
}

async fn accept_rematch(
    store: &Store,
    _conn_id: &str,
    room_id: String,
    name: String,
) -> Result<(), ApiError> {
    let mut room = store
        .find_room(&room_id)
        .await
        .to_internal_api_error()?
        .ok_or(ApiError::RoomNotFound {
            room_id: room_id.clone(),
        })?;

    room.reset_for_rematch(&name);
    let room = store.insert_room(room).await.to_internal_api_error()?;

    store
        .emit_to_room(&room_id, RoomEvent::GameStateUpdated { room })
        .await;
    Ok(())
}

/// Transport-level departure: the room record and score are untouched
async fn leave(store: &Store, conn_id: &str, room_id: String, name: String) -> Result<(), ApiError> {
    store.unsubscribe(conn_id, &room_id);
    store
        .emit_to_room_except(&room_id, conn_id, RoomEvent::OpponentDisconnected { name })
        .await;
    Ok(())
}
