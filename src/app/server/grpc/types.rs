use rand::Rng;

use crate::app::{server::errors::ApiError, types::GameRequestType};

use super::{server::GameServiceRequest, storage::models};

/// Outbound event as the coordinator sees it, before wire encoding
#[derive(Clone, Debug)]
pub enum RoomEvent {
    RoomCreated { room: models::Room },
    RoomJoined { room: models::Room },
    UserJoined { name: String },
    GameStateUpdated { room: models::Room },
    GameWon { room: models::Room },
    GameDraw,
    RematchRequested,
    OpponentDisconnected { name: String },
    RoomExists { room_id: String },
    RoomFull { room_id: String },
    InvalidRoom { room_id: String },
    InvalidMove,
    Error { message: String },
}

/// Rejections travel back to the originating connection as events, not as
/// stream-level errors.
impl From<ApiError> for RoomEvent {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::RoomAlreadyExists { room_id } => RoomEvent::RoomExists { room_id },
            ApiError::RoomNotFound { room_id } => RoomEvent::InvalidRoom { room_id },
            ApiError::RoomFull { room_id } => RoomEvent::RoomFull { room_id },
            ApiError::InvalidMove => RoomEvent::InvalidMove,
            ApiError::BadRequest { message } => RoomEvent::Error { message },
            ApiError::Storage(_) => RoomEvent::Error {
                message: "Storage failure, retry the request".to_string(),
            },
        }
    }
}

/// One parsed inbound intent. Every variant carries the room id it targets,
/// so the router always has a key to serialize on.
#[derive(Clone, Debug)]
pub enum Intent {
    CreateRoom { room_id: String, name: String },
    JoinRoom { room_id: String, name: String },
    MakeMove { room_id: String, name: String, index: usize },
    RequestRematch { room_id: String },
    AcceptRematch { room_id: String, name: String },
    Leave { room_id: String, name: String },
}

impl Intent {
    pub fn room_id(&self) -> &str {
        match self {
            Intent::CreateRoom { room_id, .. }
            | Intent::JoinRoom { room_id, .. }
            | Intent::MakeMove { room_id, .. }
            | Intent::RequestRematch { room_id }
            | Intent::AcceptRematch { room_id, .. }
            | Intent::Leave { room_id, .. } => room_id,
        }
    }
}

fn missing_field(field: &str) -> ApiError {
    ApiError::BadRequest {
        message: format!("Missing field {field}"),
    }
}

impl TryFrom<GameServiceRequest> for Intent {
    type Error = ApiError;

    fn try_from(request: GameServiceRequest) -> Result<Self, Self::Error> {
        let request_type = u8::try_from(request.request_type)
            .ok()
            .and_then(GameRequestType::from_u8)
            .ok_or(ApiError::BadRequest {
                message: "Received invalid request type".to_string(),
            })?;

        let GameServiceRequest {
            room_id,
            player_name,
            cell_index,
            ..
        } = request;

        match request_type {
            GameRequestType::CreateRoom => Ok(Intent::CreateRoom {
                // a create without an id gets a generated one the client
                // learns from the roomCreated event
                room_id: room_id.unwrap_or_else(|| {
                    let mut rng = rand::thread_rng();
                    rng.gen_range(100000..1000000).to_string()
                }),
                name: player_name.ok_or_else(|| missing_field("player_name"))?,
            }),
            GameRequestType::JoinRoom => Ok(Intent::JoinRoom {
                room_id: room_id.ok_or_else(|| missing_field("room_id"))?,
                name: player_name.ok_or_else(|| missing_field("player_name"))?,
            }),
            GameRequestType::MakeMove => Ok(Intent::MakeMove {
                room_id: room_id.ok_or_else(|| missing_field("room_id"))?,
                name: player_name.ok_or_else(|| missing_field("player_name"))?,
                index: cell_index.ok_or_else(|| missing_field("cell_index"))? as usize,
            }),
            GameRequestType::RequestRematch => Ok(Intent::RequestRematch {
                room_id: room_id.ok_or_else(|| missing_field("room_id"))?,
            }),
            GameRequestType::AcceptRematch => Ok(Intent::AcceptRematch {
                room_id: room_id.ok_or_else(|| missing_field("room_id"))?,
                name: player_name.ok_or_else(|| missing_field("player_name"))?,
            }),
            GameRequestType::LeaveRoom => Ok(Intent::Leave {
                room_id: room_id.ok_or_else(|| missing_field("room_id"))?,
                name: player_name.ok_or_else(|| missing_field("player_name"))?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_request_type_is_rejected() {
        let request = GameServiceRequest {
            request_type: 99,
            room_id: Some("535101".to_string()),
            player_name: Some("alice".to_string()),
            cell_index: None,
        };
        assert!(matches!(
            Intent::try_from(request),
            Err(ApiError::BadRequest { .. })
        ));
    }

    #[test]
    fn create_without_a_room_id_generates_one() {
        let request = GameServiceRequest {
            request_type: GameRequestType::CreateRoom.to_u8().into(),
            room_id: None,
            player_name: Some("alice".to_string()),
            cell_index: None,
        };
        match Intent::try_from(request).unwrap() {
            Intent::CreateRoom { room_id, name } => {
                assert_eq!(room_id.len(), 6);
                assert_eq!(name, "alice");
            }
            other => panic!("unexpected intent {other:?}"),
        }
    }

    #[test]
    fn a_move_needs_room_name_and_cell() {
        let request = GameServiceRequest {
            request_type: GameRequestType::MakeMove.to_u8().into(),
            room_id: Some("535101".to_string()),
            player_name: Some("alice".to_string()),
            cell_index: None,
        };
        assert!(matches!(
            Intent::try_from(request),
            Err(ApiError::BadRequest { .. })
        ));
    }
}
