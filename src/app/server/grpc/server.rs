pub use tactix_grpc::{
    grpc_client, grpc_server, GameServiceRequest, GameServiceResponse, PingRequest, PingResponse,
    RoomState, FILE_DESCRIPTOR_SET,
};

use crate::app::{server::game::Mark, types::GameEventType, utils};

use super::{
    functions,
    rooms::RoomRouter,
    storage::{interface::session::SessionInterface, models, Store},
    types::{Intent, RoomEvent},
};

mod tactix_grpc {
    // The string specified here must match the proto package name
    tonic::include_proto!("server");

    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("grpc");
}

impl From<models::Room> for RoomState {
    fn from(db_model: models::Room) -> Self {
        Self {
            room_id: db_model.room_id,
            users: db_model.users,
            board: db_model
                .board
                .iter()
                .map(|cell| cell.map(Mark::as_str).unwrap_or("").to_string())
                .collect(),
            current_player: db_model.current_player,
            game_over: db_model.game_over,
            winner: db_model.winner,
            score: db_model.score.to_vec(),
        }
    }
}

impl From<RoomEvent> for GameServiceResponse {
    fn from(event: RoomEvent) -> Self {
        let tag = |event_type: GameEventType| u32::from(event_type.to_u8());

        match event {
            RoomEvent::RoomCreated { room } => Self {
                event_type: tag(GameEventType::RoomCreated),
                room_id: Some(room.room_id.clone()),
                room: Some(room.into()),
                ..Default::default()
            },
            RoomEvent::RoomJoined { room } => Self {
                event_type: tag(GameEventType::RoomJoined),
                room_id: Some(room.room_id.clone()),
                room: Some(room.into()),
                ..Default::default()
            },
            RoomEvent::UserJoined { name } => Self {
                event_type: tag(GameEventType::UserJoined),
                player_name: Some(name),
                ..Default::default()
            },
            RoomEvent::GameStateUpdated { room } => Self {
                event_type: tag(GameEventType::GameStateUpdated),
                room_id: Some(room.room_id.clone()),
                room: Some(room.into()),
                ..Default::default()
            },
            RoomEvent::GameWon { room } => Self {
                event_type: tag(GameEventType::GameWon),
                room_id: Some(room.room_id.clone()),
                room: Some(room.into()),
                ..Default::default()
            },
            RoomEvent::GameDraw => Self {
                event_type: tag(GameEventType::GameDraw),
                ..Default::default()
            },
            RoomEvent::RematchRequested => Self {
                event_type: tag(GameEventType::RematchRequested),
                ..Default::default()
            },
            RoomEvent::OpponentDisconnected { name } => Self {
                event_type: tag(GameEventType::OpponentDisconnected),
                player_name: Some(name),
                ..Default::default()
            },
            RoomEvent::RoomExists { room_id } => Self {
                event_type: tag(GameEventType::RoomExists),
                room_id: Some(room_id),
                ..Default::default()
            },
            RoomEvent::RoomFull { room_id } => Self {
                event_type: tag(GameEventType::RoomFull),
                room_id: Some(room_id),
                ..Default::default()
            },
            RoomEvent::InvalidRoom { room_id } => Self {
                event_type: tag(GameEventType::InvalidRoom),
                room_id: Some(room_id),
                ..Default::default()
            },
            RoomEvent::InvalidMove => Self {
                event_type: tag(GameEventType::InvalidMove),
                ..Default::default()
            },
            RoomEvent::Error { message } => Self {
                event_type: tag(GameEventType::Error),
                message: Some(message),
                ..Default::default()
            },
        }
    }
}

pub struct MyGrpc {
    pub store: Store,
    pub router: RoomRouter,
}

impl MyGrpc {
    pub fn new(store: Store) -> Self {
        let router = RoomRouter::new(store.clone());
        Self { store, router }
    }
}

type GameStream = std::pin::Pin<
    Box<dyn tokio_stream::Stream<Item = Result<GameServiceResponse, tonic::Status>> + Send>,
>;

#[tonic::async_trait]
impl grpc_server::Grpc for MyGrpc {
    type GameServiceStream = GameStream;

    async fn ping(
        &self,
        request: tonic::Request<PingRequest>,
    ) -> Result<tonic::Response<PingResponse>, tonic::Status> {
        functions::ping::ping(request).await
    }

    async fn game_service(
        &self,
        request: tonic::Request<tonic::Streaming<GameServiceRequest>>,
    ) -> Result<tonic::Response<Self::GameServiceStream>, tonic::Status> {
        let mut inbound = request.into_inner();

        let conn_id = utils::generate_time_ordered_id("conn");
        let (response_sender, response_receiver) = tokio::sync::mpsc::channel(128);
        self.store.insert_channel(&conn_id, response_sender);
        tracing::info!(%conn_id, "connection opened");

        let store = self.store.clone();
        let router = self.router.clone();
        let task_conn_id = conn_id;

        // Pump the inbound stream into the per-room workers until the
        // client goes away
        tokio::spawn(async move {
            loop {
                match inbound.message().await {
                    Ok(Some(request)) => {
                        tracing::info!(?request, conn_id = %task_conn_id);
                        match Intent::try_from(request) {
                            Ok(intent) => router.dispatch(task_conn_id.clone(), intent).await,
                            Err(error) => {
                                store.emit_to(&task_conn_id, RoomEvent::from(error)).await;
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(status) => {
                        log::info!("Connection {task_conn_id} errored: {status:?}");
                        break;
                    }
                }
            }

            // The inbound side is gone, tell the rooms and forget the channel
            router.connection_lost(&task_conn_id).await;
            store.remove_channel(&task_conn_id);
            tracing::info!(conn_id = %task_conn_id, "connection closed");
        });

        let output_stream = tokio_stream::wrappers::ReceiverStream::new(response_receiver);
        Ok(tonic::Response::new(
            Box::pin(output_stream) as Self::GameServiceStream
        ))
    }
}
