use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::app::{
    errors::DbError,
    server::grpc::{server::GameServiceResponse, storage::interface::StorageInterface},
};

pub mod interface;
pub mod models;

pub type StorageResult<T> = Result<T, DbError>;

/// Outbound half of one live connection's stream
pub type SessionChannel = tokio::sync::mpsc::Sender<Result<GameServiceResponse, tonic::Status>>;

/// One registered connection: its stream sender plus the display name it
/// last presented, used to tell the room who dropped.
pub struct SessionHandle {
    pub sender: SessionChannel,
    pub player_name: Option<String>,
}

/// Connections registered on this instance, keyed by connection id
pub type SessionState = Arc<Mutex<HashMap<String, SessionHandle>>>;

/// Room broadcast groups: room id to subscribed connection ids
pub type GroupState = Arc<Mutex<HashMap<String, Vec<String>>>>;

/// Holds the persistence handle and the in-process connection registry.
///
/// Room records go through the `RoomInterface` object so tests can swap the
/// redis backend for an in-memory one.
#[derive(Clone)]
pub struct Store {
    pub rooms: Arc<dyn interface::room::RoomInterface>,
    pub sessions: SessionState,
    pub groups: GroupState,
}

impl Store {
    pub fn new(rooms: Arc<dyn interface::room::RoomInterface>) -> Self {
        Self {
            rooms,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            groups: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl StorageInterface for Store {}
