use crate::app::server::grpc::{
    redis_client::RedisClient,
    storage::{models, StorageResult, Store},
};

/// Durable keyed storage of room records. `insert_room` persists the whole
/// record; a later `find_room` observes it.
#[tonic::async_trait]
pub trait RoomInterface: Send + Sync {
    async fn insert_room(&self, room: models::Room) -> StorageResult<models::Room>;
    async fn find_room(&self, room_id: &str) -> StorageResult<Option<models::Room>>;
}

#[tonic::async_trait]
impl RoomInterface for RedisClient {
    async fn insert_room(&self, room: models::Room) -> StorageResult<models::Room> {
        let room_id = room.room_id.clone();
        self.serialize_and_set(room_id, room).await
    }

    async fn find_room(&self, room_id: &str) -> StorageResult<Option<models::Room>> {
        match self.get_and_deserialize(room_id).await {
            Ok(room) => Ok(Some(room)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

#[tonic::async_trait]
impl RoomInterface for Store {
    async fn insert_room(&self, room: models::Room) -> StorageResult<models::Room> {
        self.rooms.insert_room(room).await
    }

    async fn find_room(&self, room_id: &str) -> StorageResult<Option<models::Room>> {
        self.rooms.find_room(room_id).await
    }
}
