use crate::app::server::grpc::{
    server::GameServiceResponse,
    storage::{SessionChannel, SessionHandle, Store},
    types::RoomEvent,
};

/// In-process registry of live connections and their room subscriptions.
///
/// Emits are fire and forget: a send to a connection whose stream has gone
/// away is logged and dropped, never surfaced to the caller. Within one
/// room, events arrive in the order they were emitted because the room
/// worker awaits each emit before issuing the next.
pub trait SessionInterface {
    fn insert_channel(&self, conn_id: &str, channel: SessionChannel);
    fn remove_channel(&self, conn_id: &str);

    fn set_player_name(&self, conn_id: &str, name: &str);
    fn player_name(&self, conn_id: &str) -> Option<String>;

    fn subscribe(&self, conn_id: &str, room_id: &str);
    fn unsubscribe(&self, conn_id: &str, room_id: &str);
    fn rooms_of(&self, conn_id: &str) -> Vec<String>;

    fn emit_to(&self, conn_id: &str, event: RoomEvent) -> impl std::future::Future<Output = ()>;
    fn emit_to_room(&self, room_id: &str, event: RoomEvent)
        -> impl std::future::Future<Output = ()>;
    fn emit_to_room_except(
        &self,
        room_id: &str,
        except_conn_id: &str,
        event: RoomEvent,
    ) -> impl std::future::Future<Output = ()>;
}

impl Store {
    fn channel_of(&self, conn_id: &str) -> Option<SessionChannel> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(conn_id).map(|handle| handle.sender.clone())
    }

    /// Snapshot the senders of a room's subscribers so no lock is held
    /// while awaiting the sends.
    fn room_channels(&self, room_id: &str, except_conn_id: Option<&str>) -> Vec<SessionChannel> {
        let subscribers = {
            let groups = self.groups.lock().unwrap();
            groups.get(room_id).cloned().unwrap_or_default()
        };

        let sessions = self.sessions.lock().unwrap();
        subscribers
            .iter()
            .filter(|conn_id| Some(conn_id.as_str()) != except_conn_id)
            .filter_map(|conn_id| sessions.get(conn_id))
            .map(|handle| handle.sender.clone())
            .collect()
    }
}

async fn send_all(channels: Vec<SessionChannel>, event: RoomEvent) {
    let response = GameServiceResponse::from(event);
    for channel in channels {
        if channel.send(Ok(response.clone())).await.is_err() {
            log::info!("Dropping event for a closed connection");
        }
    }
}

impl SessionInterface for Store {
    fn insert_channel(&self, conn_id: &str, channel: SessionChannel) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(
            conn_id.to_string(),
            SessionHandle {
                sender: channel,
                player_name: None,
            },
        );
    }

    fn remove_channel(&self, conn_id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(conn_id);
    }

    fn set_player_name(&self, conn_id: &str, name: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(handle) = sessions.get_mut(conn_id) {
            handle.player_name = Some(name.to_string());
        }
    }

    fn player_name(&self, conn_id: &str) -> Option<String> {
        let sessions = self.sessions.lock().unwrap();
        sessions
            .get(conn_id)
            .and_then(|handle| handle.player_name.clone())
    }

    fn subscribe(&self, conn_id: &str, room_id: &str) {
        let mut groups = self.groups.lock().unwrap();
        let subscribers = groups.entry(room_id.to_string()).or_default();
        if !subscribers.iter().any(|subscriber| subscriber == conn_id) {
            subscribers.push(conn_id.to_string());
        }
    }

    fn unsubscribe(&self, conn_id: &str, room_id: &str) {
        let mut groups = self.groups.lock().unwrap();
        if let Some(subscribers) = groups.get_mut(room_id) {
            subscribers.retain(|subscriber| subscriber != conn_id);
        }
    }

    fn rooms_of(&self, conn_id: &str) -> Vec<String> {
        let groups = self.groups.lock().unwrap();
        groups
            .iter()
            .filter(|(_, subscribers)| {
                subscribers.iter().any(|subscriber| subscriber == conn_id)
            })
            .map(|(room_id, _)| room_id.clone())
            .collect()
    }

    fn emit_to(&self, conn_id: &str, event: RoomEvent) -> impl std::future::Future<Output = ()> {
        let channels = self.channel_of(conn_id).into_iter().collect();
        send_all(channels, event)
    }

    fn emit_to_room(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> impl std::future::Future<Output = ()> {
        let channels = self.room_channels(room_id, None);
        send_all(channels, event)
    }

    fn emit_to_room_except(
        &self,
        room_id: &str,
        except_conn_id: &str,
        event: RoomEvent,
    ) -> impl std::future::Future<Output = ()> {
        let channels = self.room_channels(room_id, Some(except_conn_id));
        send_all(channels, event)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::app::{
        server::grpc::storage::{interface::room::RoomInterface, models, StorageResult},
        types::GameEventType,
    };

    struct NoRooms;

    #[tonic::async_trait]
    impl RoomInterface for NoRooms {
        async fn insert_room(&self, room: models::Room) -> StorageResult<models::Room> {
            Ok(room)
        }

        async fn find_room(&self, _room_id: &str) -> StorageResult<Option<models::Room>> {
            Ok(None)
        }
    }

    fn test_store() -> Store {
        Store::new(Arc::new(NoRooms))
    }

    fn register(store: &Store, conn_id: &str) -> tokio::sync::mpsc::Receiver<Result<GameServiceResponse, tonic::Status>> {
        let (sender, receiver) = tokio::sync::mpsc::channel(8);
        store.insert_channel(conn_id, sender);
        receiver
    }

    #[tokio::test]
    async fn room_emits_skip_the_excluded_connection() {
        let store = test_store();
        let mut first = register(&store, "conn_1");
        let mut second = register(&store, "conn_2");
        store.subscribe("conn_1", "535101");
        store.subscribe("conn_2", "535101");

        store
            .emit_to_room_except(
                "535101",
                "conn_1",
                RoomEvent::UserJoined {
                    name: "bob".to_string(),
                },
            )
            .await;

        let received = second.recv().await.unwrap().unwrap();
        assert_eq!(
            GameEventType::from_u8(received.event_type as u8),
            Some(GameEventType::UserJoined)
        );
        assert!(first.try_recv().is_err());
    }

    #[tokio::test]
    async fn emits_to_a_room_reach_every_subscriber() {
        let store = test_store();
        let mut first = register(&store, "conn_1");
        let mut second = register(&store, "conn_2");
        store.subscribe("conn_1", "535101");
        store.subscribe("conn_2", "535101");
        // double subscribe stays a single membership
        store.subscribe("conn_1", "535101");

        store.emit_to_room("535101", RoomEvent::GameDraw).await;

        assert!(first.recv().await.is_some());
        assert!(second.recv().await.is_some());
        assert!(first.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribed_connections_stop_receiving() {
        let store = test_store();
        let mut receiver = register(&store, "conn_1");
        store.subscribe("conn_1", "535101");
        store.unsubscribe("conn_1", "535101");
        assert!(store.rooms_of("conn_1").is_empty());

        store.emit_to_room("535101", RoomEvent::GameDraw).await;
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn emitting_to_a_gone_connection_is_harmless() {
        let store = test_store();
        let receiver = register(&store, "conn_1");
        store.subscribe("conn_1", "535101");
        drop(receiver);

        store.emit_to_room("535101", RoomEvent::GameDraw).await;
        store.emit_to("conn_1", RoomEvent::GameDraw).await;
        store.emit_to("never_registered", RoomEvent::GameDraw).await;
    }
}
