use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::mpsc;

use super::{
    functions::game_service,
    storage::{interface::session::SessionInterface, Store},
    types::Intent,
};

/// One queued unit of work for a room worker
pub struct RoomCommand {
    pub conn_id: String,
    pub intent: Intent,
}

/// Routes every intent for a room id through that room's worker task.
///
/// The worker drains its queue one command at a time, so the whole
/// load-validate-mutate-save sequence for a room runs without interleaving
/// and two racing moves resolve in arrival order: the loser fails
/// validation against the already-updated board instead of overwriting it.
/// Workers are spawned on first use and live for the process lifetime,
/// matching the room records themselves, which are never deleted.
#[derive(Clone)]
pub struct RoomRouter {
    store: Store,
    workers: Arc<Mutex<HashMap<String, mpsc::Sender<RoomCommand>>>>,
}

impl RoomRouter {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            workers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn dispatch(&self, conn_id: String, intent: Intent) {
        let room_id = intent.room_id().to_string();
        let worker = self.worker_for(&room_id);

        if worker.send(RoomCommand { conn_id, intent }).await.is_err() {
            // Workers only stop when the process does, so this should not
            // happen outside shutdown
            log::error!("Room worker for {room_id} is gone, intent dropped");
        }
    }

    /// Translate a dropped connection into a leave for every room it was
    /// subscribed to, so the remaining member still gets notified.
    pub async fn connection_lost(&self, conn_id: &str) {
        let Some(name) = self.store.player_name(conn_id) else {
            return;
        };

        for room_id in self.store.rooms_of(conn_id) {
            self.dispatch(
                conn_id.to_string(),
                Intent::Leave {
                    room_id,
                    name: name.clone(),
                },
            )
            .await;
        }
    }

    fn worker_for(&self, room_id: &str) -> mpsc::Sender<RoomCommand> {
        let mut workers = self.workers.lock().unwrap();
        workers
            .entry(room_id.to_string())
            .or_insert_with(|| spawn_worker(self.store.clone(), room_id.to_string()))
            .clone()
    }
}

fn spawn_worker(store: Store, room_id: String) -> mpsc::Sender<RoomCommand> {
    let (sender, mut receiver) = mpsc::channel::<RoomCommand>(32);

    tokio::spawn(async move {
        tracing::debug!(%room_id, "room worker started");
        while let Some(command) = receiver.recv().await {
            game_service::handle(&store, command).await;
        }
    });

    sender
}
