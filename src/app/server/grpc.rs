pub mod functions;
pub mod redis_client;
pub mod rooms;
pub mod server;
pub mod storage;
pub mod types;
pub mod utils;
