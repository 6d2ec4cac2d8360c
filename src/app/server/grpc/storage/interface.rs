pub mod room;
pub mod session;

pub trait StorageInterface: room::RoomInterface + session::SessionInterface {}
