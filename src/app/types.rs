#[derive(serde::Deserialize)]
pub struct ServerConfig {
    pub server: Option<Server>,
    pub redis: Option<RedisConfig>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Server {
    pub host: String,
    pub port: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: "3001".to_string(),
        }
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct RedisConfig {
    pub username: Option<String>,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

/// Default impl to connect to redis running locally
impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            username: None,
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
        }
    }
}

/// Tag carried in `GameServiceRequest::request_type`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameRequestType {
    CreateRoom,
    JoinRoom,
    MakeMove,
    RequestRematch,
    AcceptRematch,
    LeaveRoom,
}

impl GameRequestType {
    pub fn to_u8(&self) -> u8 {
        match self {
            GameRequestType::CreateRoom => 1,
            GameRequestType::JoinRoom => 2,
            GameRequestType::MakeMove => 3,
            GameRequestType::RequestRematch => 4,
            GameRequestType::AcceptRematch => 5,
            GameRequestType::LeaveRoom => 6,
        }
    }

    pub fn from_u8(request_type: u8) -> Option<Self> {
        match request_type {
            1 => Some(Self::CreateRoom),
            2 => Some(Self::JoinRoom),
            3 => Some(Self::MakeMove),
            4 => Some(Self::RequestRematch),
            5 => Some(Self::AcceptRematch),
            6 => Some(Self::LeaveRoom),
            _ => None,
        }
    }
}

/// Tag carried in `GameServiceResponse::event_type`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEventType {
    RoomCreated,
    RoomJoined,
    UserJoined,
    GameStateUpdated,
    GameWon,
    GameDraw,
    RematchRequested,
    OpponentDisconnected,
    RoomExists,
    RoomFull,
    InvalidRoom,
    InvalidMove,
    Error,
}

impl GameEventType {
    pub fn to_u8(&self) -> u8 {
        match self {
            GameEventType::RoomCreated => 1,
            GameEventType::RoomJoined => 2,
            GameEventType::UserJoined => 3,
            GameEventType::GameStateUpdated => 4,
            GameEventType::GameWon => 5,
            GameEventType::GameDraw => 6,
            GameEventType::RematchRequested => 7,
            GameEventType::OpponentDisconnected => 8,
            GameEventType::RoomExists => 9,
            GameEventType::RoomFull => 10,
            GameEventType::InvalidRoom => 11,
            GameEventType::InvalidMove => 12,
            GameEventType::Error => 13,
        }
    }

    pub fn from_u8(event_type: u8) -> Option<Self> {
        match event_type {
            1 => Some(Self::RoomCreated),
            2 => Some(Self::RoomJoined),
            3 => Some(Self::UserJoined),
            4 => Some(Self::GameStateUpdated),
            5 => Some(Self::GameWon),
            6 => Some(Self::GameDraw),
            7 => Some(Self::RematchRequested),
            8 => Some(Self::OpponentDisconnected),
            9 => Some(Self::RoomExists),
            10 => Some(Self::RoomFull),
            11 => Some(Self::InvalidRoom),
            12 => Some(Self::InvalidMove),
            13 => Some(Self::Error),
            _ => None,
        }
    }
}
