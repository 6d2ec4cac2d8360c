use thiserror::Error;

use crate::app::errors::DbError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The room {room_id} already exists")]
    RoomAlreadyExists { room_id: String },
    #[error("The room {room_id} does not exist")]
    RoomNotFound { room_id: String },
    #[error("The room {room_id} already has two players")]
    RoomFull { room_id: String },
    #[error("The move is not allowed")]
    InvalidMove,
    #[error("{message}")]
    BadRequest { message: String },
    #[error("Storage failure")]
    Storage(#[from] DbError),
}

/// Lift storage results into api errors at the call site
pub trait ResultExtApp<T> {
    fn to_not_found(self, error: ApiError) -> Result<T, ApiError>;
    fn to_duplicate(self, error: ApiError) -> Result<T, ApiError>;
    fn to_internal_api_error(self) -> Result<T, ApiError>;
}

impl<T> ResultExtApp<T> for Result<T, DbError> {
    fn to_not_found(self, error: ApiError) -> Result<T, ApiError> {
        self.map_err(|db_error| {
            if db_error.is_not_found() {
                error
            } else {
                ApiError::Storage(db_error)
            }
        })
    }

    fn to_duplicate(self, error: ApiError) -> Result<T, ApiError> {
        self.map_err(|db_error| {
            if matches!(db_error, DbError::DuplicateValue) {
                error
            } else {
                ApiError::Storage(db_error)
            }
        })
    }

    fn to_internal_api_error(self) -> Result<T, ApiError> {
        self.map_err(ApiError::Storage)
    }
}
