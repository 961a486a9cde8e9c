use thiserror::Error;

use crate::store::PersistenceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("{kind} {id} belongs to another user")]
    NotOwner { kind: &'static str, id: String },
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("record not saved: {0}")]
    Persistence(#[from] PersistenceError),
}

pub type AppResult<T> = Result<T, AppError>;
